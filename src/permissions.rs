//! Runtime permissions (camera, microphone, location, gallery).
//!
//! Every capability is requested independently and denial is an ordinary
//! outcome: callers degrade to an absent value instead of failing.

use async_trait::async_trait;
use clap::ValueEnum;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PermissionKind {
    Camera,
    Microphone,
    Location,
    Gallery,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Camera => "camera",
            PermissionKind::Microphone => "microphone",
            PermissionKind::Location => "location",
            PermissionKind::Gallery => "gallery",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

#[async_trait]
pub trait PermissionBroker: Send + Sync {
    /// Answer already given for `kind`, without prompting. `None` if never asked.
    async fn status(&self, kind: PermissionKind) -> Option<Permission>;

    /// Prompt for `kind` and return the answer.
    async fn request(&self, kind: PermissionKind) -> Permission;
}

/// Broker with answers fixed up front (CLI flags), adjustable at runtime.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    denied: Mutex<HashSet<PermissionKind>>,
    answered: Mutex<HashMap<PermissionKind, Permission>>,
    prompts: Mutex<HashMap<PermissionKind, usize>>,
}

impl StaticPermissions {
    pub fn granting_all() -> Self {
        Self::default()
    }

    pub fn denying<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PermissionKind>,
    {
        let broker = Self::default();
        broker
            .denied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend(kinds);
        broker
    }

    /// User flips the system setting to allow `kind`; takes effect on the next request.
    pub fn grant(&self, kind: PermissionKind) {
        self.denied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&kind);
    }

    /// How many times `kind` was prompted for.
    pub fn prompt_count(&self, kind: PermissionKind) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl PermissionBroker for StaticPermissions {
    async fn status(&self, kind: PermissionKind) -> Option<Permission> {
        self.answered
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&kind)
            .copied()
    }

    async fn request(&self, kind: PermissionKind) -> Permission {
        *self
            .prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(kind)
            .or_insert(0) += 1;

        let answer = if self
            .denied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(&kind)
        {
            Permission::Denied
        } else {
            Permission::Granted
        };

        self.answered
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(kind, answer);
        answer
    }
}
