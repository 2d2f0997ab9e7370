//! One-shot location probe.
//!
//! Checks the foreground location permission, asks for a single fix, and
//! reports `None` for every kind of failure. Nothing here retries or times out.

use crate::errors::LocationError;
use crate::models::Coordinates;
use crate::permissions::{Permission, PermissionBroker, PermissionKind};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::oneshot;

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// A single position fix.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Provider that always answers with the same fix (or no signal).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.0
            .ok_or_else(|| LocationError::Unavailable("no position signal".into()))
    }
}

pub struct LocationProbe {
    permissions: Arc<dyn PermissionBroker>,
    provider: Arc<dyn LocationProvider>,
}

impl LocationProbe {
    pub fn new(
        permissions: Arc<dyn PermissionBroker>,
        provider: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            permissions,
            provider,
        }
    }

    pub async fn locate(&self) -> Option<Coordinates> {
        let permission = match self.permissions.status(PermissionKind::Location).await {
            Some(answer) => answer,
            None => self.permissions.request(PermissionKind::Location).await,
        };
        if permission == Permission::Denied {
            warn!("location permission denied; recording without coordinates");
            return None;
        }

        match self.provider.current_position().await {
            Ok(fix) => {
                info!("location fix: {}, {}", fix.latitude, fix.longitude);
                Some(fix)
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Run the probe as its own task. The receiver yields exactly one result.
    pub fn spawn(self) -> oneshot::Receiver<Option<Coordinates>> {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let fix = self.locate().await;
            // The session may already be gone.
            let _ = tx.send(fix);
        });
        rx
    }
}
