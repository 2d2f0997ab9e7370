//! Unified application error type.
//! All modules (db, capture, camera, cli, export) return AppError, with the
//! capture pipeline's own failures carried as typed inner errors.

use crate::camera::CameraState;
use crate::permissions::PermissionKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Capture pipeline
    // ---------------------------
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("Invalid timestamp in log store: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the camera session.
#[derive(Error, Debug)]
pub enum CameraError {
    /// `record()` was called outside `Ready`; nothing was started.
    #[error("Camera is not ready (state: {0})")]
    NotReady(CameraState),

    #[error("Camera and microphone permissions are required")]
    PermissionDenied,

    /// The hardware capture call failed. The session is in cooldown.
    #[error("Recording failed: {0}. Please retry.")]
    Hardware(String),
}

/// Best-effort gallery export failures. Logged, never surfaced.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Permission denied: {0}")]
    PermissionDenied(PermissionKind),

    #[error("Gallery I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Location fix failures. Always swallowed into an absent location.
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Fatal failures of one commit attempt. The draft is kept for retry.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Could not move video into durable storage ({from} -> {to}): {source}")]
    DurableMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write the record{}: {source}", orphan_hint(.orphan))]
    LogWrite {
        orphan: Option<PathBuf>,
        #[source]
        source: Box<AppError>,
    },
}

fn orphan_hint(orphan: &Option<PathBuf>) -> String {
    match orphan {
        Some(p) => format!(" (video kept at {})", p.display()),
        None => String::new(),
    }
}
