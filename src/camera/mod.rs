//! Camera/microphone hardware and the session state machine that owns it.
//!
//! The device is a single exclusive resource. [`CameraSession`] is the only
//! arbiter of access: a recording can start only from [`CameraState::Ready`],
//! and every teardown goes through a timed [`CameraState::Cooldown`] before
//! the handle is allocated again.

pub mod file_device;
pub mod session;
pub mod state;

pub use file_device::FileCamera;
pub use session::CameraSession;
pub use state::CameraState;

use crate::errors::CameraError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Hard cap on a single clip.
pub const MAX_RECORDING: Duration = Duration::from_secs(2);

/// Minimum time the hardware stays released before it is reallocated.
pub const COOLDOWN_DELAY: Duration = Duration::from_millis(200);

/// A finished capture sitting in the device cache (ephemeral storage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClip {
    pub path: PathBuf,
    pub duration: Duration,
}

/// Low-level camera + microphone handle.
#[async_trait]
pub trait CameraDevice: Send {
    /// Allocate the hardware handle and start the live preview.
    async fn open(&mut self) -> Result<(), CameraError>;

    /// Capture one clip that stops by itself after `max_duration`.
    async fn record(&mut self, max_duration: Duration) -> Result<RecordedClip, CameraError>;

    /// Drop the hardware handle. Must be safe to call when already released.
    fn release(&mut self);
}
