use std::fmt;
use tokio::time::Instant;

/// Lifecycle of the camera session.
///
/// `Recorded` is the "clip captured" sub-state of ready: the hardware is
/// logically consumed, no preview is shown and only retake is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Camera/microphone permissions not resolved yet.
    Uninitialized,
    /// At least one of camera/microphone refused. Left only by re-requesting.
    Denied,
    /// Hardware held, live preview running, no capture.
    Ready,
    /// Capture in progress.
    Recording,
    /// A clip was captured; waiting for submit or retake.
    Recorded,
    /// Hardware released on purpose; `since` is when the teardown happened.
    Cooldown { since: Instant },
}

impl CameraState {
    pub fn name(&self) -> &'static str {
        match self {
            CameraState::Uninitialized => "uninitialized",
            CameraState::Denied => "denied",
            CameraState::Ready => "ready",
            CameraState::Recording => "recording",
            CameraState::Recorded => "recorded",
            CameraState::Cooldown { .. } => "cooldown",
        }
    }

    /// States in which the hardware handle is (logically) held.
    pub fn holds_hardware(&self) -> bool {
        matches!(
            self,
            CameraState::Ready | CameraState::Recording | CameraState::Recorded
        )
    }

    pub fn is_cooldown(&self) -> bool {
        matches!(self, CameraState::Cooldown { .. })
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
