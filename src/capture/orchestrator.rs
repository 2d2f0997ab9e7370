use crate::camera::{CameraSession, MAX_RECORDING, RecordedClip};
use crate::capture::{CaptureDraft, CommitOutcome, PersistenceCommitter};
use crate::errors::{AppError, AppResult, CameraError, CommitError};
use crate::models::{Coordinates, Sentiment};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Collects the three inputs of a sampling session and decides when to commit.
///
/// The orchestrator owns the draft and the camera session. It keeps only the
/// path of a recorded clip, never the hardware.
pub struct CaptureOrchestrator {
    draft: CaptureDraft,
    initial_sentiment: Sentiment,
    camera: CameraSession,
    committer: PersistenceCommitter,
    pending_location: Option<oneshot::Receiver<Option<Coordinates>>>,
    location_resolved: bool,
    /// Durable copy of the draft's clip left by a commit whose row insert failed.
    moved_clip: Option<PathBuf>,
}

impl CaptureOrchestrator {
    pub fn new(
        camera: CameraSession,
        committer: PersistenceCommitter,
        initial_sentiment: Sentiment,
    ) -> Self {
        Self {
            draft: CaptureDraft::new(initial_sentiment),
            initial_sentiment,
            camera,
            committer,
            pending_location: None,
            location_resolved: false,
            moved_clip: None,
        }
    }

    pub fn draft(&self) -> &CaptureDraft {
        &self.draft
    }

    pub fn camera(&self) -> &CameraSession {
        &self.camera
    }

    pub fn committer(&self) -> &PersistenceCommitter {
        &self.committer
    }

    /// Set the mood rating, clamped into range.
    pub fn update_sentiment(&mut self, value: i64) -> Sentiment {
        self.draft.sentiment = Sentiment::clamped(value);
        self.draft.sentiment
    }

    pub async fn record_video(&mut self) -> Result<RecordedClip, CameraError> {
        self.record_video_for(MAX_RECORDING).await
    }

    /// Capture a clip and keep its path in the draft. A failure leaves the
    /// draft as it was; the session itself goes on.
    pub async fn record_video_for(
        &mut self,
        requested: Duration,
    ) -> Result<RecordedClip, CameraError> {
        match self.camera.record_for(requested).await {
            Ok(clip) => {
                self.draft.video_ref = Some(clip.path.clone());
                self.moved_clip = None;
                Ok(clip)
            }
            Err(e) => {
                warn!("video not recorded: {e}");
                Err(e)
            }
        }
    }

    /// Drop the recorded clip reference and send the camera through cooldown.
    pub fn retake(&mut self) {
        self.draft.video_ref = None;
        self.moved_clip = None;
        self.camera.reset();
    }

    /// Store the one location result of this session. Later calls are ignored;
    /// returns whether the value was taken.
    pub fn update_location(&mut self, location: Option<Coordinates>) -> bool {
        if self.location_resolved {
            debug!("location already resolved for this session; ignoring update");
            return false;
        }
        self.location_resolved = true;
        self.pending_location = None;
        self.draft.location = location;
        true
    }

    /// Receive the location from a probe running on its own task.
    pub fn attach_location(&mut self, rx: oneshot::Receiver<Option<Coordinates>>) {
        if !self.location_resolved {
            self.pending_location = Some(rx);
        }
    }

    /// Take the probe result if it has arrived. Never waits.
    fn poll_location(&mut self) {
        let Some(rx) = self.pending_location.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(location) => {
                self.update_location(location);
            }
            Err(TryRecvError::Empty) => debug!("location still pending at submit"),
            Err(TryRecvError::Closed) => {
                self.pending_location = None;
            }
        }
    }

    /// Commit the draft. On success the draft starts over and the camera is
    /// reset; on failure both are left untouched so the user can retry. A
    /// retry after a failed row insert reuses the clip already moved.
    pub async fn submit(&mut self) -> AppResult<CommitOutcome> {
        self.poll_location();

        match self
            .committer
            .commit_resuming(&self.draft, self.moved_clip.clone())
            .await
        {
            Ok(outcome) => {
                info!("sampling session committed as record {}", outcome.record.id);
                self.draft = CaptureDraft::new(self.initial_sentiment);
                self.pending_location = None;
                self.location_resolved = false;
                self.moved_clip = None;
                self.camera.reset();
                Ok(outcome)
            }
            Err(e) => {
                if let AppError::Commit(CommitError::LogWrite {
                    orphan: Some(orphan),
                    ..
                }) = &e
                {
                    self.moved_clip = Some(orphan.clone());
                }
                error!("commit failed, draft kept: {e}");
                Err(e)
            }
        }
    }
}
