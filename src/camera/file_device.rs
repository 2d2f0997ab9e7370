//! File-backed camera used by the CLI: "recording" copies a source clip into
//! the capture cache after the capture time has elapsed.

use super::{CameraDevice, RecordedClip};
use crate::errors::CameraError;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::path::PathBuf;
use std::time::Duration;

pub struct FileCamera {
    source: Option<PathBuf>,
    capture_dir: PathBuf,
    open: bool,
    seq: u32,
}

impl FileCamera {
    pub fn new(source: Option<PathBuf>, capture_dir: PathBuf) -> Self {
        Self {
            source,
            capture_dir,
            open: false,
            seq: 0,
        }
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    async fn open(&mut self) -> Result<(), CameraError> {
        tokio::fs::create_dir_all(&self.capture_dir)
            .await
            .map_err(|e| {
                CameraError::Hardware(format!(
                    "capture cache {} unavailable: {e}",
                    self.capture_dir.display()
                ))
            })?;
        self.open = true;
        debug!("camera handle opened");
        Ok(())
    }

    async fn record(&mut self, max_duration: Duration) -> Result<RecordedClip, CameraError> {
        if !self.open {
            return Err(CameraError::Hardware("camera handle is not open".into()));
        }
        let source = self
            .source
            .clone()
            .ok_or_else(|| CameraError::Hardware("no video source attached".into()))?;

        tokio::time::sleep(max_duration).await;

        self.seq += 1;
        let target = self.capture_dir.join(format!(
            "capture_{}_{}.mp4",
            Utc::now().timestamp_millis(),
            self.seq
        ));
        tokio::fs::copy(&source, &target).await.map_err(|e| {
            CameraError::Hardware(format!("capture from {} failed: {e}", source.display()))
        })?;

        info!("clip captured to {}", target.display());
        Ok(RecordedClip {
            path: target,
            duration: max_duration,
        })
    }

    fn release(&mut self) {
        if self.open {
            debug!("camera handle released");
        }
        self.open = false;
    }
}
