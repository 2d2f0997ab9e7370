//! Ordered, partial-failure-tolerant save of a draft.
//!
//! 1. gallery copy of the clip (best effort, logged only)
//! 2. move of the clip into durable storage (fatal: no row without a file)
//! 3. insert of the row (fatal; a file moved in 2 stays where it is)

use crate::capture::CaptureDraft;
use crate::db::pool::DbPool;
use crate::db::queries::insert_record;
use crate::errors::{AppResult, CommitError, GalleryError};
use crate::gallery::MediaGallery;
use crate::models::{NewRecord, SamplingRecord};
use crate::permissions::{PermissionBroker, PermissionKind};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub record: SamplingRecord,
    /// Where the gallery copy landed, if it succeeded.
    pub gallery_copy: Option<PathBuf>,
}

pub struct PersistenceCommitter {
    pool: DbPool,
    media_dir: PathBuf,
    gallery: Arc<dyn MediaGallery>,
    permissions: Arc<dyn PermissionBroker>,
    album: String,
}

impl PersistenceCommitter {
    pub fn new(
        pool: DbPool,
        media_dir: impl Into<PathBuf>,
        gallery: Arc<dyn MediaGallery>,
        permissions: Arc<dyn PermissionBroker>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            media_dir: media_dir.into(),
            gallery,
            permissions,
            album: album.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Durable location of a clip committed at `ts`.
    pub fn durable_path_for(&self, ts: &DateTime<Utc>) -> PathBuf {
        self.media_dir
            .join(format!("vlog_{}.mp4", ts.timestamp_millis()))
    }

    pub async fn commit(&self, draft: &CaptureDraft) -> AppResult<CommitOutcome> {
        self.commit_resuming(draft, None).await
    }

    /// Commit `draft`, reusing `moved` as the durable clip when an earlier
    /// attempt already moved it there and only the row insert failed.
    /// Steps 1 and 2 are skipped for a clip that is still in place.
    pub async fn commit_resuming(
        &self,
        draft: &CaptureDraft,
        moved: Option<PathBuf>,
    ) -> AppResult<CommitOutcome> {
        let timestamp = Utc::now();
        let mut gallery_copy = None;
        let mut durable = None;

        if let Some(ephemeral) = &draft.video_ref {
            durable = match moved {
                Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => {
                    info!("reusing clip already in durable storage: {}", path.display());
                    Some(path)
                }
                _ => {
                    gallery_copy = self.copy_to_gallery(ephemeral).await;
                    Some(self.move_to_durable(ephemeral, &timestamp).await?)
                }
            };
        }

        let new_record = NewRecord {
            timestamp,
            sentiment: draft.sentiment,
            video_path: durable.clone(),
            location: draft.location,
        };

        let to_insert = new_record.clone();
        let id = self
            .pool
            .run(move |conn| insert_record(conn, &to_insert))
            .await
            .map_err(|e| {
                error!("log write failed: {e}");
                if let Some(orphan) = &durable {
                    warn!("durable file left without a row: {}", orphan.display());
                }
                CommitError::LogWrite {
                    orphan: durable.clone(),
                    source: Box::new(e),
                }
            })?;

        info!("record {id} committed");
        Ok(CommitOutcome {
            record: SamplingRecord {
                id,
                timestamp: new_record.timestamp,
                sentiment: new_record.sentiment,
                video_path: new_record.video_path,
                location: new_record.location,
            },
            gallery_copy,
        })
    }

    /// Step 1. Every failure ends here as a log line.
    async fn copy_to_gallery(&self, clip: &Path) -> Option<PathBuf> {
        let result = if self
            .permissions
            .request(PermissionKind::Gallery)
            .await
            .is_granted()
        {
            self.gallery.save_to_album(clip, &self.album).await
        } else {
            Err(GalleryError::PermissionDenied(PermissionKind::Gallery))
        };

        match result {
            Ok(saved) => {
                info!("clip exported to gallery: {}", saved.display());
                Some(saved)
            }
            Err(e) => {
                warn!("gallery copy skipped: {e}");
                None
            }
        }
    }

    /// Step 2. Never overwrites an existing durable file.
    async fn move_to_durable(
        &self,
        from: &Path,
        ts: &DateTime<Utc>,
    ) -> Result<PathBuf, CommitError> {
        let to = self.durable_path_for(ts);
        let fail = |source: io::Error| CommitError::DurableMove {
            from: from.to_path_buf(),
            to: to.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .map_err(fail)?;
        if tokio::fs::try_exists(&to).await.map_err(fail)? {
            return Err(fail(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "durable file already exists",
            )));
        }

        move_file(from, &to).await.map_err(fail)?;
        info!("clip moved to {}", to.display());
        Ok(to)
    }
}

/// Rename, falling back to copy + remove across filesystems.
/// A failed copy leaves nothing behind at `to`.
async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("rename across filesystems, copying {}", from.display());
        }
        Err(e) => return Err(e),
    }

    if let Err(e) = tokio::fs::copy(from, to).await {
        if let Err(cleanup) = tokio::fs::remove_file(to).await
            && cleanup.kind() != io::ErrorKind::NotFound
        {
            warn!("could not remove partial copy {}: {}", to.display(), cleanup);
        }
        return Err(e);
    }
    if let Err(e) = tokio::fs::remove_file(from).await {
        warn!("could not remove {} after copy: {}", from.display(), e);
    }
    Ok(())
}
