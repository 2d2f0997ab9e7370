//! Shared media gallery (the user-visible photo/video library).

use crate::errors::GalleryError;
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait MediaGallery: Send + Sync {
    /// Copy `clip` into `album`. The source file is left in place.
    async fn save_to_album(&self, clip: &Path, album: &str) -> Result<PathBuf, GalleryError>;
}

/// Gallery backed by a directory tree: `<root>/<album>/<file>`.
#[derive(Debug, Clone)]
pub struct DirectoryGallery {
    root: PathBuf,
}

impl DirectoryGallery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaGallery for DirectoryGallery {
    async fn save_to_album(&self, clip: &Path, album: &str) -> Result<PathBuf, GalleryError> {
        let album_dir = self.root.join(album);
        tokio::fs::create_dir_all(&album_dir).await?;

        let name = clip
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "clip.mp4".into());
        let target = album_dir.join(name);
        tokio::fs::copy(clip, &target).await?;

        debug!("gallery copy at {}", target.display());
        Ok(target)
    }
}
