use crate::models::{Coordinates, Sentiment};
use std::path::PathBuf;

/// In-progress inputs of one sampling session.
///
/// `video_ref` points into the camera cache; it is a path only, the
/// hardware stays with the camera session.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureDraft {
    pub sentiment: Sentiment,
    pub video_ref: Option<PathBuf>,
    pub location: Option<Coordinates>,
}

impl CaptureDraft {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            sentiment,
            video_ref: None,
            location: None,
        }
    }
}

impl Default for CaptureDraft {
    fn default() -> Self {
        Self::new(Sentiment::NEUTRAL)
    }
}
