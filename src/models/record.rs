use crate::models::{Coordinates, Sentiment};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A committed row of the `logs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    /// Durable path, never the ephemeral capture path.
    pub video_path: Option<PathBuf>,
    pub location: Option<Coordinates>,
}

impl SamplingRecord {
    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|c| c.longitude)
    }
}

/// Insert-side shape of a record; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub video_path: Option<PathBuf>,
    pub location: Option<Coordinates>,
}
