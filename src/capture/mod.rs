//! Capture-and-commit pipeline: one sampling session from draft to durable row.

pub mod committer;
pub mod draft;
pub mod orchestrator;

pub use committer::{CommitOutcome, PersistenceCommitter};
pub use draft::CaptureDraft;
pub use orchestrator::CaptureOrchestrator;
