//! Append-only log store (SQLite) and its internal audit journal.

pub mod audit;
pub mod initialize;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod stats;

pub use pool::DbPool;
