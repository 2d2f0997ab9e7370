//! SQLite handle for the log store.
//!
//! One connection behind a mutex, cloned freely. `shared()` is the
//! process-wide instance: initialized once, never torn down.

use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use log::info;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

static SHARED: OnceLock<DbPool> = OnceLock::new();

#[derive(Clone)]
pub struct DbPool {
    conn: Arc<Mutex<Connection>>,
    path: Arc<PathBuf>,
}

impl DbPool {
    /// Open (or create) the database at `path` and apply pending migrations.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        init_db(&conn)?;
        info!("log store opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Arc::new(path.to_path_buf()),
        })
    }

    /// The process-wide pool. The first call opens it; later calls must name
    /// the same path.
    pub fn shared(path: impl AsRef<Path>) -> AppResult<&'static DbPool> {
        let path = path.as_ref();
        let pool = match SHARED.get() {
            Some(pool) => pool,
            None => {
                let opened = Self::open(path)?;
                SHARED.get_or_init(|| opened)
            }
        };

        if pool.path() != path {
            return Err(AppError::Config(format!(
                "log store already initialized at {}",
                pool.path().display()
            )));
        }
        Ok(pool)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        func(&mut conn)
    }

    /// Run `func` on the blocking pool so the calling task can yield.
    pub async fn run<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.clone();
        tokio::task::spawn_blocking(move || pool.with_conn(func))
            .await
            .map_err(|e| AppError::Other(format!("database task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_parent_dir_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/esm.sqlite");
        let pool = DbPool::open(&path).unwrap();

        assert!(path.exists());
        let tables: i64 = pool
            .with_conn(|c| {
                Ok(c.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('logs','audit_log')",
                    [],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn shared_handle_is_initialized_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.sqlite");

        let a = DbPool::shared(&path).unwrap();
        let b = DbPool::shared(&path).unwrap();
        assert!(Arc::ptr_eq(&a.conn, &b.conn));

        let other = dir.path().join("other.sqlite");
        assert!(matches!(DbPool::shared(&other), Err(AppError::Config(_))));
    }
}
