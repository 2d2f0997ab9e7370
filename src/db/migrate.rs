use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ordered schema steps. Each version is applied once and recorded in `audit_log`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251104_0001_create_logs",
        "Created logs table",
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp  TEXT NOT NULL,
            sentiment  INTEGER NOT NULL CHECK(sentiment BETWEEN 0 AND 4),
            video_uri  TEXT,
            latitude   REAL,
            longitude  REAL,
            CHECK((latitude IS NULL) = (longitude IS NULL))
        );
        "#,
    ),
    (
        "20251121_0002_logs_timestamp_index",
        "Indexed logs by timestamp",
        "CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp);",
    ),
];

/// Ensure that the `audit_log` table exists.
fn ensure_audit_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM audit_log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO audit_log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    tx.commit()?;

    log::info!("migration applied: {version}");
    Ok(())
}

/// Public entry point: run all pending migrations. Idempotent.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_audit_table(conn)?;

    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, message, sql)?;
        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM audit_log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn half_coordinate_pair_is_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        let res = conn.execute(
            "INSERT INTO logs (timestamp, sentiment, latitude) VALUES ('2025-01-01T00:00:00Z', 2, 1.0)",
            [],
        );
        assert!(res.is_err());
    }
}
