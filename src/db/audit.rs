use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal journal line into the `audit_log` table.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit_log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Same as [`audit`], but a failure only prints a warning.
pub fn audit_or_warn(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = audit(conn, operation, target, message) {
        crate::ui::messages::warning(format!("Failed to write internal log: {}", e));
    }
}

/// One row of the `audit_log` table.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// All audit rows, oldest first.
pub fn load_audit(conn: &Connection) -> AppResult<Vec<AuditEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM audit_log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(AuditEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    #[test]
    fn entries_come_back_in_insert_order() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let before = load_audit(&conn).unwrap().len();

        audit(&conn, "capture", "1", "record 1 committed").unwrap();
        audit(&conn, "export", "/tmp/out.csv", "1 records exported as csv").unwrap();

        let entries = load_audit(&conn).unwrap();
        assert_eq!(entries.len(), before + 2);
        let last = entries.last().unwrap();
        assert_eq!(last.operation, "export");
        assert_eq!(last.target, "/tmp/out.csv");
    }

    #[test]
    fn migrations_are_journaled() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let entries = load_audit(&conn).unwrap();
        assert!(entries.iter().any(|e| e.operation == "migration_applied"));
    }
}
