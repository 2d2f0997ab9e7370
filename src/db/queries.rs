use crate::errors::{AppError, AppResult};
use crate::models::{Coordinates, NewRecord, SamplingRecord, Sentiment};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Result, Row, params};
use std::path::PathBuf;

/// Store representation of a capture instant (ISO-8601, UTC, millisecond precision).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<SamplingRecord> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(AppError::InvalidTimestamp(ts_str.clone())))?;

    let raw_sentiment: i64 = row.get("sentiment")?;
    let sentiment = Sentiment::try_new(raw_sentiment).ok_or_else(|| {
        conversion_error(AppError::Other(format!(
            "sentiment out of range: {}",
            raw_sentiment
        )))
    })?;

    let video: Option<String> = row.get("video_uri")?;

    Ok(SamplingRecord {
        id: row.get("id")?,
        timestamp,
        sentiment,
        video_path: video.map(PathBuf::from),
        location: Coordinates::from_columns(row.get("latitude")?, row.get("longitude")?),
    })
}

/// Append one row to `logs` and return its id.
pub fn insert_record(conn: &Connection, rec: &NewRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO logs (timestamp, sentiment, video_uri, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            format_timestamp(&rec.timestamp),
            rec.sentiment.value(),
            rec.video_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            rec.location.map(|c| c.latitude),
            rec.location.map(|c| c.longitude),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All records, oldest first (ascending id).
pub fn load_records(conn: &Connection) -> AppResult<Vec<SamplingRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM logs ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The `limit` most recent records, newest first.
pub fn load_recent(conn: &Connection, limit: usize) -> AppResult<Vec<SamplingRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM logs ORDER BY id DESC LIMIT ?1")?;
    let rows = stmt.query_map([limit as i64], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_record(conn: &Connection, id: i64) -> AppResult<Option<SamplingRecord>> {
    use rusqlite::OptionalExtension;

    Ok(conn
        .query_row("SELECT * FROM logs WHERE id = ?1", [id], map_row)
        .optional()?)
}

pub fn count_records(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?)
}

pub fn max_id(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT IFNULL(MAX(id), 0) FROM logs", [], |row| row.get(0))?)
}
