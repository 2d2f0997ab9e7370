use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::display_local;
use chrono::{DateTime, Utc};
use std::fs;

/// Aggregate numbers shown by `db --info`.
#[derive(Debug, Default, PartialEq)]
pub struct DbStats {
    pub records: i64,
    pub with_video: i64,
    pub with_location: i64,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    pool.with_conn(|conn| {
        let (records, with_video, with_location): (i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*),
                    COUNT(video_uri),
                    COUNT(latitude)
             FROM logs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let (first, last): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM logs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        };

        Ok(DbStats {
            records,
            with_video,
            with_location,
            first: first.as_deref().and_then(parse),
            last: last.as_deref().and_then(parse),
        })
    })
}

pub fn print_db_info(pool: &DbPool) -> AppResult<()> {
    let db_path = pool.path().display().to_string();
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(pool.path()).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    let stats = collect(pool)?;
    println!(
        "{}• Total records:{} {}{}{}",
        CYAN, RESET, GREEN, stats.records, RESET
    );
    println!("{}• With video:{} {}", CYAN, RESET, stats.with_video);
    println!("{}• With location:{} {}", CYAN, RESET, stats.with_location);

    //
    // 3) TIME RANGE
    //
    let fmt = |ts: Option<DateTime<Utc>>| {
        ts.map(|t| display_local(&t))
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Capture range:{}", CYAN, RESET);
    println!("    from: {}", fmt(stats.first));
    println!("    to:   {}", fmt(stats.last));

    println!();
    Ok(())
}
