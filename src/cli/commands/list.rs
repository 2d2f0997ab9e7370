use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::load_recent;
use crate::errors::AppResult;
use crate::models::SamplingRecord;
use crate::utils::colors::{RESET, color_for_sentiment, colorize_presence};
use crate::utils::table::{Column, Table};
use crate::utils::time::display_local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { limit } = cmd {
        let pool = DbPool::open(cfg.database_path())?;
        let records = pool.with_conn(|conn| load_recent(conn, *limit))?;

        if records.is_empty() {
            println!("No records yet.");
            return Ok(());
        }

        print!("{}", render(&records));
    }
    Ok(())
}

/// Newest first, as loaded.
fn render(records: &[SamplingRecord]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("Time"),
        Column::new("Mood"),
        Column::new("Location"),
        Column::new("Video"),
    ]);

    for rec in records {
        let mood = rec.sentiment.value();
        let location = rec
            .location
            .map(|c| format!("{:.5}, {:.5}", c.latitude, c.longitude));
        let video = rec
            .video_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string());

        table.add_row(vec![
            rec.id.to_string(),
            display_local(&rec.timestamp),
            format!("{}{}{}", color_for_sentiment(mood), mood, RESET),
            colorize_presence(location.is_some(), location.as_deref().unwrap_or(""), "-"),
            colorize_presence(video.is_some(), video.as_deref().unwrap_or(""), "-"),
        ]);
    }

    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Sentiment};
    use crate::ui::messages::strip_ansi;
    use chrono::Utc;

    #[test]
    fn absent_values_render_as_dash() {
        let rec = SamplingRecord {
            id: 4,
            timestamp: Utc::now(),
            sentiment: Sentiment::clamped(1),
            video_path: None,
            location: Some(Coordinates::new(25.03, 121.56)),
        };
        let out = strip_ansi(&render(&[rec]));
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("25.03000, 121.56000"));
        assert!(row.trim_end().ends_with('-'));
    }
}
