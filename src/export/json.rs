use crate::errors::{AppError, AppResult};
use crate::models::SamplingRecord;
use crate::utils::time::display_local;
use serde::Serialize;

/// Flat export shape of one record.
#[derive(Serialize)]
struct RecordExport<'a> {
    id: i64,
    timestamp: String,
    time: String,
    sentiment: u8,
    latitude: Option<f64>,
    longitude: Option<f64>,
    video_path: Option<&'a std::path::Path>,
}

pub fn render_json(records: &[SamplingRecord]) -> AppResult<Vec<u8>> {
    let rows: Vec<RecordExport> = records
        .iter()
        .map(|r| RecordExport {
            id: r.id,
            timestamp: crate::db::queries::format_timestamp(&r.timestamp),
            time: display_local(&r.timestamp),
            sentiment: r.sentiment.value(),
            latitude: r.latitude(),
            longitude: r.longitude(),
            video_path: r.video_path.as_deref(),
        })
        .collect();

    let mut out =
        serde_json::to_vec_pretty(&rows).map_err(|e| AppError::Export(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use chrono::Utc;

    #[test]
    fn absent_fields_are_null() {
        let rec = SamplingRecord {
            id: 1,
            timestamp: Utc::now(),
            sentiment: Sentiment::clamped(0),
            video_path: None,
            location: None,
        };
        let v: serde_json::Value = serde_json::from_slice(&render_json(&[rec]).unwrap()).unwrap();
        assert_eq!(v[0]["id"], 1);
        assert_eq!(v[0]["sentiment"], 0);
        assert!(v[0]["latitude"].is_null());
        assert!(v[0]["video_path"].is_null());
    }
}
