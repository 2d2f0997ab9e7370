use crate::errors::{AppError, AppResult};
use crate::models::SamplingRecord;
use crate::utils::time::display_local;
use csv::Writer;

/// Byte-order mark, so spreadsheet apps pick UTF-8.
const BOM: &str = "\u{FEFF}";

const HEADER: [&str; 6] = ["ID", "Time", "Sentiment", "Lat", "Lng", "VideoPath"];

/// Render records (already in ascending id order) as CSV bytes.
/// Absent fields are empty cells.
pub fn render_csv(records: &[SamplingRecord]) -> AppResult<Vec<u8>> {
    let mut buf = BOM.as_bytes().to_vec();
    {
        let mut wtr = Writer::from_writer(&mut buf);
        wtr.write_record(HEADER).map_err(csv_err)?;

        for rec in records {
            wtr.write_record(&[
                rec.id.to_string(),
                display_local(&rec.timestamp),
                rec.sentiment.to_string(),
                rec.latitude().map(|v| v.to_string()).unwrap_or_default(),
                rec.longitude().map(|v| v.to_string()).unwrap_or_default(),
                rec.video_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default(),
            ])
            .map_err(csv_err)?;
        }

        wtr.flush()?;
    }
    Ok(buf)
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::Export(e.to_string())
}
