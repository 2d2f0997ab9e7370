use crate::db::audit::audit_or_warn;
use crate::db::pool::DbPool;
use crate::db::queries::load_records;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::{ExportFormat, notify_export_success, render_csv, render_json};
use crate::ui::messages::warning;
use crate::utils::path::is_absolute;
use std::fs;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export every record in ascending id order.
    ///
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file
    /// - `force`: overwrite without asking
    pub fn export(pool: &DbPool, format: ExportFormat, file: &str, force: bool) -> AppResult<()> {
        let path = Path::new(file);
        if !is_absolute(file) {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let records = pool.with_conn(|conn| load_records(conn))?;
        if records.is_empty() {
            warning("No records in the log store. Nothing to export.");
            return Ok(());
        }

        let bytes = match format {
            ExportFormat::Csv => render_csv(&records)?,
            ExportFormat::Json => render_json(&records)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;

        notify_export_success(&format.as_str().to_uppercase(), path);

        pool.with_conn(|conn| {
            audit_or_warn(
                conn,
                "export",
                &path.to_string_lossy(),
                &format!("{} records exported as {}", records.len(), format.as_str()),
            );
            Ok(())
        })?;

        Ok(())
    }
}
