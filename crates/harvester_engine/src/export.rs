//! CSV export of harvested records.

use std::path::{Path, PathBuf};

use crate::persist::{atomic_write, PersistError};
use crate::HarvestedRecord;

/// Column order of the export artifact.
pub const CSV_HEADER: [&str; 4] = ["Display Name", "Public Name", "Phone Number", "Last Message"];

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_filename: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_filename: "chat_records.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub record_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Zero records accumulated: reported distinctly, no file is written.
    #[error("no records to export")]
    NoRecords,
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Render records as CSV: fixed header, every field double-quoted with
/// internal quotes doubled, row order = processing order.
pub fn build_csv(records: &[HarvestedRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut buffer = String::new();
    buffer.push_str(&CSV_HEADER.join(","));
    buffer.push('\n');
    for record in records {
        let fields = [
            record.display_label.as_str(),
            record.public_name.as_str(),
            record.phone_number.as_str(),
            record.last_message.as_str(),
        ];
        let row: Vec<String> = fields.iter().map(|field| quote_field(field)).collect();
        buffer.push_str(&row.join(","));
        buffer.push('\n');
    }
    Ok(buffer)
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Split one line produced by [`build_csv`] back into its fields. The
/// export has no external consumer contract beyond standard CSV quoting,
/// so the decoder doubles as its verification.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Build the CSV and write it atomically into `output_dir`.
pub fn write_csv_export(
    output_dir: &Path,
    options: &ExportOptions,
    records: &[HarvestedRecord],
) -> Result<ExportSummary, ExportError> {
    let csv = build_csv(records)?;
    let output_path = atomic_write(output_dir, &options.output_filename, &csv)?;
    Ok(ExportSummary {
        record_count: records.len(),
        output_path,
    })
}
