// Writes a selection of catalog records to a new JSON or CSV file
use crate::error::CatalogError;
use csv::WriterBuilder;
use serde::Serialize;
use shared::models::CandleRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

const CSV_HEADER: [&str; 9] = [
    "id",
    "name_ar",
    "name_en",
    "candle_type",
    "trend",
    "description",
    "rules",
    "image_candle_path",
    "image_example_path",
];

// Flat row so absent fields become empty CSV cells instead of missing columns.
#[derive(Serialize)]
struct CsvRow<'a> {
    id: Option<i64>,
    name_ar: &'a str,
    name_en: &'a str,
    candle_type: &'a str,
    trend: &'a str,
    description: &'a str,
    rules: &'a str,
    image_candle_path: &'a str,
    image_example_path: &'a str,
}

impl<'a> From<&'a CandleRecord> for CsvRow<'a> {
    fn from(record: &'a CandleRecord) -> Self {
        CsvRow {
            id: record.id,
            name_ar: record.name_ar(),
            name_en: record.name_en(),
            candle_type: record.candle_type.as_deref().unwrap_or_default(),
            trend: record.trend.as_deref().unwrap_or_default(),
            description: record.description(),
            rules: record.rules(),
            image_candle_path: record.image_candle_path.as_deref().unwrap_or_default(),
            image_example_path: record.image_example_path.as_deref().unwrap_or_default(),
        }
    }
}

/// Saves `records` to `path`, replacing any existing file. Returns how many
/// records were written.
pub fn save_to_file(
    records: &[&CandleRecord],
    path: &Path,
    format: ExportFormat,
) -> Result<usize, CatalogError> {
    let file = File::create(path)?;
    match format {
        ExportFormat::Json => {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, records)
                .map_err(CatalogError::Serialization)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        ExportFormat::Csv => {
            // The header is present even for an empty selection.
            let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
            writer.write_record(CSV_HEADER)?;
            for record in records {
                writer.serialize(CsvRow::from(*record))?;
            }
            writer.flush()?;
        }
    }
    Ok(records.len())
}
