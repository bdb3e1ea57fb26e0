// Reads the candle catalog source file into memory
use crate::diagnostics::{CatalogEvent, DiagnosticSink};
use crate::error::CatalogError;
use serde_json::Value;
use shared::models::CandleRecord;
use std::fs;
use std::path::Path;

pub struct CatalogLoader;

impl CatalogLoader {
    /// Loads every record of the JSON list at `path`, in file order.
    ///
    /// Only a missing file is an error. Unparseable content, or any other read
    /// failure, is reported to `sink` and yields an empty catalog.
    pub fn load(path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<CandleRecord>, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        match Self::read_records(path, sink) {
            Ok(records) => {
                sink.emit(&CatalogEvent::Loaded {
                    path: path.to_path_buf(),
                    count: records.len(),
                });
                Ok(records)
            }
            Err(CatalogError::MalformedSource { source }) => {
                sink.emit(&CatalogEvent::MalformedSource {
                    path: path.to_path_buf(),
                    reason: source.to_string(),
                });
                Ok(Vec::new())
            }
            Err(e) => {
                sink.emit(&CatalogEvent::LoadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                Ok(Vec::new())
            }
        }
    }

    fn read_records(path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<CandleRecord>, CatalogError> {
        let content = fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|source| CatalogError::MalformedSource { source })?;

        let Value::Array(items) = document else {
            let source: serde_json::Error =
                serde::de::Error::custom("expected a list of candle records at the top level");
            return Err(CatalogError::MalformedSource { source });
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (record, irregular) = CandleRecord::from_value(item);
                if !irregular.is_empty() {
                    sink.emit(&CatalogEvent::IrregularRecord {
                        index,
                        fields: irregular,
                    });
                }
                record
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_preserves_source_order() {
        let file = create_test_json(
            r#"[
                {"id": 3, "name_en": "Doji", "candle_type": "Indecision", "trend": "Neutral"},
                {"id": 1, "name_en": "Hammer", "candle_type": "Reversal", "trend": "Bullish"},
                {"id": 2, "name_en": "Rising Three Methods", "candle_type": "Continuation", "trend": "Bullish"}
            ]"#,
        );
        let sink = MemorySink::new();
        let records = CatalogLoader::load(file.path(), sink.as_ref()).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
        assert_eq!(
            sink.events(),
            vec![CatalogEvent::Loaded { path: file.path().to_path_buf(), count: 3 }]
        );
    }

    #[test]
    fn test_load_reads_utf8_names() {
        let file = create_test_json(r#"[{"id": 1, "name_ar": "الدوجي", "name_en": "Doji"}]"#);
        let records = CatalogLoader::load(file.path(), &crate::diagnostics::TracingSink).unwrap();
        assert_eq!(records[0].name_ar(), "الدوجي");
    }

    #[test]
    fn test_load_missing_file_is_source_not_found() {
        let sink = MemorySink::new();
        let result = CatalogLoader::load(Path::new("no/such/catalog.json"), sink.as_ref());
        assert!(matches!(result, Err(CatalogError::SourceNotFound { .. })));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_load_invalid_json_falls_back_to_empty() {
        let file = create_test_json(r#"[{"id": 1, "name_en": "Hammer""#);
        let sink = MemorySink::new();
        let records = CatalogLoader::load(file.path(), sink.as_ref()).unwrap();
        assert!(records.is_empty());
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CatalogEvent::MalformedSource { .. }));
    }

    #[test]
    fn test_load_non_list_top_level_is_malformed() {
        let file = create_test_json(r#"{"candles": []}"#);
        let sink = MemorySink::new();
        let records = CatalogLoader::load(file.path(), sink.as_ref()).unwrap();
        assert!(records.is_empty());
        assert!(matches!(sink.events()[0], CatalogEvent::MalformedSource { .. }));
    }

    #[test]
    fn test_load_directory_reports_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let records = CatalogLoader::load(dir.path(), sink.as_ref()).unwrap();
        assert!(records.is_empty());
        assert!(matches!(sink.events()[0], CatalogEvent::LoadFailed { .. }));
    }

    #[test]
    fn test_load_keeps_irregular_records() {
        let file = create_test_json(r#"[{"id": "x", "name_en": "Odd"}, 7, {"id": 2}]"#);
        let sink = MemorySink::new();
        let records = CatalogLoader::load(file.path(), sink.as_ref()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name_en(), "Odd");
        assert_eq!(records[0].id, None);
        assert_eq!(records[1], CandleRecord::default());

        let events = sink.events();
        assert_eq!(
            events[0],
            CatalogEvent::IrregularRecord { index: 0, fields: vec!["id"] }
        );
        assert!(matches!(events[1], CatalogEvent::IrregularRecord { index: 1, .. }));
        assert!(matches!(events[2], CatalogEvent::Loaded { count: 3, .. }));
    }
}
