//! Structured diagnostics emitted by the loader and the query layer.
//!
//! Core code never prints. It hands a [`CatalogEvent`] to a [`DiagnosticSink`]
//! and the embedding application decides how to surface it.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Which closed tag set a filter value was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Category,
    Trend,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Category => f.write_str("category"),
            FilterKind::Trend => f.write_str("trend"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Loaded {
        path: PathBuf,
        count: usize,
    },
    /// The source exists but is not a JSON list; the catalog was left empty.
    MalformedSource {
        path: PathBuf,
        reason: String,
    },
    /// Reading the source failed for another reason; the catalog was left empty.
    LoadFailed {
        path: PathBuf,
        reason: String,
    },
    /// A list element had fields of the wrong type, or was not an object.
    IrregularRecord {
        index: usize,
        fields: Vec<&'static str>,
    },
    DuplicateId {
        id: i64,
        first_index: usize,
        index: usize,
    },
    InvalidFilterValue {
        kind: FilterKind,
        value: String,
        valid: &'static [&'static str],
    },
    Exported {
        path: PathBuf,
        count: usize,
    },
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEvent::Loaded { path, count } => {
                write!(f, "loaded {} candles from {}", count, path.display())
            }
            CatalogEvent::MalformedSource { path, reason } => write!(
                f,
                "could not parse {}: {}; continuing with an empty catalog",
                path.display(),
                reason
            ),
            CatalogEvent::LoadFailed { path, reason } => write!(
                f,
                "unexpected error reading {}: {}; continuing with an empty catalog",
                path.display(),
                reason
            ),
            CatalogEvent::IrregularRecord { index, fields } => write!(
                f,
                "record #{} has unusable fields ({}), treated as absent",
                index,
                fields.join(", ")
            ),
            CatalogEvent::DuplicateId {
                id,
                first_index,
                index,
            } => write!(
                f,
                "id {} at record #{} duplicates record #{}; lookups return the first",
                id, index, first_index
            ),
            CatalogEvent::InvalidFilterValue { kind, value, valid } => write!(
                f,
                "{} '{}' is not valid. Valid values: {}",
                kind,
                value,
                valid.join(", ")
            ),
            CatalogEvent::Exported { path, count } => {
                write!(f, "saved {} candles to {}", count, path.display())
            }
        }
    }
}

/// Receiver for catalog diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: &CatalogEvent);
}

pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: &CatalogEvent) {
        match event {
            CatalogEvent::Loaded { path, count } => {
                tracing::info!(path = %path.display(), count, "{}", event)
            }
            CatalogEvent::Exported { path, count } => {
                tracing::info!(path = %path.display(), count, "{}", event)
            }
            CatalogEvent::MalformedSource { path, .. } => {
                tracing::warn!(path = %path.display(), "{}", event)
            }
            CatalogEvent::LoadFailed { path, .. } => {
                tracing::error!(path = %path.display(), "{}", event)
            }
            CatalogEvent::IrregularRecord { index, .. } => tracing::warn!(index, "{}", event),
            CatalogEvent::DuplicateId { id, .. } => tracing::warn!(id, "{}", event),
            CatalogEvent::InvalidFilterValue { kind, value, .. } => {
                tracing::warn!(kind = %kind, value = %value, "{}", event)
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<CatalogEvent>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &CatalogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CandleType;

    #[test]
    fn test_invalid_filter_message_names_value_and_valid_set() {
        let event = CatalogEvent::InvalidFilterValue {
            kind: FilterKind::Category,
            value: "NotARealType".to_string(),
            valid: CandleType::NAMES,
        };
        assert_eq!(
            event.to_string(),
            "category 'NotARealType' is not valid. Valid values: Reversal, Continuation, Indecision"
        );
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(&CatalogEvent::Loaded { path: "a.json".into(), count: 2 });
        sink.emit(&CatalogEvent::Exported { path: "b.json".into(), count: 1 });
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CatalogEvent::Loaded { count: 2, .. }));

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
