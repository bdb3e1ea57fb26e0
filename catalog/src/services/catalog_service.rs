// Read-only query layer over the loaded candle catalog
use crate::config::settings::CatalogSettings;
use crate::data::export::{self, ExportFormat};
use crate::data::loader::CatalogLoader;
use crate::diagnostics::{CatalogEvent, DiagnosticSink, FilterKind, SharedSink, TracingSink};
use crate::error::CatalogError;
use shared::models::{CandleRecord, CandleType, Language, Trend};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The candle catalog and every query the presentation layer runs against it.
///
/// The record list is loaded once at construction and never changes. Every
/// query is a single pass over it that keeps catalog order.
pub struct CandleCatalog {
    source: Option<PathBuf>,
    candles: Vec<CandleRecord>,
    sink: SharedSink,
}

impl CandleCatalog {
    /// Loads the catalog at `path`, reporting diagnostics through `tracing`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::open_with_sink(path, Arc::new(TracingSink))
    }

    pub fn open_with_sink(path: impl AsRef<Path>, sink: SharedSink) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let candles = CatalogLoader::load(path, sink.as_ref())?;
        let mut catalog = Self::from_records(candles, sink);
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        Self::open(&settings.data_file)
    }

    /// Wraps records that are already in memory. No source file is attached.
    pub fn from_records(candles: Vec<CandleRecord>, sink: SharedSink) -> Self {
        report_duplicate_ids(&candles, sink.as_ref());
        CandleCatalog {
            source: None,
            candles,
            sink,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn all(&self) -> &[CandleRecord] {
        &self.candles
    }

    fn select(&self, keep: impl Fn(&CandleRecord) -> bool) -> Vec<&CandleRecord> {
        self.candles.iter().filter(|&c| keep(c)).collect()
    }

    /// Records of the category named by `candle_type`. An unknown name gives
    /// an empty result and an `InvalidFilterValue` diagnostic.
    pub fn by_category(&self, candle_type: &str) -> Vec<&CandleRecord> {
        match candle_type.parse::<CandleType>() {
            Ok(t) => self.of_type(t),
            Err(e) => {
                self.sink.emit(&CatalogEvent::InvalidFilterValue {
                    kind: FilterKind::Category,
                    value: e.value,
                    valid: e.valid,
                });
                Vec::new()
            }
        }
    }

    pub fn of_type(&self, candle_type: CandleType) -> Vec<&CandleRecord> {
        self.select(|c| c.is_a(candle_type))
    }

    /// Records with the trend named by `trend`. Unknown names behave as in
    /// [`CandleCatalog::by_category`].
    pub fn by_trend(&self, trend: &str) -> Vec<&CandleRecord> {
        match trend.parse::<Trend>() {
            Ok(t) => self.of_trend(t),
            Err(e) => {
                self.sink.emit(&CatalogEvent::InvalidFilterValue {
                    kind: FilterKind::Trend,
                    value: e.value,
                    valid: e.valid,
                });
                Vec::new()
            }
        }
    }

    pub fn of_trend(&self, trend: Trend) -> Vec<&CandleRecord> {
        self.select(|c| c.trends(trend))
    }

    pub fn reversal(&self) -> Vec<&CandleRecord> {
        self.of_type(CandleType::Reversal)
    }

    pub fn continuation(&self) -> Vec<&CandleRecord> {
        self.of_type(CandleType::Continuation)
    }

    pub fn indecision(&self) -> Vec<&CandleRecord> {
        self.of_type(CandleType::Indecision)
    }

    pub fn bullish(&self) -> Vec<&CandleRecord> {
        self.of_trend(Trend::Bullish)
    }

    pub fn bearish(&self) -> Vec<&CandleRecord> {
        self.of_trend(Trend::Bearish)
    }

    pub fn neutral(&self) -> Vec<&CandleRecord> {
        self.of_trend(Trend::Neutral)
    }

    pub fn bullish_reversal(&self) -> Vec<&CandleRecord> {
        self.select(|c| c.is_a(CandleType::Reversal) && c.trends(Trend::Bullish))
    }

    pub fn bearish_reversal(&self) -> Vec<&CandleRecord> {
        self.select(|c| c.is_a(CandleType::Reversal) && c.trends(Trend::Bearish))
    }

    /// First record carrying `id`, in catalog order.
    pub fn by_id(&self, id: i64) -> Option<&CandleRecord> {
        self.candles.iter().find(|c| c.id == Some(id))
    }

    /// Records whose name in `language` contains `query`, ignoring case.
    /// An empty query matches every record.
    pub fn by_name(&self, query: &str, language: Language) -> Vec<&CandleRecord> {
        let needle = query.to_lowercase();
        self.select(|c| c.name(language).to_lowercase().contains(&needle))
    }

    /// Records where `keyword` appears in either name, the description or the
    /// rules, ignoring case. Each record appears at most once.
    pub fn search(&self, keyword: &str) -> Vec<&CandleRecord> {
        let needle = keyword.to_lowercase();
        self.select(|c| {
            c.searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }

    /// Record count per category. All three categories are always present.
    pub fn count_by_category(&self) -> BTreeMap<CandleType, usize> {
        let mut counts: BTreeMap<CandleType, usize> =
            CandleType::ALL.into_iter().map(|t| (t, 0)).collect();
        for t in self.candles.iter().filter_map(CandleRecord::category) {
            *counts.entry(t).or_default() += 1;
        }
        counts
    }

    /// Record count per trend. All three trends are always present.
    pub fn count_by_trend(&self) -> BTreeMap<Trend, usize> {
        let mut counts: BTreeMap<Trend, usize> = Trend::ALL.into_iter().map(|t| (t, 0)).collect();
        for t in self.candles.iter().filter_map(CandleRecord::trend_kind) {
            *counts.entry(t).or_default() += 1;
        }
        counts
    }

    /// Writes `records` to a new file. The catalog's own source is never a
    /// valid target.
    pub fn export(
        &self,
        records: &[&CandleRecord],
        path: &Path,
        format: ExportFormat,
    ) -> Result<usize, CatalogError> {
        if let Some(source) = &self.source {
            if same_file(source, path) {
                return Err(CatalogError::ExportTargetIsSource {
                    path: path.to_path_buf(),
                });
            }
        }
        let count = export::save_to_file(records, path, format)?;
        self.sink.emit(&CatalogEvent::Exported {
            path: path.to_path_buf(),
            count,
        });
        Ok(count)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn report_duplicate_ids(candles: &[CandleRecord], sink: &dyn DiagnosticSink) {
    let mut first_seen: HashMap<i64, usize> = HashMap::new();
    for (index, candle) in candles.iter().enumerate() {
        let Some(id) = candle.id else { continue };
        if let Some(&first_index) = first_seen.get(&id) {
            sink.emit(&CatalogEvent::DuplicateId {
                id,
                first_index,
                index,
            });
        } else {
            first_seen.insert(id, index);
        }
    }
}
