use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not one of the closed tag sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
    pub valid: &'static [&'static str],
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', expected one of: {}",
            self.kind,
            self.value,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseTagError {}

/// What a pattern implies about the ongoing price trend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CandleType {
    Reversal,
    Continuation,
    Indecision,
}

impl CandleType {
    pub const ALL: [CandleType; 3] = [
        CandleType::Reversal,
        CandleType::Continuation,
        CandleType::Indecision,
    ];
    pub const NAMES: &'static [&'static str] = &["Reversal", "Continuation", "Indecision"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandleType::Reversal => "Reversal",
            CandleType::Continuation => "Continuation",
            CandleType::Indecision => "Indecision",
        }
    }
}

impl FromStr for CandleType {
    type Err = ParseTagError;

    // Tags are matched exactly, the same way they are stored in the catalog file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTagError {
                kind: "candle type",
                value: s.to_string(),
                valid: CandleType::NAMES,
            })
    }
}

impl fmt::Display for CandleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional bias associated with a pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Bullish, Trend::Bearish, Trend::Neutral];
    pub const NAMES: &'static [&'static str] = &["Bullish", "Bearish", "Neutral"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "Bullish",
            Trend::Bearish => "Bearish",
            Trend::Neutral => "Neutral",
        }
    }
}

impl FromStr for Trend {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trend::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTagError {
                kind: "trend",
                value: s.to_string(),
                valid: Trend::NAMES,
            })
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which display name a name lookup runs against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl FromStr for Language {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(ParseTagError {
                kind: "language",
                value: other.to_string(),
                valid: &["ar", "en"],
            }),
        }
    }
}

/// One candlestick pattern entry of the reference catalog.
///
/// Every field may be missing from the source file. The accessor methods give
/// the single default each field falls back to, so query code never deals
/// with `None` directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_candle_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_example_path: Option<String>,
}

impl CandleRecord {
    pub fn name_ar(&self) -> &str {
        self.name_ar.as_deref().unwrap_or_default()
    }

    pub fn name_en(&self) -> &str {
        self.name_en.as_deref().unwrap_or_default()
    }

    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Ar => self.name_ar(),
            Language::En => self.name_en(),
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn rules(&self) -> &str {
        self.rules.as_deref().unwrap_or_default()
    }

    /// Parsed category; `None` when absent or outside the closed set.
    pub fn category(&self) -> Option<CandleType> {
        self.candle_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Parsed trend; `None` when absent or outside the closed set.
    pub fn trend_kind(&self) -> Option<Trend> {
        self.trend.as_deref().and_then(|t| t.parse().ok())
    }

    pub fn is_a(&self, candle_type: CandleType) -> bool {
        self.category() == Some(candle_type)
    }

    pub fn trends(&self, trend: Trend) -> bool {
        self.trend_kind() == Some(trend)
    }

    /// Text fields covered by free-text search, in match priority order.
    pub fn searchable_fields(&self) -> [&str; 4] {
        [self.name_ar(), self.name_en(), self.description(), self.rules()]
    }

    /// Builds a record from an arbitrary JSON value without failing.
    ///
    /// Text fields take numbers and booleans in their textual form, and the
    /// id takes floats with no fractional part. Any other value of the wrong
    /// JSON type is treated as absent and reported back by name. A non-object
    /// value yields an empty record.
    pub fn from_value(value: &Value) -> (CandleRecord, Vec<&'static str>) {
        let Some(object) = value.as_object() else {
            return (CandleRecord::default(), vec!["<not an object>"]);
        };

        let mut irregular = Vec::new();
        let id = match object.get("id") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let id = integral(v);
                if id.is_none() {
                    irregular.push("id");
                }
                id
            }
        };

        let mut text = |key: &'static str| text_field(object, key, &mut irregular);
        let record = CandleRecord {
            id,
            name_ar: text("name_ar"),
            name_en: text("name_en"),
            candle_type: text("candle_type"),
            trend: text("trend"),
            description: text("description"),
            rules: text("rules"),
            image_candle_path: text("image_candle_path"),
            image_example_path: text("image_example_path"),
        };
        (record, irregular)
    }
}

/// Integer ids, also accepting floats with no fractional part (`1.0`).
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn text_field(
    object: &Map<String, Value>,
    key: &'static str,
    irregular: &mut Vec<&'static str>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        // Scalars keep their textual form so they stay searchable.
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => {
            irregular.push(key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_parse_exactly() {
        assert_eq!("Reversal".parse::<CandleType>().unwrap(), CandleType::Reversal);
        assert_eq!("Neutral".parse::<Trend>().unwrap(), Trend::Neutral);
        assert!("reversal".parse::<CandleType>().is_err());
        assert!("Sideways".parse::<Trend>().is_err());
    }

    #[test]
    fn test_parse_error_names_valid_set() {
        let err = "NotARealType".parse::<CandleType>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NotARealType"));
        assert!(msg.contains("Reversal, Continuation, Indecision"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record = CandleRecord::default();
        assert_eq!(record.name_ar(), "");
        assert_eq!(record.rules(), "");
        assert_eq!(record.category(), None);
        assert_eq!(record.trend_kind(), None);
    }

    #[test]
    fn test_out_of_set_tags_are_kept_but_unparsed() {
        let record = CandleRecord {
            candle_type: Some("Mystery".to_string()),
            trend: Some("Bullish".to_string()),
            ..Default::default()
        };
        assert_eq!(record.candle_type.as_deref(), Some("Mystery"));
        assert_eq!(record.category(), None);
        assert!(record.trends(Trend::Bullish));
    }

    #[test]
    fn test_from_value_full_object() {
        let value = json!({
            "id": 1,
            "name_ar": "المطرقة",
            "name_en": "Hammer",
            "candle_type": "Reversal",
            "trend": "Bullish",
            "description": "small body",
            "image_candle_path": "hammer.png"
        });
        let (record, irregular) = CandleRecord::from_value(&value);
        assert!(irregular.is_empty());
        assert_eq!(record.id, Some(1));
        assert_eq!(record.name(Language::Ar), "المطرقة");
        assert_eq!(record.name(Language::En), "Hammer");
        assert!(record.is_a(CandleType::Reversal));
        assert_eq!(record.rules, None);
        assert_eq!(record.image_candle_path.as_deref(), Some("hammer.png"));
    }

    #[test]
    fn test_from_value_wrong_types_are_absent() {
        let value = json!({ "id": "seven", "name_en": [42], "trend": "Bearish" });
        let (record, irregular) = CandleRecord::from_value(&value);
        assert_eq!(record.id, None);
        assert_eq!(record.name_en, None);
        assert_eq!(record.trend_kind(), Some(Trend::Bearish));
        assert_eq!(irregular, vec!["id", "name_en"]);
    }

    #[test]
    fn test_from_value_accepts_integral_float_id_and_scalar_text() {
        let value = json!({ "id": 1.0, "rules": 2024, "description": true });
        let (record, irregular) = CandleRecord::from_value(&value);
        assert!(irregular.is_empty());
        assert_eq!(record.id, Some(1));
        assert_eq!(record.rules(), "2024");
        assert_eq!(record.description(), "true");
    }

    #[test]
    fn test_from_value_fractional_id_is_absent() {
        let (record, irregular) = CandleRecord::from_value(&json!({ "id": 1.5 }));
        assert_eq!(record.id, None);
        assert_eq!(irregular, vec!["id"]);
    }

    #[test]
    fn test_from_value_non_object() {
        let (record, irregular) = CandleRecord::from_value(&json!([1, 2]));
        assert_eq!(record, CandleRecord::default());
        assert_eq!(irregular.len(), 1);
    }
}
