// Display helpers shared by every presentation of the catalog.
use crate::models::CandleRecord;

const RULE_WIDTH: usize = 50;

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

/// Renders one record as a framed, multi-line block.
pub fn format_card(record: &CandleRecord) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{rule}\n\
         ID:          {id}\n\
         Name (ar):   {}\n\
         Name (en):   {}\n\
         Type:        {}\n\
         Trend:       {}\n\
         Description: {}\n\
         Rules:       {}\n\
         {rule}",
        or_dash(record.name_ar.as_deref()),
        or_dash(record.name_en.as_deref()),
        or_dash(record.candle_type.as_deref()),
        or_dash(record.trend.as_deref()),
        or_dash(record.description.as_deref()),
        or_dash(record.rules.as_deref()),
    )
}

/// One-line summary used by list views.
pub fn format_row(record: &CandleRecord) -> String {
    let id = record
        .id
        .map(|id| format!("{id:>3}"))
        .unwrap_or_else(|| "  -".to_string());
    format!(
        "{id}  {} ({})  [{} / {}]",
        or_dash(record.name_ar.as_deref()),
        or_dash(record.name_en.as_deref()),
        or_dash(record.candle_type.as_deref()),
        or_dash(record.trend.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hammer() -> CandleRecord {
        CandleRecord {
            id: Some(1),
            name_ar: Some("المطرقة".to_string()),
            name_en: Some("Hammer".to_string()),
            candle_type: Some("Reversal".to_string()),
            trend: Some("Bullish".to_string()),
            description: Some("Small body near the top".to_string()),
            rules: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_card_lists_every_field() {
        let card = format_card(&hammer());
        assert!(card.starts_with(&"=".repeat(RULE_WIDTH)));
        assert!(card.contains("ID:          1"));
        assert!(card.contains("Name (ar):   المطرقة"));
        assert!(card.contains("Trend:       Bullish"));
        assert!(card.contains("Rules:       -"));
        assert_eq!(card.lines().count(), 9);
        assert!(card.ends_with(&"=".repeat(RULE_WIDTH)));
        assert!(card.lines().all(|line| !line.starts_with(' ')));
    }

    #[test]
    fn test_row_with_missing_id() {
        let record = CandleRecord { id: None, ..hammer() };
        assert_eq!(format_row(&record), "  -  المطرقة (Hammer)  [Reversal / Bullish]");
    }
}
