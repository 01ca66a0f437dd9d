use chrono::{DateTime, NaiveDate, Utc};

/// Strips zero-width characters and BOMs that spreadsheet exports leave behind.
pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Yes/no cells as exported by the portal admin, in English or Portuguese.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "sim" | "s" | "1" => Some(true),
        "false" | "no" | "n" | "não" | "nao" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Splits `a;b;c` lists, dropping blank entries.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .filter_map(clean_cell)
        .collect()
}

/// Splits `left|right` pairs; a missing right side reads as empty.
pub(crate) fn split_pair(value: &str) -> (String, String) {
    match value.split_once('|') {
        Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
        None => (value.trim().to_string(), String::new()),
    }
}
