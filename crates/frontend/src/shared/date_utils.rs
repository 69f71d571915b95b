/// Utilities for date formatting and parsing
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Format a backend timestamp as DD/MM/YYYY
/// Example: "2024-03-15T14:02:26.123Z" -> "15/03/2024"
///
/// Unparseable values are returned unchanged.
pub fn format_created_date(value: &str) -> String {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.date_naive().format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return dt.date().format(DISPLAY_FORMAT).to_string();
    }
    match parse_input_date(value) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => value.to_string(),
    }
}

/// Value of `<input type="date">` ("YYYY-MM-DD"); empty means "not set"
pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, INPUT_FORMAT).ok()
}

pub fn format_input_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_created_date() {
        assert_eq!(format_created_date("2024-03-15T14:02:26.123Z"), "15/03/2024");
        assert_eq!(format_created_date("2024-03-15T14:02:26+05:30"), "15/03/2024");
        assert_eq!(format_created_date("2024-03-15T14:02:26"), "15/03/2024");
        assert_eq!(format_created_date("2024-03-15 14:02:26"), "15/03/2024");
        assert_eq!(format_created_date("2024-03-15"), "15/03/2024");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_created_date("invalid"), "invalid");
        assert_eq!(format_created_date(""), "");
    }

    #[test]
    fn test_input_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_input_date("2024-03-01"), date);
        assert_eq!(parse_input_date(" "), None);
        assert_eq!(parse_input_date("01.03.2024"), None);
        assert_eq!(format_input_date(date), "2024-03-01");
        assert_eq!(format_input_date(None), "");
    }
}
