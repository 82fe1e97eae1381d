//! Field coercion helpers shared by the normalizers.

use bias_core::BiasError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Coerce a text cell into an integer contract count.
///
/// Accepts surrounding whitespace, thousands separators and whole-valued
/// floats (`"1234.0"`). Negative or out-of-range values and anything else
/// are parse errors.
pub fn parse_count(field: &str, raw: Option<&str>) -> Result<i64, BiasError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BiasError::MissingField(field.to_string()))?;
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();

    let value = match cleaned.parse::<i64>() {
        Ok(v) => v,
        Err(_) => match cleaned.parse::<f64>() {
            // i64::MAX as f64 rounds up to 2^63, which no longer fits
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => v as i64,
            _ => return Err(BiasError::Parse(format!("{field}: '{raw}' is not an integer"))),
        },
    };
    if value < 0 {
        return Err(BiasError::Parse(format!("{field}: '{raw}' is a negative contract count")));
    }
    Ok(value)
}

/// Report dates come as `YYYY-MM-DD`, `MM/DD/YYYY` or with a trailing time part.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Calendar and news timestamps: RFC 3339, or naive (assumed UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
