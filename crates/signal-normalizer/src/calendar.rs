//! Economic calendar normalization.
//!
//! The calendar feed returns a JSON array of loosely-typed objects. Each event
//! is coerced independently; an event that cannot be coerced is dropped so it
//! contributes nothing to the macro score.

use bias_core::{BiasError, ImpactLevel, MacroEvent};
use serde_json::Value;

use crate::parse::parse_timestamp;

fn field<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn parse_impact(obj: &serde_json::Map<String, Value>) -> ImpactLevel {
    match field(obj, &["Impact", "impact"]) {
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "high" => ImpactLevel::High,
            "medium" => ImpactLevel::Medium,
            _ => ImpactLevel::Low,
        },
        _ => match field(obj, &["Importance", "importance"]).and_then(Value::as_i64) {
            Some(3) => ImpactLevel::High,
            Some(2) => ImpactLevel::Medium,
            _ => ImpactLevel::Low,
        },
    }
}

/// `Ok(None)` = pending (absent or empty); `Err` = present but not numeric.
fn parse_surprise(obj: &serde_json::Map<String, Value>) -> Result<Option<f64>, BiasError> {
    match field(obj, &["Surprise", "surprise"]) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| BiasError::Parse(format!("surprise {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| BiasError::Parse(format!("surprise '{s}'"))),
        Some(other) => Err(BiasError::Parse(format!("surprise {other}"))),
    }
}

fn parse_event(value: &Value) -> Result<MacroEvent, BiasError> {
    let obj = value
        .as_object()
        .ok_or_else(|| BiasError::Parse("calendar entry is not an object".to_string()))?;

    let date = field(obj, &["Date", "date"])
        .and_then(Value::as_str)
        .ok_or_else(|| BiasError::MissingField("Date".to_string()))?;
    let timestamp = parse_timestamp(date).ok_or_else(|| BiasError::Parse(format!("date '{date}'")))?;

    let country = field(obj, &["Country", "country"])
        .and_then(Value::as_str)
        .ok_or_else(|| BiasError::MissingField("Country".to_string()))?
        .to_string();

    let name = field(obj, &["Event", "event", "Category"])
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(MacroEvent {
        timestamp,
        country,
        name,
        impact: parse_impact(obj),
        surprise: parse_surprise(obj)?,
    })
}

/// Parse the calendar payload keeping only `countries` (all when empty).
///
/// Errors only when the payload itself is not an array.
pub fn parse_calendar<S: AsRef<str>>(payload: &Value, countries: &[S]) -> Result<Vec<MacroEvent>, BiasError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| BiasError::Parse("calendar payload is not an array".to_string()))?;

    let mut events = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_event(entry) {
            Ok(event) => {
                let wanted = countries.is_empty()
                    || countries.iter().any(|c| c.as_ref().eq_ignore_ascii_case(&event.country));
                if wanted {
                    events.push(event);
                }
            }
            Err(e) => tracing::debug!("Dropping calendar entry: {}", e),
        }
    }
    Ok(events)
}

/// Boundary form of [`parse_calendar`]: a malformed payload becomes `None`.
pub fn normalize_calendar<S: AsRef<str>>(payload: &Value, countries: &[S]) -> Option<Vec<MacroEvent>> {
    match parse_calendar(payload, countries) {
        Ok(events) => Some(events),
        Err(e) => {
            tracing::warn!("Calendar payload unusable: {}", e);
            None
        }
    }
}
