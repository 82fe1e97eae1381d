//! COT positioning report normalization.
//!
//! The regulator publishes one row per market per report week. For a given
//! instrument we take the latest week among the matching rows and the week
//! exactly seven days before it to derive the week-over-week deltas.

use bias_core::{BiasError, Instrument, PositioningDeltas, PositioningReport};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use crate::parse::{parse_count, parse_report_date};

/// One CSV row, all cells kept as text so a single bad cell only invalidates
/// its own row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCotRow {
    #[serde(rename = "Market_and_Exchange_Names", default)]
    pub market: Option<String>,
    #[serde(rename = "Report_Date_as_MM_DD_YYYY", default)]
    pub report_date: Option<String>,
    #[serde(rename = "Noncommercial_Positions_Long_All", default)]
    pub noncommercial_long: Option<String>,
    #[serde(rename = "Noncommercial_Positions_Short_All", default)]
    pub noncommercial_short: Option<String>,
    #[serde(rename = "Commercial_Positions_Long_All", default)]
    pub commercial_long: Option<String>,
    #[serde(rename = "Commercial_Positions_Short_All", default)]
    pub commercial_short: Option<String>,
    #[serde(rename = "Open_Interest_All", default)]
    pub open_interest: Option<String>,
}

/// Case-insensitive "name contains any of" predicate over market names
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentMatcher {
    patterns: Vec<String>,
}

impl InstrumentMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_uppercase())
                .collect(),
        }
    }

    pub fn nasdaq() -> Self {
        Self::new(["NASDAQ-100", "E-MINI NASDAQ-100", "NASDAQ 100"])
    }

    pub fn gold() -> Self {
        Self::new(["GOLD"])
    }

    pub fn for_instrument(instrument: Instrument) -> Self {
        match instrument {
            Instrument::Nasdaq100 => Self::nasdaq(),
            Instrument::Gold => Self::gold(),
        }
    }

    pub fn matches(&self, market_name: &str) -> bool {
        let upper = market_name.to_uppercase();
        self.patterns.iter().any(|p| upper.contains(p.as_str()))
    }
}

/// Values of a single row after coercion
#[derive(Debug, Clone, Copy)]
struct CotValues {
    noncommercial_long: i64,
    noncommercial_short: i64,
    commercial_long: i64,
    commercial_short: i64,
    open_interest: i64,
}

impl CotValues {
    fn from_row(row: &RawCotRow) -> Result<Self, BiasError> {
        Ok(Self {
            noncommercial_long: parse_count("Noncommercial_Positions_Long_All", row.noncommercial_long.as_deref())?,
            noncommercial_short: parse_count("Noncommercial_Positions_Short_All", row.noncommercial_short.as_deref())?,
            commercial_long: parse_count("Commercial_Positions_Long_All", row.commercial_long.as_deref())?,
            commercial_short: parse_count("Commercial_Positions_Short_All", row.commercial_short.as_deref())?,
            open_interest: parse_count("Open_Interest_All", row.open_interest.as_deref())?,
        })
    }
}

/// Parsed positioning CSV for one cycle
#[derive(Debug, Clone, Default)]
pub struct CotTable {
    rows: Vec<(NaiveDate, RawCotRow)>,
}

impl CotTable {
    /// Parse the CSV text. Rows that fail to deserialize or carry an
    /// unparseable report date are skipped; a header-less or unreadable
    /// payload is an error.
    pub fn from_csv(text: &str) -> Result<Self, BiasError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| BiasError::Parse(format!("COT header: {e}")))?;
        if !headers.iter().any(|h| h == "Market_and_Exchange_Names") {
            return Err(BiasError::MissingField("Market_and_Exchange_Names".to_string()));
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in reader.deserialize::<RawCotRow>() {
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("Skipping unreadable COT row: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            match row.report_date.as_deref().and_then(parse_report_date) {
                Some(date) => rows.push((date, row)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!("COT table: kept {} rows, skipped {}", rows.len(), skipped);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Latest report for the matched market with deltas vs. the prior week.
    ///
    /// Returns `None` when no row matches or the latest row has a malformed
    /// required field. A missing or malformed prior week yields zero deltas.
    pub fn report_for(&self, matcher: &InstrumentMatcher) -> Option<PositioningReport> {
        let matched: Vec<&(NaiveDate, RawCotRow)> = self
            .rows
            .iter()
            .filter(|(_, row)| row.market.as_deref().is_some_and(|m| matcher.matches(m)))
            .collect();

        let latest_date = matched.iter().map(|(date, _)| *date).max()?;
        let prior_date = latest_date.checked_sub_signed(Duration::days(7));

        let latest_row = matched.iter().find(|(date, _)| *date == latest_date).map(|(_, row)| row)?;
        let latest = match CotValues::from_row(latest_row) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Invalid COT record for {:?} on {}: {}", latest_row.market, latest_date, e);
                return None;
            }
        };

        let prior = matched
            .iter()
            .find(|(date, _)| Some(*date) == prior_date)
            .and_then(|(_, row)| CotValues::from_row(row).ok());

        let deltas = prior
            .and_then(|p| {
                Some(PositioningDeltas {
                    long: latest.noncommercial_long.checked_sub(p.noncommercial_long)?,
                    short: latest.noncommercial_short.checked_sub(p.noncommercial_short)?,
                    open_interest: latest.open_interest.checked_sub(p.open_interest)?,
                })
            })
            .unwrap_or_default();

        Some(PositioningReport {
            report_date: latest_date,
            noncommercial_long: latest.noncommercial_long,
            noncommercial_short: latest.noncommercial_short,
            commercial_long: latest.commercial_long,
            commercial_short: latest.commercial_short,
            open_interest: latest.open_interest,
            deltas,
        })
    }
}
