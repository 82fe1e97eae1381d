//! Signal Normalizer
//!
//! Turns raw feed payloads (COT CSV, quotes, option chains, calendar JSON,
//! headlines) into the typed records the scorers consume. Malformed input
//! never escapes as an error past this crate: a record that cannot be coerced
//! becomes `None` and the scorer reports "no data".

pub mod breadth;
pub mod calendar;
pub mod cross_asset;
pub mod news;
pub mod options;
pub mod parse;
pub mod positioning;
pub mod quotes;

pub use breadth::compute_breadth;
pub use calendar::{normalize_calendar, parse_calendar};
pub use cross_asset::{cross_asset_from_board, CrossAssetTickers};
pub use news::{normalize_headlines, RawHeadline};
pub use options::{summarize_chain, OptionType, RawOptionContract};
pub use positioning::{CotTable, InstrumentMatcher, RawCotRow};
pub use quotes::{build_quote_board, normalize_quote, RawQuote};
