//! Per-signal scoring rules.
//!
//! Every rule is available twice: as a pure `score_*` function over an
//! optional record, and as a [`SignalScorer`](bias_core::SignalScorer)
//! binding that knows which record of the cycle snapshot to read. Profiles in
//! the engine are built from the bindings.

pub mod breadth;
pub mod cross_asset;
pub mod inflation;
pub mod macro_calendar;
pub mod momentum;
pub mod news;
pub mod options;
pub mod positioning;

pub use breadth::{score_breadth, BreadthScorer, BREADTH_RANGE};
pub use cross_asset::{score_cross_asset, CrossAssetScorer, CROSS_ASSET_RANGE};
pub use inflation::{ReservedInflationScorer, INFLATION_RANGE};
pub use macro_calendar::{score_macro, MacroCalendarScorer, MACRO_RANGE};
pub use momentum::{score_momentum, PriceMomentumScorer, MOMENTUM_RANGE};
pub use news::{score_headlines, NewsKeywordScorer, NEWS_RANGE};
pub use options::{score_options, OptionsSkewScorer, OPTIONS_RANGE};
pub use positioning::{
    score_gold_positioning, score_positioning, PositioningRule, PositioningScorer, POSITIONING_RANGE,
};
