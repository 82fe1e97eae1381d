//! Bias Engine
//!
//! Wires scorers into per-instrument profiles, combines them into a composite
//! score and label, and drives the fetch → normalize → score cycle over a
//! [`MarketFeeds`] implementation with a TTL cache in front of it.

use bias_core::{BiasResult, MarketSnapshot};

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod cycle;
pub mod feeds;
pub mod profile;

pub use aggregator::evaluate_profile;
pub use cache::{CacheTtls, FeedCache, TtlMap};
pub use config::EngineConfig;
pub use cycle::EvaluationCycle;
pub use feeds::MarketFeeds;
pub use profile::{ProfileSet, SignalProfile, WeightedSlot};

/// A fixed list of profiles evaluated together against one snapshot
pub struct BiasEngine {
    profiles: Vec<SignalProfile>,
}

impl BiasEngine {
    pub fn new(profiles: Vec<SignalProfile>) -> Self {
        Self { profiles }
    }

    pub fn from_config(config: &EngineConfig, set: ProfileSet) -> Self {
        Self::new(set.build(config))
    }

    pub fn profiles(&self) -> &[SignalProfile] {
        &self.profiles
    }

    /// One result per profile, in profile order
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> Vec<BiasResult> {
        self.profiles
            .iter()
            .map(|profile| evaluate_profile(profile, snapshot))
            .collect()
    }
}
