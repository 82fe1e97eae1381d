use bias_core::{Instrument, LabelScheme, SignalScorer};
use signal_scorers::{
    BreadthScorer, CrossAssetScorer, MacroCalendarScorer, NewsKeywordScorer, OptionsSkewScorer,
    PositioningRule, PositioningScorer, PriceMomentumScorer, ReservedInflationScorer,
};

use crate::config::EngineConfig;

/// One fixed weight bound to one scorer
pub struct WeightedSlot {
    pub weight: f64,
    pub scorer: Box<dyn SignalScorer>,
}

impl WeightedSlot {
    pub fn new(weight: f64, scorer: impl SignalScorer + 'static) -> Self {
        Self {
            weight,
            scorer: Box::new(scorer),
        }
    }
}

/// Named signal set for one instrument.
///
/// Missing signals are never re-weighted: a slot without data contributes
/// zero and pulls the composite toward neutral.
pub struct SignalProfile {
    pub name: String,
    pub instrument: Instrument,
    pub label_scheme: LabelScheme,
    pub slots: Vec<WeightedSlot>,
}

impl SignalProfile {
    pub fn weight_sum(&self) -> f64 {
        self.slots.iter().map(|s| s.weight).sum()
    }

    /// Largest composite magnitude the slots can produce
    pub fn bound(&self) -> f64 {
        self.slots
            .iter()
            .map(|s| s.weight.abs() * s.scorer.range().magnitude())
            .sum()
    }

    /// Positioning, momentum, options, breadth and macro for the Nasdaq 100
    pub fn nasdaq_rich(config: &EngineConfig) -> Self {
        Self {
            name: "nasdaq-rich".to_string(),
            instrument: Instrument::Nasdaq100,
            label_scheme: LabelScheme::FiveBand,
            slots: vec![
                WeightedSlot::new(0.15, PositioningScorer::new(Instrument::Nasdaq100, PositioningRule::Generic)),
                WeightedSlot::new(0.25, PriceMomentumScorer::new(config.nasdaq_benchmark.clone())),
                WeightedSlot::new(0.20, OptionsSkewScorer::new(config.nasdaq_options_ticker.clone())),
                WeightedSlot::new(0.20, BreadthScorer),
                WeightedSlot::new(0.20, MacroCalendarScorer::new(config.macro_window_days)),
            ],
        }
    }

    /// Positioning, reserved inflation, GLD options and cross-asset for gold
    pub fn gold_rich(config: &EngineConfig) -> Self {
        Self {
            name: "gold-rich".to_string(),
            instrument: Instrument::Gold,
            label_scheme: LabelScheme::FiveBand,
            slots: vec![
                WeightedSlot::new(0.35, PositioningScorer::new(Instrument::Gold, PositioningRule::Gold)),
                WeightedSlot::new(0.25, ReservedInflationScorer),
                WeightedSlot::new(0.20, OptionsSkewScorer::new(config.gold_options_ticker.clone())),
                WeightedSlot::new(0.20, CrossAssetScorer),
            ],
        }
    }

    /// Simplified variant: macro calendar and keyword news, sign-banded
    pub fn macro_news(instrument: Instrument, config: &EngineConfig) -> Self {
        let keywords = match instrument {
            Instrument::Nasdaq100 => config.nasdaq_news_keywords.clone(),
            Instrument::Gold => config.gold_news_keywords.clone(),
        };
        let prefix = match instrument {
            Instrument::Nasdaq100 => "nasdaq",
            Instrument::Gold => "gold",
        };

        Self {
            name: format!("{}-macro-news", prefix),
            instrument,
            label_scheme: LabelScheme::Sign,
            slots: vec![
                WeightedSlot::new(0.50, MacroCalendarScorer::new(config.macro_window_days)),
                WeightedSlot::new(
                    0.50,
                    NewsKeywordScorer::new(instrument, keywords, config.news_lookback_hours),
                ),
            ],
        }
    }
}

/// Which profiles an engine evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSet {
    Rich,
    Simple,
    All,
}

impl ProfileSet {
    pub fn build(&self, config: &EngineConfig) -> Vec<SignalProfile> {
        let rich = || vec![SignalProfile::nasdaq_rich(config), SignalProfile::gold_rich(config)];
        let simple = || {
            vec![
                SignalProfile::macro_news(Instrument::Nasdaq100, config),
                SignalProfile::macro_news(Instrument::Gold, config),
            ]
        };
        match self {
            ProfileSet::Rich => rich(),
            ProfileSet::Simple => simple(),
            ProfileSet::All => {
                let mut profiles = rich();
                profiles.extend(simple());
                profiles
            }
        }
    }
}

impl std::str::FromStr for ProfileSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rich" => Ok(ProfileSet::Rich),
            "simple" => Ok(ProfileSet::Simple),
            "all" => Ok(ProfileSet::All),
            other => Err(format!("unknown profile set '{}' (expected rich, simple or all)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bias_core::SignalKind;

    #[test]
    fn test_weights_sum_to_one() {
        let config = EngineConfig::default();
        for profile in ProfileSet::All.build(&config) {
            assert_relative_eq!(profile.weight_sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_nasdaq_bound_within_documented_range() {
        let profile = SignalProfile::nasdaq_rich(&EngineConfig::default());
        // 0.15*2 + 0.25*1 + 0.20*1 + 0.20*3 + 0.20*3
        assert_relative_eq!(profile.bound(), 1.95, epsilon = 1e-9);
        assert!(profile.bound() <= 2.6);
    }

    #[test]
    fn test_gold_keeps_reserved_inflation_slot() {
        let profile = SignalProfile::gold_rich(&EngineConfig::default());
        let kinds: Vec<SignalKind> = profile.slots.iter().map(|s| s.scorer.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SignalKind::Positioning,
                SignalKind::Inflation,
                SignalKind::OptionsSkew,
                SignalKind::CrossAsset
            ]
        );
        assert_relative_eq!(profile.slots[1].weight, 0.25);
    }

    #[test]
    fn test_profile_set_parsing() {
        assert_eq!("ALL".parse::<ProfileSet>(), Ok(ProfileSet::All));
        assert!("fancy".parse::<ProfileSet>().is_err());
        assert_eq!(ProfileSet::Simple.build(&EngineConfig::default()).len(), 2);
    }
}
