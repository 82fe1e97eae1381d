use serde::{Deserialize, Serialize};

/// Discrete bias tag rendered next to the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasLabel {
    Bullish,
    MildBullish,
    Neutral,
    MildBearish,
    Bearish,
}

impl BiasLabel {
    /// Five-band mapping used by the multi-signal profiles.
    ///
    /// `>= 1.5` Bullish, `[0.5, 1.5)` Mild Bullish, `(-0.5, 0.5)` Neutral,
    /// `(-1.5, -0.5]` Mild Bearish, `< -1.5` Bearish.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return BiasLabel::Neutral;
        }
        match score {
            s if s >= 1.5 => BiasLabel::Bullish,
            s if s >= 0.5 => BiasLabel::MildBullish,
            s if s > -0.5 => BiasLabel::Neutral,
            s if s > -1.5 => BiasLabel::MildBearish,
            _ => BiasLabel::Bearish,
        }
    }

    /// Plain sign mapping used by the macro + news profiles
    pub fn from_sign(score: f64) -> Self {
        if score > 0.0 {
            BiasLabel::Bullish
        } else if score < 0.0 {
            BiasLabel::Bearish
        } else {
            BiasLabel::Neutral
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            BiasLabel::Bullish => "Bullish",
            BiasLabel::MildBullish => "Mild Bullish",
            BiasLabel::Neutral => "Neutral",
            BiasLabel::MildBearish => "Mild Bearish",
            BiasLabel::Bearish => "Bearish",
        }
    }
}

impl std::fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Which banding a profile renders its composite with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelScheme {
    FiveBand,
    Sign,
}

impl LabelScheme {
    pub fn label(&self, score: f64) -> BiasLabel {
        match self {
            LabelScheme::FiveBand => BiasLabel::from_score(score),
            LabelScheme::Sign => BiasLabel::from_sign(score),
        }
    }
}
