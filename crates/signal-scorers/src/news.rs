use bias_core::{Headline, Instrument, MarketSnapshot, ScoreRange, SignalKind, SignalScore, SignalScorer};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

pub const NEWS_RANGE: ScoreRange = ScoreRange { min: -3.0, max: 3.0 };

pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

pub const NASDAQ_KEYWORDS: &[&str] = &["nasdaq", "tech stocks", "qqq", "nasdaq-100"];
pub const GOLD_KEYWORDS: &[&str] = &["gold", "bullion", "xau", "precious metals"];

const BULLISH_WORDS: &[&str] = &[
    "bullish", "rally", "rallies", "surge", "surges", "gain", "gains", "jump", "jumps",
    "rise", "rises", "climb", "climbs", "soar", "soars", "record", "high", "rebound",
    "rebounds", "recovery", "strong", "strength", "beat", "beats", "upgrade", "optimism",
    "optimistic", "boost", "boosts", "advance", "advances", "inflows", "demand", "tailwind",
];

const BEARISH_WORDS: &[&str] = &[
    "bearish", "selloff", "sell-off", "slump", "slumps", "plunge", "plunges", "fall",
    "falls", "drop", "drops", "decline", "declines", "slide", "slides", "tumble",
    "tumbles", "crash", "low", "weak", "weakness", "miss", "misses", "downgrade", "fear",
    "fears", "concern", "concerns", "outflows", "pressure", "headwind", "retreat", "losses",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't",
    "weren't", "won't", "hardly", "barely", "without", "fails", "failed",
];

const NEGATION_WINDOW: usize = 3;

/// Net bullish minus bearish word count of one headline, with a negation word
/// up to three positions back flipping a hit.
fn headline_tone(text: &str) -> i32 {
    let text_lower = text.to_lowercase();
    let words: Vec<&str> = text_lower
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?' | ':' | '"'))
        .filter(|w| !w.is_empty())
        .collect();

    let bullish: HashSet<&str> = BULLISH_WORDS.iter().copied().collect();
    let bearish: HashSet<&str> = BEARISH_WORDS.iter().copied().collect();
    let negations: HashSet<&str> = NEGATION_WORDS.iter().copied().collect();

    let negation_positions: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| negations.contains(*w))
        .map(|(i, _)| i)
        .collect();

    let mut tone = 0;
    for (i, word) in words.iter().enumerate() {
        let is_bullish = bullish.contains(*word);
        let is_bearish = bearish.contains(*word);
        if !is_bullish && !is_bearish {
            continue;
        }

        let negated = negation_positions
            .iter()
            .any(|&neg| neg < i && i - neg <= NEGATION_WINDOW);

        let sign = if is_bullish { 1 } else { -1 };
        tone += if negated { -sign } else { sign };
    }
    tone
}

fn mentions_any(title: &str, keywords: &[String]) -> bool {
    let title_lower = title.to_lowercase();
    keywords.iter().any(|k| title_lower.contains(&k.to_lowercase()))
}

/// Keyword headline score over `[as_of - lookback, as_of]`.
///
/// Each relevant headline casts one vote of its tone's sign, so a single
/// breathless headline cannot outweigh several measured ones.
pub fn score_headlines(
    headlines: Option<&[Headline]>,
    keywords: &[String],
    as_of: DateTime<Utc>,
    lookback: Duration,
) -> SignalScore {
    let Some(headlines) = headlines else {
        return SignalScore::no_data(SignalKind::NewsKeywords);
    };

    let start = as_of.checked_sub_signed(lookback).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let relevant: Vec<&Headline> = headlines
        .iter()
        .filter(|h| h.published_at >= start && h.published_at <= as_of)
        .filter(|h| mentions_any(&h.title, keywords))
        .collect();

    if relevant.is_empty() {
        return SignalScore::no_data(SignalKind::NewsKeywords);
    }

    let mut bullish = 0;
    let mut bearish = 0;
    for headline in &relevant {
        match headline_tone(&headline.title).signum() {
            1 => bullish += 1,
            -1 => bearish += 1,
            _ => {}
        }
    }

    let raw = (bullish - bearish) as f64;
    tracing::debug!(
        "News: {} relevant headlines, {} bullish, {} bearish",
        relevant.len(),
        bullish,
        bearish
    );

    SignalScore::bounded(
        raw,
        NEWS_RANGE,
        format!(
            "News tone {} ({} bullish / {} bearish of {} headlines)",
            NEWS_RANGE.clamp(raw),
            bullish,
            bearish,
            relevant.len()
        ),
    )
}

#[derive(Debug, Clone)]
pub struct NewsKeywordScorer {
    instrument: Instrument,
    keywords: Vec<String>,
    lookback: Duration,
}

impl NewsKeywordScorer {
    pub fn new(instrument: Instrument, keywords: Vec<String>, lookback_hours: i64) -> Self {
        Self {
            instrument,
            keywords,
            lookback: Duration::try_hours(lookback_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Scorer with the built-in keyword list for the instrument
    pub fn with_default_keywords(instrument: Instrument) -> Self {
        let keywords = match instrument {
            Instrument::Nasdaq100 => NASDAQ_KEYWORDS,
            Instrument::Gold => GOLD_KEYWORDS,
        };
        Self::new(
            instrument,
            keywords.iter().map(|k| k.to_string()).collect(),
            DEFAULT_LOOKBACK_HOURS,
        )
    }
}

impl SignalScorer for NewsKeywordScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::NewsKeywords
    }

    fn range(&self) -> ScoreRange {
        NEWS_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        score_headlines(
            snapshot.headlines_for(self.instrument),
            &self.keywords,
            snapshot.as_of,
            self.lookback,
        )
    }
}
