use bias_core::{MacroEvent, MarketSnapshot, ScoreRange, SignalKind, SignalScore, SignalScorer};
use chrono::{DateTime, Duration, Utc};

pub const MACRO_RANGE: ScoreRange = ScoreRange { min: -3.0, max: 3.0 };

/// Fraction of an event's impact charged while its release is still pending
const PENDING_DISCOUNT: f64 = 0.5;

pub const DEFAULT_WINDOW_DAYS: i64 = 3;

/// Surprise-weighted macro score over `[as_of - window, as_of + window]`.
///
/// Released events add their impact when the surprise is positive and subtract
/// it otherwise; pending events subtract half their impact as a standing risk
/// discount.
pub fn score_macro(events: Option<&[MacroEvent]>, as_of: DateTime<Utc>, window: Duration) -> SignalScore {
    let Some(events) = events else {
        return SignalScore::no_data(SignalKind::MacroCalendar);
    };

    let start = as_of.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = as_of.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut score = 0.0;
    let mut in_window = 0usize;
    let mut pending = 0usize;

    for event in events.iter().filter(|e| e.timestamp >= start && e.timestamp <= end) {
        in_window += 1;
        let impact = event.impact.weight();
        match event.surprise {
            Some(surprise) => {
                score += if surprise > 0.0 { impact } else { -impact };
            }
            None => {
                pending += 1;
                score -= impact * PENDING_DISCOUNT;
            }
        }
    }

    let clamped = MACRO_RANGE.clamp(score);
    tracing::debug!(
        "Macro calendar: {} events in window ({} pending), raw {:.2}, clamped {:.2}",
        in_window,
        pending,
        score,
        clamped
    );

    SignalScore::bounded(
        clamped,
        MACRO_RANGE,
        format!(
            "Macro impact score {:.2} ({} events in window, {} pending)",
            clamped, in_window, pending
        ),
    )
}

#[derive(Debug, Clone)]
pub struct MacroCalendarScorer {
    window: Duration,
}

impl MacroCalendarScorer {
    pub fn new(window_days: i64) -> Self {
        Self {
            window: Duration::try_days(window_days).unwrap_or(Duration::MAX),
        }
    }
}

impl Default for MacroCalendarScorer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl SignalScorer for MacroCalendarScorer {
    fn kind(&self) -> SignalKind {
        SignalKind::MacroCalendar
    }

    fn range(&self) -> ScoreRange {
        MACRO_RANGE
    }

    fn score(&self, snapshot: &MarketSnapshot) -> SignalScore {
        score_macro(snapshot.macro_events.as_deref(), snapshot.as_of, self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bias_core::ImpactLevel;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap()
    }

    fn event(offset_hours: i64, impact: ImpactLevel, surprise: Option<f64>) -> MacroEvent {
        MacroEvent {
            timestamp: now() + Duration::hours(offset_hours),
            country: "United States".to_string(),
            name: None,
            impact,
            surprise,
        }
    }

    fn window() -> Duration {
        Duration::days(DEFAULT_WINDOW_DAYS)
    }

    #[test]
    fn test_single_pending_high_impact() {
        let events = vec![event(24, ImpactLevel::High, None)];
        let s = score_macro(Some(&events[..]), now(), window());
        assert_relative_eq!(s.value, -1.0);
    }

    #[test]
    fn test_huge_window_covers_everything() {
        let events = vec![
            event(-24, ImpactLevel::High, Some(0.3)),
            event(24 * 400, ImpactLevel::Medium, None),
        ];
        let scorer = MacroCalendarScorer::new(1_000_000_000);
        let mut snap = MarketSnapshot::empty(now());
        snap.macro_events = Some(events);
        let s = scorer.score(&snap);
        assert!(s.available);
        assert_relative_eq!(s.value, 1.5);

        let quiet: Vec<MacroEvent> = Vec::new();
        let s = score_macro(Some(&quiet[..]), now(), Duration::MAX);
        assert!(s.available);
        assert_relative_eq!(s.value, 0.0);
    }

    #[test]
    fn test_high_impact_positive_surprise() {
        let events = vec![event(-24, ImpactLevel::High, Some(0.3))];
        assert_relative_eq!(score_macro(Some(&events[..]), now(), window()).value, 2.0);
    }

    #[test]
    fn test_non_positive_surprise_subtracts() {
        let events = vec![
            event(-2, ImpactLevel::Medium, Some(-0.1)),
            event(-1, ImpactLevel::Medium, Some(0.0)),
            event(-1, ImpactLevel::Low, Some(5.0)),
        ];
        assert_relative_eq!(score_macro(Some(&events[..]), now(), window()).value, -2.0);
    }

    #[test]
    fn test_window_is_inclusive() {
        let events = vec![
            event(72, ImpactLevel::High, Some(1.0)),
            event(-72, ImpactLevel::Medium, Some(1.0)),
            event(73, ImpactLevel::High, Some(1.0)),
            event(-73, ImpactLevel::High, None),
        ];
        let s = score_macro(Some(&events[..]), now(), window());
        assert_relative_eq!(s.value, 3.0);
        assert!(s.rationale.contains("2 events in window"));
    }

    #[test]
    fn test_clamped_to_range() {
        let events: Vec<MacroEvent> = (0..5).map(|i| event(i, ImpactLevel::High, None)).collect();
        assert_relative_eq!(score_macro(Some(&events[..]), now(), window()).value, -3.0);
    }

    #[test]
    fn test_empty_calendar_vs_unavailable() {
        let empty: Vec<MacroEvent> = vec![];
        let s = score_macro(Some(&empty[..]), now(), window());
        assert_eq!(s.value, 0.0);
        assert!(s.available);

        let s = score_macro(None, now(), window());
        assert!(!s.available);
        assert_eq!(s.rationale, "no data for macro calendar");
    }
}
