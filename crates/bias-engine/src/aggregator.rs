use bias_core::{BiasResult, MarketSnapshot, ScoreRange, SignalBreakdown};

use crate::profile::SignalProfile;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Score every slot of `profile` against one frozen snapshot and combine.
///
/// Pure over its inputs: the same snapshot always yields the same result.
pub fn evaluate_profile(profile: &SignalProfile, snapshot: &MarketSnapshot) -> BiasResult {
    let weight_sum = profile.weight_sum();
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        tracing::warn!(
            "Profile {} weights sum to {:.4}, not 1.0; composite scale is off",
            profile.name,
            weight_sum
        );
    }

    let breakdown: Vec<SignalBreakdown> = profile
        .slots
        .iter()
        .map(|slot| {
            let score = slot.scorer.score(snapshot);
            let entry = SignalBreakdown {
                kind: slot.scorer.kind(),
                weight: slot.weight,
                score,
            };
            tracing::debug!(
                "{} {}: {:.2} × {:.2} = {:.4} ({})",
                profile.name,
                entry.kind.name(),
                entry.score.value,
                entry.weight,
                entry.contribution(),
                entry.score.rationale
            );
            entry
        })
        .collect();

    let raw: f64 = breakdown.iter().map(|b| b.contribution()).sum();
    let composite_score = ScoreRange::symmetric(profile.bound()).clamp(raw);
    let label = profile.label_scheme.label(composite_score);

    let available = breakdown.iter().filter(|b| b.score.available).count();
    tracing::info!(
        "{} [{}]: composite {:.3} → {} ({}/{} signals with data)",
        profile.instrument.name(),
        profile.name,
        composite_score,
        label,
        available,
        breakdown.len()
    );

    BiasResult {
        instrument: profile.instrument,
        profile: profile.name.clone(),
        composite_score,
        label,
        breakdown,
        evaluated_at: snapshot.as_of,
    }
}
