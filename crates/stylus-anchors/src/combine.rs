//! Effect combination
//!
//! These are pure functions over effect magnitudes so they can be tested in
//! isolation from pattern matching.

use crate::CombinationMethod;

/// Weight applied to a match `distance` words away from the error
///
/// `max(decay^distance, min_effect)`
pub fn distance_weight(distance: usize, decay: f64, min_effect: f64) -> f64 {
    let exponent = i32::try_from(distance).unwrap_or(i32::MAX);
    decay.powi(exponent).max(min_effect)
}

/// Diminishing-returns fold
///
/// Effects are sorted strongest first. Each one is scaled by the running
/// multiplier, which then decays by `factor` but never drops below `floor`.
pub fn diminishing_returns(effects: &[f64], factor: f64, floor: f64) -> f64 {
    let mut sorted: Vec<f64> = effects.iter().map(|e| e.abs()).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut multiplier = 1.0;
    let mut total = 0.0;
    for effect in sorted {
        total += effect * multiplier;
        multiplier = (multiplier * factor).max(floor);
    }
    total
}

/// Plain sum of magnitudes
pub fn additive(effects: &[f64]) -> f64 {
    effects.iter().map(|e| e.abs()).sum()
}

/// Largest magnitude, 0.0 when empty
pub fn maximum(effects: &[f64]) -> f64 {
    effects.iter().map(|e| e.abs()).fold(0.0, f64::max)
}

/// Combine effects with the configured method and clamp to `cap`
pub fn combine(
    method: CombinationMethod,
    effects: &[f64],
    factor: f64,
    floor: f64,
    cap: f64,
) -> f64 {
    let total = match method {
        CombinationMethod::DiminishingReturns => diminishing_returns(effects, factor, floor),
        CombinationMethod::Additive => additive(effects),
        CombinationMethod::Maximum => maximum(effects),
    };
    total.min(cap).max(0.0)
}
