use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::RawMetrics;
use super::validation::{validate_metrics, EngineError};

/// Risk exposure indices derived from one period's raw metrics.
///
/// Higher is worse. Every component lands in [0,100]: the three pillar risks
/// because each of their sub-terms is clamped there, `regulatory` because it
/// averages two of them, and `reputation` through its outer clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskSnapshot {
    pub period: NaiveDateTime,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub regulatory: f64,
    pub reputation: f64,
}

fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.min(hi).max(lo)
}

/// Compute the five risk indices from one period's raw metrics.
///
/// Clamping is applied per sub-term exactly as the formulas state it:
/// `regulatory` and the two risk inputs to `reputation` are not re-clamped
/// beyond what their sub-terms already did. The asymmetry is intentional and
/// load-bearing for compatibility.
pub fn compute_risk(metrics: &RawMetrics) -> Result<RiskSnapshot, EngineError> {
    validate_metrics(metrics)?;

    let env = &metrics.environmental;
    let soc = &metrics.social;
    let gov = &metrics.governance;

    let co2_risk = clamp(env.co2_emissions / 200.0 * 100.0, 0.0, 100.0);
    let energy_risk = clamp(env.energy_consumption / 150.0 * 100.0, 0.0, 100.0);
    let renewable_risk = clamp(100.0 - env.renewable_energy_percent, 0.0, 100.0);
    let environmental = co2_risk * 0.4 + energy_risk * 0.3 + renewable_risk * 0.3;

    let diversity_risk = clamp(100.0 - soc.diversity_ratio, 0.0, 100.0);
    let safety_risk = clamp(soc.safety_incidents * 20.0, 0.0, 100.0);
    let training_risk = clamp(100.0 - soc.training_hours / 40.0 * 100.0, 0.0, 100.0);
    let social = diversity_risk * 0.3 + safety_risk * 0.4 + training_risk * 0.3;

    let board_risk = clamp(100.0 - gov.board_diversity, 0.0, 100.0);
    let ethics_risk = clamp(gov.ethics_violations * 25.0, 0.0, 100.0);
    let breach_risk = clamp(gov.data_breaches * 33.0, 0.0, 100.0);
    let governance = board_risk * 0.3 + ethics_risk * 0.4 + breach_risk * 0.3;

    let regulatory = environmental * 0.5 + governance * 0.5;

    let ethics_impact = (gov.ethics_violations * 25.0).min(100.0);
    let reputation = clamp(
        social * 0.4 + ethics_impact * 0.3 + environmental * 0.3,
        0.0,
        100.0,
    );

    Ok(RiskSnapshot {
        period: metrics.period,
        environmental,
        social,
        governance,
        regulatory,
        reputation,
    })
}
