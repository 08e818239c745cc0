use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::RawMetrics;
use super::validation::{validate_metrics, EngineError};

/// Derived pillar scores for one reporting period.
///
/// Scores are intentionally NOT clamped to [0,100]: very low emissions can
/// push `environmental` above 100 and extreme inputs can go negative. The
/// downstream consumers were built against this behavior, so it is part of
/// the compatibility contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSnapshot {
    pub period: NaiveDateTime,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    /// Arithmetic mean of the three pillar scores.
    pub composite: f64,
}

/// Compute pillar scores and the composite from one period's raw metrics.
///
/// Fixed weights; pure; bit-identical output for identical input. Fails with
/// `EngineError::Validation` if any metric is non-finite after defaulting,
/// in which case no snapshot is produced.
pub fn compute_score(metrics: &RawMetrics) -> Result<ScoreSnapshot, EngineError> {
    validate_metrics(metrics)?;

    let env = &metrics.environmental;
    let soc = &metrics.social;
    let gov = &metrics.governance;

    let environmental =
        env.renewable_energy_percent * 0.4 + (100.0 - env.co2_emissions / 20.0) * 0.6;
    let social = soc.diversity_ratio * 0.5 + (100.0 - soc.safety_incidents * 10.0) * 0.5;
    let governance = gov.board_diversity * 0.4 + (100.0 - gov.ethics_violations * 20.0) * 0.6;
    let composite = (environmental + social + governance) / 3.0;

    Ok(ScoreSnapshot {
        period: metrics.period,
        environmental,
        social,
        governance,
        composite,
    })
}
