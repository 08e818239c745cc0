use std::fmt;

use super::types::RawMetrics;

/// Errors raised at the scoring engine boundary.
///
/// Both variants are terminal for the single computation that raised them:
/// the inputs are wrong in a way a retry cannot fix.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A required metric field, after the absent-field default, is not a
    /// finite number. Carries the dotted field path for the caller.
    Validation { field: &'static str, value: f64 },
    /// The caller violated an ordering precondition.
    Precondition(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Validation { field, value } => {
                write!(f, "invalid metric {}: {} is not a finite number", field, value)
            }
            EngineError::Precondition(msg) => write!(f, "precondition violated: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Reject metrics containing NaN or infinity. Runs before any formula so a
/// partial snapshot is never produced. First offending field wins.
pub fn validate_metrics(metrics: &RawMetrics) -> Result<(), EngineError> {
    for (field, value) in metrics.fields() {
        if !value.is_finite() {
            return Err(EngineError::Validation { field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::{
        EnvironmentalMetrics, GovernanceMetrics, RawMetrics, SocialMetrics,
    };
    use chrono::NaiveDateTime;

    fn period() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-31T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn zeroed() -> RawMetrics {
        RawMetrics {
            period: period(),
            environmental: EnvironmentalMetrics::default(),
            social: SocialMetrics::default(),
            governance: GovernanceMetrics::default(),
        }
    }

    #[test]
    fn test_all_zero_metrics_are_valid() {
        assert!(validate_metrics(&zeroed()).is_ok());
    }

    #[test]
    fn test_nan_is_rejected_with_field_name() {
        let mut metrics = zeroed();
        metrics.environmental.co2_emissions = f64::NAN;
        let err = validate_metrics(&metrics).unwrap_err();
        match err {
            EngineError::Validation { field, .. } => {
                assert_eq!(field, "environmental.co2_emissions");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_infinity_is_rejected() {
        let mut metrics = zeroed();
        metrics.social.training_hours = f64::INFINITY;
        let err = validate_metrics(&metrics).unwrap_err();
        assert!(err.to_string().contains("social.training_hours"));
    }

    #[test]
    fn test_negative_infinity_in_governance() {
        let mut metrics = zeroed();
        metrics.governance.data_breaches = f64::NEG_INFINITY;
        let err = validate_metrics(&metrics).unwrap_err();
        assert!(err.to_string().contains("governance.data_breaches"));
    }

    #[test]
    fn test_extreme_finite_values_pass() {
        let mut metrics = zeroed();
        metrics.environmental.co2_emissions = 1e18;
        metrics.social.diversity_ratio = -500.0;
        assert!(validate_metrics(&metrics).is_ok());
    }
}
