use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a metric that may be absent or JSON `null` as 0.0.
/// Absence is not an error; a non-numeric value still fails deserialization.
fn metric<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct EnvironmentalMetrics {
    /// Tonnes CO2e
    #[serde(default, deserialize_with = "metric")]
    pub co2_emissions: f64,
    /// MWh
    #[serde(default, deserialize_with = "metric")]
    pub energy_consumption: f64,
    /// Cubic meters
    #[serde(default, deserialize_with = "metric")]
    pub water_usage: f64,
    /// Tonnes
    #[serde(default, deserialize_with = "metric")]
    pub waste_generated: f64,
    /// 0-100
    #[serde(default, deserialize_with = "metric")]
    pub renewable_energy_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct SocialMetrics {
    #[serde(default, deserialize_with = "metric")]
    pub employee_count: f64,
    /// 0-100
    #[serde(default, deserialize_with = "metric")]
    pub diversity_ratio: f64,
    #[serde(default, deserialize_with = "metric")]
    pub safety_incidents: f64,
    /// Hours per employee
    #[serde(default, deserialize_with = "metric")]
    pub training_hours: f64,
    #[serde(default, deserialize_with = "metric")]
    pub community_investment: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct GovernanceMetrics {
    /// 0-100
    #[serde(default, deserialize_with = "metric")]
    pub board_independence: f64,
    /// 0-100
    #[serde(default, deserialize_with = "metric")]
    pub board_diversity: f64,
    #[serde(default, deserialize_with = "metric")]
    pub ethics_violations: f64,
    #[serde(default, deserialize_with = "metric")]
    pub data_breaches: f64,
}

/// One reporting period's raw metrics for a single company.
///
/// Owned by the caller; the engine never stores or mutates it. Every derived
/// value (score, trend, risk) is a pure function of this input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetrics {
    pub period: NaiveDateTime,
    pub environmental: EnvironmentalMetrics,
    pub social: SocialMetrics,
    pub governance: GovernanceMetrics,
}

impl RawMetrics {
    /// Every metric field with its dotted path, for validation and display.
    pub fn fields(&self) -> [(&'static str, f64); 14] {
        [
            ("environmental.co2_emissions", self.environmental.co2_emissions),
            ("environmental.energy_consumption", self.environmental.energy_consumption),
            ("environmental.water_usage", self.environmental.water_usage),
            ("environmental.waste_generated", self.environmental.waste_generated),
            (
                "environmental.renewable_energy_percent",
                self.environmental.renewable_energy_percent,
            ),
            ("social.employee_count", self.social.employee_count),
            ("social.diversity_ratio", self.social.diversity_ratio),
            ("social.safety_incidents", self.social.safety_incidents),
            ("social.training_hours", self.social.training_hours),
            ("social.community_investment", self.social.community_investment),
            ("governance.board_independence", self.governance.board_independence),
            ("governance.board_diversity", self.governance.board_diversity),
            ("governance.ethics_violations", self.governance.ethics_violations),
            ("governance.data_breaches", self.governance.data_breaches),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_metric_defaults_to_zero() {
        let json = r#"{
            "co2_emissions": null,
            "energy_consumption": 120.5,
            "water_usage": null,
            "waste_generated": null,
            "renewable_energy_percent": 45
        }"#;
        let env: EnvironmentalMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(env.co2_emissions, 0.0);
        assert_eq!(env.energy_consumption, 120.5);
        assert_eq!(env.renewable_energy_percent, 45.0);
    }

    #[test]
    fn test_absent_metric_defaults_to_zero() {
        let json = r#"{ "diversity_ratio": 60 }"#;
        let social: SocialMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(social.diversity_ratio, 60.0);
        assert_eq!(social.safety_incidents, 0.0);
        assert_eq!(social.training_hours, 0.0);
    }

    #[test]
    fn test_non_numeric_metric_is_rejected() {
        let json = r#"{ "ethics_violations": "two" }"#;
        let result: Result<GovernanceMetrics, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_fields_covers_all_metrics() {
        let metrics = RawMetrics {
            period: NaiveDateTime::parse_from_str("2024-03-31T00:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
            environmental: EnvironmentalMetrics {
                co2_emissions: 1.0,
                ..Default::default()
            },
            social: SocialMetrics::default(),
            governance: GovernanceMetrics::default(),
        };
        let fields = metrics.fields();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0], ("environmental.co2_emissions", 1.0));
    }
}
