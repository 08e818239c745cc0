use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::scoring::{EnvironmentalMetrics, GovernanceMetrics, RawMetrics, SocialMetrics};

/// A company as served by `GET /api/companies`.
#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    /// "Small", "Medium" or "Large"
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub environmental_highlight: Option<String>,
    #[serde(default)]
    pub social_highlight: Option<String>,
    #[serde(default)]
    pub governance_highlight: Option<String>,
}

impl Company {
    /// Short one-line label: "Acme Corp (Manufacturing, DE)"
    pub fn short_ref(&self) -> String {
        match (self.industry.as_deref(), self.country.as_deref()) {
            (Some(industry), Some(country)) => {
                format!("{} ({}, {})", self.name, industry, country)
            }
            (Some(industry), None) => format!("{} ({})", self.name, industry),
            (None, Some(country)) => format!("{} ({})", self.name, country),
            (None, None) => self.name.clone(),
        }
    }
}

/// One reporting period's raw ESG record as served by `GET /api/esg-data`.
///
/// The nested metric groups reuse the engine's own types so the backend
/// payload deserializes straight into scorable values (nulls become 0 per
/// the absent-field rule).
#[derive(Debug, Clone, Deserialize)]
pub struct EsgRecord {
    pub id: u64,
    pub company_id: u64,
    pub date: NaiveDateTime,
    pub environmental: EnvironmentalMetrics,
    pub social: SocialMetrics,
    pub governance: GovernanceMetrics,
}

impl EsgRecord {
    /// View this record as engine input. The record's `date` is the
    /// snapshot's reporting period.
    pub fn metrics(&self) -> RawMetrics {
        RawMetrics {
            period: self.date,
            environmental: self.environmental,
            social: self.social,
            governance: self.governance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        // Shape produced by the backend's to_dict(), nullable columns as null.
        let json = r#"{
            "id": 7,
            "company_id": 3,
            "date": "2024-03-31T00:00:00",
            "environmental": {
                "co2_emissions": 120.0,
                "energy_consumption": 80.5,
                "water_usage": null,
                "waste_generated": 14.2,
                "renewable_energy_percent": 35.0
            },
            "social": {
                "employee_count": 1200,
                "diversity_ratio": 44.0,
                "safety_incidents": 2,
                "training_hours": 18.0,
                "community_investment": null
            },
            "governance": {
                "board_independence": 70.0,
                "board_diversity": 38.0,
                "ethics_violations": 0,
                "data_breaches": 1
            }
        }"#;

        let record: EsgRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.company_id, 3);
        assert_eq!(record.environmental.water_usage, 0.0);
        assert_eq!(record.social.employee_count, 1200.0);
        assert_eq!(record.governance.data_breaches, 1.0);

        let metrics = record.metrics();
        assert_eq!(metrics.period, record.date);
        assert_eq!(metrics.environmental.co2_emissions, 120.0);
    }

    #[test]
    fn test_deserialize_company_with_nulls() {
        let json = r#"{
            "id": 1,
            "name": "Acme Corp",
            "industry": "Manufacturing",
            "size": null,
            "country": "Germany",
            "description": null,
            "environmental_highlight": null,
            "social_highlight": null,
            "governance_highlight": null
        }"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.name, "Acme Corp");
        assert!(company.size.is_none());
        assert_eq!(company.short_ref(), "Acme Corp (Manufacturing, Germany)");
    }

    #[test]
    fn test_short_ref_without_metadata() {
        let json = r#"{ "id": 2, "name": "Solo Ltd" }"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.short_ref(), "Solo Ltd");
    }

    #[test]
    fn test_fractional_seconds_in_date() {
        let json = r#"{
            "id": 1, "company_id": 1, "date": "2024-06-30T12:30:00.500000",
            "environmental": {}, "social": {}, "governance": {}
        }"#;
        use chrono::Timelike;
        let record: EsgRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.environmental.co2_emissions, 0.0);
        assert_eq!(record.date.time().minute(), 30);
    }
}
