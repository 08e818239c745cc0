use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// api:
///   base_url: http://localhost:5000
/// dashboard_url: http://localhost:3000
/// refresh_every: 5m
/// companies:
///   - acme
///   - northwind
/// export:
///   format: csv
///   out_dir: ~/reports
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,

    /// Web dashboard base URL, used to open companies in the browser.
    #[serde(default)]
    pub dashboard_url: Option<String>,

    /// TUI auto-refresh interval as a humantime string (e.g. "5m", "90s").
    #[serde(default = "default_refresh")]
    pub refresh_every: String,

    /// Case-insensitive company name filters. Empty/absent means all.
    #[serde(default)]
    pub companies: Option<Vec<String>>,

    #[serde(default)]
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// REST backend base URL (e.g. http://localhost:5000).
    pub base_url: String,
}

/// Defaults for the `export` command and the TUI export hotkey.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// "csv" or "json"
    #[serde(default)]
    pub format: Option<String>,

    /// Directory reports are written into (default: current directory).
    #[serde(default)]
    pub out_dir: Option<String>,
}

fn default_refresh() -> String {
    "5m".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
            },
            dashboard_url: None,
            refresh_every: default_refresh(),
            companies: None,
            export: None,
        }
    }
}

impl Config {
    /// Parsed auto-refresh interval, falling back to five minutes when the
    /// configured string is invalid or zero (validation reports it
    /// separately; a zero interval would spin the timer).
    pub fn refresh_interval(&self) -> std::time::Duration {
        match humantime::parse_duration(&self.refresh_every) {
            Ok(duration) if !duration.is_zero() => duration,
            _ => std::time::Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parse() {
        let yaml = r#"
api:
  base_url: http://localhost:5000
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.refresh_every, "5m");
        assert!(config.companies.is_none());
        assert!(config.export.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
api:
  base_url: https://esg.internal.example
dashboard_url: https://esg-dash.internal.example
refresh_every: 90s
companies:
  - acme
  - northwind
export:
  format: json
  out_dir: /tmp/reports
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.dashboard_url.as_deref(), Some("https://esg-dash.internal.example"));
        assert_eq!(config.refresh_every, "90s");
        assert_eq!(config.companies.as_ref().unwrap().len(), 2);
        assert_eq!(config.export.as_ref().unwrap().format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
api:
  base_url: http://localhost:5000
scoring_weights: custom
"#;
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_refresh_interval_parses_humantime() {
        let mut config = Config::default();
        config.refresh_every = "90s".to_string();
        assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(90));
    }

    #[test]
    fn test_refresh_interval_falls_back() {
        let mut config = Config::default();
        config.refresh_every = "whenever".to_string();
        assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(300));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
            },
            dashboard_url: Some("http://localhost:3000".to_string()),
            refresh_every: "2m".to_string(),
            companies: Some(vec!["acme".to_string()]),
            export: Some(ExportConfig {
                format: Some("csv".to_string()),
                out_dir: None,
            }),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
