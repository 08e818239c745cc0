mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{ApiConfig, Config, ExportConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/esg-scope/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("esg-scope")
}

/// Get the default config file path (~/.config/esg-scope/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<()> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory at {}", config_dir.display())
        })?;
    }
    Ok(())
}

/// Load configuration from a YAML file.
///
/// If `path` is None, uses the default path. Errors when the file is missing,
/// unreadable, or not valid YAML.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `esg-scope init` to create one.",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Validate configuration at startup. Returns all problems at once, not just
/// the first.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.api.base_url.trim().is_empty() {
        errors.push("api.base_url: must not be empty".to_string());
    } else if !config.api.base_url.starts_with("http://")
        && !config.api.base_url.starts_with("https://")
    {
        errors.push(format!(
            "api.base_url: '{}' must start with http:// or https://",
            config.api.base_url
        ));
    }

    if let Some(ref url) = config.dashboard_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(format!(
                "dashboard_url: '{}' must start with http:// or https://",
                url
            ));
        }
    }

    match humantime::parse_duration(&config.refresh_every) {
        Ok(duration) if duration.is_zero() => {
            errors.push("refresh_every: must be greater than zero".to_string());
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(format!(
                "refresh_every: invalid duration '{}' - {}",
                config.refresh_every, e
            ));
        }
    }

    if let Some(ref export) = config.export {
        if let Some(ref format) = export.format {
            if format != "csv" && format != "json" {
                errors.push(format!(
                    "export.format: '{}' is not supported (use csv or json)",
                    format
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("api.base_url"));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "localhost:5000".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("http://"));
    }

    #[test]
    fn test_bad_refresh_duration() {
        let mut config = Config::default();
        config.refresh_every = "soon".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("refresh_every"));
    }

    #[test]
    fn test_bad_export_format() {
        let mut config = Config::default();
        config.export = Some(ExportConfig {
            format: Some("xlsx".to_string()),
            out_dir: None,
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("export.format"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        config.refresh_every = "soon".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
