use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{get_config_path, ApiConfig, Config, ExportConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn validate_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("'{}' must start with http:// or https://", url))
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path. Otherwise,
/// prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("ESG Scope Configuration Wizard");
    println!("==============================");
    println!();

    // 1. Backend location
    println!("esg-scope reads companies and ESG metrics from your reporting backend's REST API.");
    let base_url = loop {
        let input = prompt_with_default("Backend base URL", "http://localhost:5000")?;
        match validate_url(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 2. Web dashboard (optional, enables opening companies in the browser)
    println!();
    println!("If the web dashboard is deployed, esg-scope can open companies in your browser.");
    let dashboard_url = loop {
        let input = prompt_with_default("Web dashboard URL ('none' to skip)", "none")?;
        if input == "none" || input.is_empty() {
            break None;
        }
        match validate_url(&input) {
            Ok(_) => break Some(input),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Auto-refresh interval
    println!();
    println!("The dashboard re-fetches scores in the background on this interval.");
    let refresh_every = loop {
        let input = prompt_with_default("Refresh interval (e.g. 5m, 90s)", "5m")?;
        match humantime::parse_duration(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 4. Company filters (optional)
    println!();
    println!("You can limit esg-scope to a subset of companies by name (case-insensitive).");
    let mut company_filters: Vec<String> = Vec::new();
    let mut add_filter = prompt_yes_no("Add a company filter?", false)?;
    while add_filter {
        let name = prompt("  Company name (or part of it): ")?;
        if name.is_empty() {
            println!("  Filter cannot be empty.");
        } else {
            company_filters.push(name);
        }
        add_filter = prompt_yes_no("  Add another filter?", false)?;
    }
    let companies = if company_filters.is_empty() {
        None
    } else {
        Some(company_filters)
    };

    // 5. Export defaults
    println!();
    let export = if prompt_yes_no("Configure report export defaults?", false)? {
        let format = loop {
            let input = prompt_with_default("Export format (csv or json)", "csv")?;
            if input == "csv" || input == "json" {
                break input;
            }
            println!("  Invalid: use csv or json. Try again.");
        };
        let out_dir = {
            let input = prompt_with_default("Output directory", ".")?;
            if input == "." {
                None
            } else {
                Some(input)
            }
        };
        Some(ExportConfig {
            format: Some(format),
            out_dir,
        })
    } else {
        None
    };

    // 6. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 7. Write config
    let config = Config {
        api: ApiConfig { base_url },
        dashboard_url,
        refresh_every,
        companies,
        export,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `esg-scope` to see scored companies, or `esg-scope dashboard` for the TUI.");

    Ok(())
}
