use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use esg_scope::api::{create_client, ApiClient, AuthError};
use esg_scope::fetch::CompanyReport;
use esg_scope::output::ExportFormat;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List companies ranked by composite ESG score (default if no subcommand)
    List {
        /// Emit tab-separated values for scripting (no colors, no truncation)
        #[arg(long)]
        tsv: bool,
    },
    /// Show one company's scores, trend and risk profile in detail
    Show {
        /// Company name (or a unique part of it, case-insensitive)
        company: String,
    },
    /// Interactive dashboard (TUI)
    Dashboard,
    /// Open a company in the web dashboard
    Open {
        /// Company name (or a unique part of it, case-insensitive)
        company: String,
    },
    /// Export score and risk reports to a CSV or JSON file
    Export {
        /// Output format: csv or json
        #[arg(long)]
        format: Option<String>,
        /// Output file path (defaults to esg-report-<date>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Limit the export to companies matching this name
        #[arg(long)]
        company: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "esg-scope")]
#[command(about = "Company ESG scores, trends and risk indices from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/esg-scope/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Fetch and score, re-prompting for a token once if the backend rejects the
/// current one. Mirrors the TUI's in-place re-auth for the one-shot commands.
async fn fetch_reports(
    client: &mut ApiClient,
    config: &esg_scope::config::Config,
    verbose: bool,
) -> anyhow::Result<Vec<CompanyReport>> {
    match esg_scope::fetch::fetch_and_score(client, config, verbose).await {
        Ok(reports) => Ok(reports),
        Err(e) if e.downcast_ref::<AuthError>().is_some() => {
            let token = esg_scope::credentials::reprompt_for_token()?;
            *client = create_client(&config.api.base_url, Some(&token))?;
            esg_scope::fetch::fetch_and_score(client, config, verbose).await
        }
        Err(e) => Err(e),
    }
}

/// Find exactly one company whose name contains `needle` (case-insensitive).
fn find_company<'a>(reports: &'a [CompanyReport], needle: &str) -> Result<&'a CompanyReport, String> {
    let needle_lower = needle.to_lowercase();
    let matches: Vec<&CompanyReport> = reports
        .iter()
        .filter(|r| r.company.name.to_lowercase().contains(&needle_lower))
        .collect();

    match matches.len() {
        0 => Err(format!("No company matching '{}'", needle)),
        1 => Ok(matches[0]),
        _ => {
            let names: Vec<&str> = matches.iter().map(|r| r.company.name.as_str()).collect();
            Err(format!(
                "'{}' is ambiguous, matches: {}",
                needle,
                names.join(", ")
            ))
        }
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List { tsv: false });
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before any config is required
    if let Commands::Init = command {
        if let Err(e) = esg_scope::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match esg_scope::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = esg_scope::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!("Backend: {}", config.api.base_url);
        if let Some(ref filters) = config.companies {
            eprintln!("Company filters: {}", filters.join(", "));
        }
    }

    // Resolve API token (env var, then stored file); absent is fine until the
    // backend says otherwise.
    let token = match esg_scope::credentials::setup_token() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    if cli.verbose && token.is_some() {
        eprintln!("Using stored API token");
    }

    // Create backend client
    let mut client = match create_client(&config.api.base_url, token.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create API client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    match command {
        Commands::Init => unreachable!("handled above"),
        Commands::Dashboard => {
            let theme = esg_scope::tui::resolve_theme();
            let app = esg_scope::tui::App::new_loading(config, theme, cli.verbose);
            if let Err(e) = esg_scope::tui::run_tui(app, client).await {
                eprintln!("Dashboard error: {}", e);
                std::process::exit(EXIT_NETWORK);
            }
        }
        Commands::List { tsv } => {
            let reports = match fetch_reports(&mut client, &config, cli.verbose).await {
                Ok(r) => r,
                Err(e) => exit_fetch_error(e),
            };

            if tsv {
                let out = esg_scope::output::format_tsv(&reports);
                if !out.is_empty() {
                    println!("{}", out);
                }
            } else {
                let use_colors = esg_scope::output::should_use_colors();

                if cli.verbose && !reports.is_empty() {
                    for report in &reports {
                        println!("{}", esg_scope::output::format_report_detail(report, use_colors));
                        println!();
                    }
                } else {
                    println!("{}", esg_scope::output::format_scored_table(&reports, use_colors));
                }

                if cli.verbose {
                    eprintln!();
                    eprintln!("Total: {} companies in {:?}", reports.len(), start_time.elapsed());
                }
            }
        }
        Commands::Show { company } => {
            let reports = match fetch_reports(&mut client, &config, cli.verbose).await {
                Ok(r) => r,
                Err(e) => exit_fetch_error(e),
            };

            match find_company(&reports, &company) {
                Ok(report) => {
                    let use_colors = esg_scope::output::should_use_colors();
                    println!("{}", esg_scope::output::format_report_detail(report, use_colors));
                }
                Err(msg) => {
                    eprintln!("{}", msg);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Open { company } => {
            let Some(ref dashboard_url) = config.dashboard_url else {
                eprintln!("No dashboard_url configured. Add one to the config file.");
                std::process::exit(EXIT_CONFIG);
            };

            let reports = match fetch_reports(&mut client, &config, cli.verbose).await {
                Ok(r) => r,
                Err(e) => exit_fetch_error(e),
            };

            match find_company(&reports, &company) {
                Ok(report) => {
                    if let Err(e) =
                        esg_scope::browser::open_company(dashboard_url, report.company.id)
                    {
                        eprintln!("Failed to open browser: {}", e);
                        std::process::exit(EXIT_NETWORK);
                    }
                    println!("Opening {} in web dashboard", report.company.name);
                }
                Err(msg) => {
                    eprintln!("{}", msg);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Export { format, out, company } => {
            let reports = match fetch_reports(&mut client, &config, cli.verbose).await {
                Ok(r) => r,
                Err(e) => exit_fetch_error(e),
            };

            let selected: Vec<CompanyReport> = match company {
                Some(ref needle) => match find_company(&reports, needle) {
                    Ok(report) => vec![report.clone()],
                    Err(msg) => {
                        eprintln!("{}", msg);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
                None => reports,
            };

            let format_str = format
                .or_else(|| config.export.as_ref().and_then(|e| e.format.clone()))
                .unwrap_or_else(|| "csv".to_string());
            let export_format = match format_str.parse::<ExportFormat>() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let path = out.unwrap_or_else(|| {
                let dir = config
                    .export
                    .as_ref()
                    .and_then(|e| e.out_dir.clone())
                    .unwrap_or_else(|| ".".to_string());
                PathBuf::from(dir).join(format!(
                    "esg-report-{}.{}",
                    chrono::Local::now().format("%Y-%m-%d"),
                    export_format.extension()
                ))
            });

            if let Err(e) = esg_scope::output::export_reports(&selected, export_format, &path) {
                eprintln!("Export failed: {}", e);
                std::process::exit(EXIT_CONFIG);
            }

            println!(
                "Exported {} companies to {}",
                selected.len(),
                path.display()
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn exit_fetch_error(e: anyhow::Error) -> ! {
    if e.downcast_ref::<AuthError>().is_some() {
        eprintln!("{}", e);
        std::process::exit(EXIT_AUTH);
    }
    eprintln!("Fetch failed: {}", e);
    std::process::exit(EXIT_NETWORK);
}
