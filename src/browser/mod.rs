use anyhow::{Context, Result};

/// Open a company's page in the configured web dashboard.
///
/// # Errors
/// Returns error if no browser can be opened.
pub fn open_company(dashboard_url: &str, company_id: u64) -> Result<()> {
    let url = format!("{}/companies/{}", dashboard_url.trim_end_matches('/'), company_id);
    webbrowser::open(&url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
