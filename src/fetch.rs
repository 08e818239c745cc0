use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::api::{ApiClient, Company, EsgRecord};
use crate::buffered_eprintln;
use crate::config::Config;
use crate::scoring::{
    compute_risk, compute_score, compute_trend, RiskSnapshot, ScoreSnapshot, TrendDelta,
};

/// Everything derived for one company: its score history, the trend between
/// the two most recent periods, and the risk profile of the latest period.
#[derive(Debug, Clone)]
pub struct CompanyReport {
    pub company: Company,
    /// Score snapshots, ascending by period.
    pub snapshots: Vec<ScoreSnapshot>,
    /// None when fewer than two periods exist.
    pub trend: Option<TrendDelta>,
    /// Risk indices of the latest period, None without data.
    pub risk: Option<RiskSnapshot>,
}

impl CompanyReport {
    pub fn latest(&self) -> Option<&ScoreSnapshot> {
        self.snapshots.last()
    }
}

/// Derive a company's report from its raw records.
///
/// Records are sorted ascending by date before scoring, satisfying the trend
/// calculator's ordering precondition. A record that fails validation is
/// warned about and skipped; it never aborts the rest of the company's
/// history or the surrounding batch.
pub fn build_report(company: Company, mut records: Vec<EsgRecord>) -> CompanyReport {
    records.sort_by_key(|record| record.date);

    let mut snapshots = Vec::with_capacity(records.len());
    for record in &records {
        match compute_score(&record.metrics()) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => {
                buffered_eprintln!(
                    "Warning: skipping record {} for {}: {}",
                    record.id,
                    company.name,
                    e
                );
            }
        }
    }

    // Records were sorted above, so the precondition holds; an error here
    // would be a bug, not bad data.
    let trend = match compute_trend(&snapshots) {
        Ok(trend) => trend,
        Err(e) => {
            buffered_eprintln!("Warning: trend unavailable for {}: {}", company.name, e);
            None
        }
    };

    let risk = records.last().and_then(|record| {
        match compute_risk(&record.metrics()) {
            Ok(risk) => Some(risk),
            Err(e) => {
                buffered_eprintln!("Warning: risk unavailable for {}: {}", company.name, e);
                None
            }
        }
    });

    CompanyReport {
        company,
        snapshots,
        trend,
        risk,
    }
}

fn matches_filters(company: &Company, filters: Option<&[String]>) -> bool {
    match filters {
        None => true,
        Some(filters) if filters.is_empty() => true,
        Some(filters) => {
            let name = company.name.to_lowercase();
            filters.iter().any(|f| name.contains(&f.to_lowercase()))
        }
    }
}

/// Sort reports by latest composite score descending; companies without data
/// sink to the bottom. Name ascending breaks ties.
fn sort_reports(reports: &mut [CompanyReport]) {
    reports.sort_by(|a, b| {
        let score_a = a.latest().map(|s| s.composite);
        let score_b = b.latest().map(|s| s.composite);
        match (score_a, score_b) {
            (Some(x), Some(y)) => y
                .partial_cmp(&x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.company.name.cmp(&b.company.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.company.name.cmp(&b.company.name),
        }
    });
}

/// Fetch all (filtered) companies and their ESG histories, then score them.
///
/// Per-company record fetches fan out with bounded concurrency; each
/// company's computation is independent, so ordering between companies does
/// not matter and a failed fetch degrades that company to an empty report
/// instead of failing the batch. Only the companies listing itself failing
/// is fatal.
pub async fn fetch_and_score(
    client: &ApiClient,
    config: &Config,
    verbose: bool,
) -> Result<Vec<CompanyReport>> {
    const MAX_CONCURRENT_FETCHES: usize = 10;

    let companies = client.companies().await?;
    let selected: Vec<Company> = companies
        .into_iter()
        .filter(|c| matches_filters(c, config.companies.as_deref()))
        .collect();

    if verbose {
        buffered_eprintln!("Fetching ESG data for {} companies", selected.len());
    }

    let mut reports = Vec::with_capacity(selected.len());
    let mut companies_iter = selected.into_iter();
    let mut futures = FuturesUnordered::new();

    let spawn = |company: Company, client: ApiClient| async move {
        let result = client.company_esg_data(company.id).await;
        (company, result)
    };

    for _ in 0..MAX_CONCURRENT_FETCHES {
        if let Some(company) = companies_iter.next() {
            futures.push(spawn(company, client.clone()));
        }
    }

    while let Some((company, result)) = futures.next().await {
        if let Some(next) = companies_iter.next() {
            futures.push(spawn(next, client.clone()));
        }

        match result {
            Ok(records) => {
                if verbose {
                    buffered_eprintln!("  {} records for {}", records.len(), company.name);
                }
                reports.push(build_report(company, records));
            }
            Err(e) => {
                // Auth failures apply to every request; surface them instead
                // of degrading each company one by one.
                if e.downcast_ref::<crate::api::AuthError>().is_some() {
                    return Err(e);
                }
                buffered_eprintln!("Warning: failed to fetch data for {}: {}", company.name, e);
                reports.push(build_report(company, Vec::new()));
            }
        }
    }

    sort_reports(&mut reports);
    Ok(reports)
}
