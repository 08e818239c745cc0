use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};

use crate::fetch::CompanyReport;
use crate::scoring::PillarDelta;

/// Output format for report files. PDF/XLSX rendering belongs to the backend
/// report service; this tool exports machine-readable files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => anyhow::bail!("Unsupported export format '{}' (use csv or json)", other),
        }
    }
}

/// One exported row: a company's scores for one reporting period. Trend and
/// risk describe the company's latest state, so they are attached to the
/// latest row only; other rows leave those cells empty. An undefined or
/// unavailable trend stays an empty cell — never a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub company: String,
    pub period: String,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub composite: f64,
    pub trend_environmental_pct: Option<f64>,
    pub trend_social_pct: Option<f64>,
    pub trend_governance_pct: Option<f64>,
    pub risk_environmental: Option<f64>,
    pub risk_social: Option<f64>,
    pub risk_governance: Option<f64>,
    pub risk_regulatory: Option<f64>,
    pub risk_reputation: Option<f64>,
}

fn delta_cell(delta: Option<&PillarDelta>) -> Option<f64> {
    delta.and_then(PillarDelta::as_change)
}

/// Flatten reports into export rows, one per company/period, ascending by
/// period within each company.
pub fn build_rows(reports: &[CompanyReport]) -> Vec<ExportRow> {
    let mut rows = Vec::new();

    for report in reports {
        let last_index = report.snapshots.len().saturating_sub(1);
        for (idx, snapshot) in report.snapshots.iter().enumerate() {
            let is_latest = idx == last_index;
            let trend = if is_latest { report.trend.as_ref() } else { None };
            let risk = if is_latest { report.risk.as_ref() } else { None };

            rows.push(ExportRow {
                company: report.company.name.clone(),
                period: snapshot.period.to_string(),
                environmental: snapshot.environmental,
                social: snapshot.social,
                governance: snapshot.governance,
                composite: snapshot.composite,
                trend_environmental_pct: delta_cell(trend.map(|t| &t.environmental)),
                trend_social_pct: delta_cell(trend.map(|t| &t.social)),
                trend_governance_pct: delta_cell(trend.map(|t| &t.governance)),
                risk_environmental: risk.map(|r| r.environmental),
                risk_social: risk.map(|r| r.social),
                risk_governance: risk.map(|r| r.governance),
                risk_regulatory: risk.map(|r| r.regulatory),
                risk_reputation: risk.map(|r| r.reputation),
            });
        }
    }

    rows
}

/// Write reports to `path` in the requested format. The file is written
/// atomically: a half-written report never replaces an existing one.
pub fn export_reports(
    reports: &[CompanyReport],
    format: ExportFormat,
    path: &Path,
) -> Result<()> {
    let rows = build_rows(reports);

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut file);
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            drop(writer);
        }
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
        }
    }

    file.commit()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
