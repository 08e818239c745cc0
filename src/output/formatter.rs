use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::fetch::CompanyReport;
use crate::scoring::{PillarDelta, TrendDelta};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score for display, rounded to a whole number the way the web
/// dashboard showed them. The engine keeps full precision; only the rendering
/// rounds.
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

/// Format one pillar's trend delta.
///
/// `Undefined` (previous score was zero) renders as "n/a" and an absent trend
/// as "-". Neither may ever collapse into "0.0%" — a real zero delta is a
/// different answer.
pub fn format_delta(delta: Option<&PillarDelta>) -> String {
    match delta {
        None => "-".to_string(),
        Some(PillarDelta::Undefined) => "n/a".to_string(),
        Some(PillarDelta::Change(pct)) => format!("{:+.1}%", pct),
    }
}

/// Composite-trend cell for the scored table: the environmental delta is not
/// the headline, the composite direction is, so show all three compactly.
fn format_trend_cell(trend: Option<&TrendDelta>) -> String {
    match trend {
        None => "-".to_string(),
        Some(t) => format!(
            "E {} S {} G {}",
            format_delta(Some(&t.environmental)),
            format_delta(Some(&t.social)),
            format_delta(Some(&t.governance))
        ),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a company name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format reports as a scored table: Index, Composite, E/S/G, Trend, Company.
/// Sorted order is the caller's; indices are 1-based.
pub fn format_scored_table(reports: &[CompanyReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No companies found.".to_string();
    }

    let term_width = get_terminal_width();

    reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index_str = format!("{:>2}.", idx + 1);
            let (composite, env, soc, gov) = match report.latest() {
                Some(s) => (
                    format_score(s.composite),
                    format_score(s.environmental),
                    format_score(s.social),
                    format_score(s.governance),
                ),
                None => ("-".to_string(), "-".to_string(), "-".to_string(), "-".to_string()),
            };
            let trend = format_trend_cell(report.trend.as_ref());

            let scores = format!(
                "{:>5}  E{:>5} S{:>5} G{:>5}  {:<28}",
                composite, env, soc, gov, trend
            );

            let fixed_width = 4 + scores.len() + 2;
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&report.company.name, width - fixed_width)
                } else {
                    truncate_name(&report.company.name, 20)
                }
            } else {
                report.company.name.clone()
            };

            if use_colors {
                format!("{} {}  {}", index_str.dimmed(), scores.bold(), name)
            } else {
                format!("{} {}  {}", index_str, scores, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format reports as a risk table: Index, the five risk indices, Company.
/// Higher is worse; companies without data show dashes.
pub fn format_risk_table(reports: &[CompanyReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No companies found.".to_string();
    }

    let header = format!(
        "{:>3} {:>5} {:>5} {:>5} {:>5} {:>5}  {}",
        "#", "Env", "Soc", "Gov", "Reg", "Rep", "Company"
    );

    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, report) in reports.iter().enumerate() {
        let line = match &report.risk {
            Some(risk) => format!(
                "{:>2}. {:>5} {:>5} {:>5} {:>5} {:>5}  {}",
                idx + 1,
                format_score(risk.environmental),
                format_score(risk.social),
                format_score(risk.governance),
                format_score(risk.regulatory),
                format_score(risk.reputation),
                report.company.name
            ),
            None => format!(
                "{:>2}. {:>5} {:>5} {:>5} {:>5} {:>5}  {}",
                idx + 1,
                "-",
                "-",
                "-",
                "-",
                "-",
                report.company.name
            ),
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format a single company with detailed multi-line output (for `show` and
/// verbose mode).
pub fn format_report_detail(report: &CompanyReport, use_colors: bool) -> String {
    let company = &report.company;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(company.name.bold().to_string());
    } else {
        lines.push(company.name.clone());
    }

    let mut meta = Vec::new();
    if let Some(ref industry) = company.industry {
        meta.push(industry.clone());
    }
    if let Some(ref size) = company.size {
        meta.push(size.clone());
    }
    if let Some(ref country) = company.country {
        meta.push(country.clone());
    }
    if !meta.is_empty() {
        lines.push(format!("  {}", meta.join(" | ")));
    }
    if let Some(ref description) = company.description {
        lines.push(format!("  {}", description));
    }

    match report.latest() {
        Some(snapshot) => {
            lines.push(format!(
                "  Scores ({}): Environmental {}  Social {}  Governance {}  Composite {}",
                snapshot.period.date(),
                format_score(snapshot.environmental),
                format_score(snapshot.social),
                format_score(snapshot.governance),
                format_score(snapshot.composite),
            ));
            let trend = report.trend.as_ref();
            lines.push(format!(
                "  Trend vs previous period: E {}  S {}  G {}",
                format_delta(trend.map(|t| &t.environmental)),
                format_delta(trend.map(|t| &t.social)),
                format_delta(trend.map(|t| &t.governance)),
            ));
        }
        None => lines.push("  No ESG data available".to_string()),
    }

    if let Some(ref risk) = report.risk {
        lines.push(format!(
            "  Risk: Env {}  Soc {}  Gov {}  Regulatory {}  Reputation {}",
            format_score(risk.environmental),
            format_score(risk.social),
            format_score(risk.governance),
            format_score(risk.regulatory),
            format_score(risk.reputation),
        ));
    }

    lines.push(format!("  Periods on record: {}", report.snapshots.len()));

    for (label, highlight) in [
        ("Environmental", &company.environmental_highlight),
        ("Social", &company.social_highlight),
        ("Governance", &company.governance_highlight),
    ] {
        if let Some(text) = highlight {
            lines.push(format!("  {} highlight: {}", label, text));
        }
    }

    lines.join("\n")
}

/// Format reports as tab-separated values for scripting.
/// Columns: composite, environmental, social, governance, company
/// (no headers, no colors; companies without data are skipped).
pub fn format_tsv(reports: &[CompanyReport]) -> String {
    reports
        .iter()
        .filter_map(|report| {
            report.latest().map(|s| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    format_score(s.composite),
                    format_score(s.environmental),
                    format_score(s.social),
                    format_score(s.governance),
                    report.company.name
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Company, EsgRecord};
    use crate::fetch::build_report;
    use crate::scoring::{EnvironmentalMetrics, GovernanceMetrics, SocialMetrics};
    use chrono::NaiveDateTime;

    fn company(name: &str) -> Company {
        serde_json::from_str(&format!(
            r#"{{ "id": 1, "name": "{}", "industry": "Energy", "country": "Norway" }}"#,
            name
        ))
        .unwrap()
    }

    fn record(day: u32, renewable: f64, diversity: f64) -> EsgRecord {
        EsgRecord {
            id: day as u64,
            company_id: 1,
            date: NaiveDateTime::parse_from_str(
                &format!("2024-03-{:02}T00:00:00", day),
                "%Y-%m-%dT%H:%M:%S",
            )
            .unwrap(),
            environmental: EnvironmentalMetrics {
                renewable_energy_percent: renewable,
                ..Default::default()
            },
            social: SocialMetrics {
                diversity_ratio: diversity,
                ..Default::default()
            },
            governance: GovernanceMetrics::default(),
        }
    }

    fn sample_report() -> CompanyReport {
        build_report(company("Nordlys Energi"), vec![record(1, 40.0, 50.0), record(15, 60.0, 50.0)])
    }

    #[test]
    fn test_format_score_rounds() {
        assert_eq!(format_score(76.4), "76");
        assert_eq!(format_score(76.5), "76");
        assert_eq!(format_score(-12.7), "-13");
        assert_eq!(format_score(0.0), "0");
    }

    #[test]
    fn test_format_delta_distinguishes_sentinels() {
        assert_eq!(format_delta(None), "-");
        assert_eq!(format_delta(Some(&PillarDelta::Undefined)), "n/a");
        assert_eq!(format_delta(Some(&PillarDelta::Change(0.0))), "+0.0%");
        assert_eq!(format_delta(Some(&PillarDelta::Change(-3.25))), "-3.2%");
    }

    #[test]
    fn test_format_scored_table_empty() {
        assert_eq!(format_scored_table(&[], false), "No companies found.");
    }

    #[test]
    fn test_format_scored_table_single() {
        let reports = vec![sample_report()];
        let result = format_scored_table(&reports, false);
        assert!(result.contains(" 1."));
        assert!(result.contains("Nordlys Energi"));
        // Latest env score: 60*0.4 + 100*0.6 = 84
        assert!(result.contains("84"));
    }

    #[test]
    fn test_format_scored_table_without_data() {
        let reports = vec![build_report(company("No Data AS"), Vec::new())];
        let result = format_scored_table(&reports, false);
        assert!(result.contains("No Data AS"));
        assert!(result.contains("-"));
    }

    #[test]
    fn test_format_risk_table_has_header_and_rows() {
        let reports = vec![sample_report()];
        let result = format_risk_table(&reports, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Reg"));
        assert!(lines[1].contains("Nordlys Energi"));
    }

    #[test]
    fn test_format_report_detail() {
        let report = sample_report();
        let result = format_report_detail(&report, false);
        assert!(result.contains("Nordlys Energi"));
        assert!(result.contains("Energy | Norway"));
        assert!(result.contains("Composite"));
        assert!(result.contains("Trend vs previous period"));
        assert!(result.contains("Periods on record: 2"));
    }

    #[test]
    fn test_format_report_detail_no_data() {
        let report = build_report(company("No Data AS"), Vec::new());
        let result = format_report_detail(&report, false);
        assert!(result.contains("No ESG data available"));
    }

    #[test]
    fn test_format_tsv() {
        let reports = vec![sample_report()];
        let result = format_tsv(&reports);
        let fields: Vec<&str> = result.split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[4], "Nordlys Energi");
    }

    #[test]
    fn test_format_tsv_skips_companies_without_data() {
        let reports = vec![build_report(company("No Data AS"), Vec::new())];
        assert_eq!(format_tsv(&reports), "");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("A Very Long Company Name", 15), "A Very Long ...");
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Ørsted Æøå Holding", 10), "Ørsted ...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Company", 3), "Com");
    }
}
