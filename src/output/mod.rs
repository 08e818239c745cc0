pub mod export;
pub mod formatter;

pub use export::{build_rows, export_reports, ExportFormat, ExportRow};
pub use formatter::{
    format_delta, format_report_detail, format_risk_table, format_score, format_scored_table,
    format_tsv, should_use_colors,
};
