use std::time::Instant;

use crate::config::Config;
use crate::fetch::CompanyReport;
use crate::output::{export_reports, ExportFormat};
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Scores,
    Risks,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    Breakdown,
}

pub struct App {
    pub reports: Vec<CompanyReport>,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub last_interaction: Instant,
    pub needs_refresh: bool,
    pub force_refresh: bool,
    pub should_quit: bool,
    pub config: Config,
    pub theme: ThemeColors,
    pub verbose: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl App {
    /// Create an App with no data yet, in loading state. The TUI launches
    /// immediately and the first fetch fills it in.
    pub fn new_loading(config: Config, theme: ThemeColors, verbose: bool) -> Self {
        Self {
            reports: Vec::new(),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Scores,
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            last_interaction: Instant::now(),
            needs_refresh: false,
            force_refresh: false,
            should_quit: false,
            config,
            theme,
            verbose,
            is_loading: true,
            spinner_frame: 0,
        }
    }

    pub fn next_row(&mut self) {
        if self.reports.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.reports.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.reports.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.reports.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_report(&self) -> Option<&CompanyReport> {
        self.table_state.selected().and_then(|i| self.reports.get(i))
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Toggle between Scores and Risks views
    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Scores => View::Risks,
            View::Risks => View::Scores,
        };
    }

    /// Open the selected company in the web dashboard
    pub fn open_selected(&mut self) {
        let Some(report) = self.selected_report() else {
            return;
        };
        let company_id = report.company.id;
        let name = report.company.name.clone();

        match self.config.dashboard_url.clone() {
            Some(url) => match crate::browser::open_company(&url, company_id) {
                Ok(()) => self.show_flash(format!("Opened: {}", name)),
                Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
            },
            None => {
                self.show_flash("No dashboard_url configured".to_string());
            }
        }
    }

    /// Export the current reports using the configured defaults.
    pub fn export_reports(&mut self) {
        if self.reports.is_empty() {
            self.show_flash("Nothing to export".to_string());
            return;
        }

        let export_config = self.config.export.clone();
        let format = export_config
            .as_ref()
            .and_then(|e| e.format.as_deref())
            .unwrap_or("csv")
            .parse::<ExportFormat>()
            .unwrap_or(ExportFormat::Csv);

        let dir = export_config
            .as_ref()
            .and_then(|e| e.out_dir.clone())
            .unwrap_or_else(|| ".".to_string());
        let filename = format!(
            "esg-report-{}.{}",
            chrono::Local::now().format("%Y-%m-%d"),
            format.extension()
        );
        let path = std::path::Path::new(&dir).join(filename);

        match export_reports(&self.reports, format, &path) {
            Ok(()) => self.show_flash(format!("Exported: {}", path.display())),
            Err(e) => self.show_flash(format!("Export failed: {}", e)),
        }
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show the per-company breakdown overlay
    pub fn show_breakdown(&mut self) {
        if self.selected_report().is_some() {
            self.input_mode = InputMode::Breakdown;
        }
    }

    /// Dismiss the breakdown overlay
    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Replace reports with fresh data from a fetch
    pub fn update_reports(&mut self, reports: Vec<CompanyReport>) {
        self.reports = reports;

        // Preserve selection if possible
        if self.reports.is_empty() {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected() {
            if selected >= self.reports.len() {
                self.table_state.select(Some(self.reports.len() - 1));
            }
        } else {
            self.table_state.select(Some(0));
        }

        self.last_refresh = Instant::now();
        self.show_flash(format!("Refreshed ({} companies)", self.reports.len()));
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn auto_refresh_interval(&self) -> std::time::Duration {
        self.config.refresh_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Company;
    use crate::fetch::build_report;
    use crate::tui::theme::ThemeColors;

    fn company(id: u64, name: &str) -> Company {
        serde_json::from_str(&format!(r#"{{ "id": {}, "name": "{}" }}"#, id, name)).unwrap()
    }

    fn app_with_reports(count: u64) -> App {
        let mut app = App::new_loading(Config::default(), ThemeColors::dark(), false);
        let reports = (0..count)
            .map(|i| build_report(company(i, &format!("Company {}", i)), Vec::new()))
            .collect();
        app.update_reports(reports);
        app
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app_with_reports(3);
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn test_navigation_on_empty_list() {
        let mut app = App::new_loading(Config::default(), ThemeColors::dark(), false);
        app.next_row();
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_update_reports_clamps_selection() {
        let mut app = app_with_reports(5);
        app.table_state.select(Some(4));
        let fewer = (0..2)
            .map(|i| build_report(company(i, &format!("Company {}", i)), Vec::new()))
            .collect();
        app.update_reports(fewer);
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[test]
    fn test_toggle_view() {
        let mut app = app_with_reports(1);
        assert_eq!(app.current_view, View::Scores);
        app.toggle_view();
        assert_eq!(app.current_view, View::Risks);
        app.toggle_view();
        assert_eq!(app.current_view, View::Scores);
    }

    #[test]
    fn test_breakdown_requires_selection() {
        let mut app = App::new_loading(Config::default(), ThemeColors::dark(), false);
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);

        let mut app = app_with_reports(1);
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Breakdown);
    }

    #[test]
    fn test_open_without_dashboard_url_flashes() {
        let mut app = app_with_reports(1);
        app.open_selected();
        let (msg, _) = app.flash_message.clone().unwrap();
        assert!(msg.contains("dashboard_url"));
    }
}
