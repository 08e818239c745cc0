use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::fetch::CompanyReport;
use crate::output::formatter::{format_delta, format_score};
use crate::tui::app::{App, InputMode, View};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Company table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Scores => render_score_table(frame, chunks[2], app),
        View::Risks => render_risk_table(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    // Render loading overlay if loading (appears on top of everything)
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "ESG Scope",
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let right_text = app.config.api.base_url.clone();
    let left_len = "ESG Scope".len();
    let padding_len = (area.width as usize).saturating_sub(left_len + right_text.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right_text, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Scores", "Risks"];
    let selected = match app.current_view {
        View::Scores => 0,
        View::Risks => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.muted))
        .highlight_style(Style::default().fg(app.theme.title_color).bold().reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn score_cell(app: &App, score: f64) -> Cell<'static> {
    Cell::from(format_score(score)).style(Style::default().fg(app.theme.score_color(score)))
}

fn risk_cell(app: &App, risk: f64) -> Cell<'static> {
    Cell::from(format_score(risk)).style(Style::default().fg(app.theme.risk_color(risk)))
}

fn composite_line(app: &App, report: &CompanyReport) -> Line<'static> {
    match report.latest() {
        Some(snapshot) => {
            let color = app.theme.score_color(snapshot.composite);
            let mut spans = vec![Span::styled(
                format!("{:>4} ", format_score(snapshot.composite)),
                Style::default().fg(color),
            )];
            spans.extend(score_bar(app, snapshot.composite, 8).spans);
            Line::from(spans)
        }
        None => Line::from("   - "),
    }
}

fn render_score_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.reports.is_empty() {
        let empty_msg = Paragraph::new("No companies to show")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let rows: Vec<Row> = app
        .reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index = format!("{}.", idx + 1);

            let (env, soc, gov) = match report.latest() {
                Some(s) => (
                    score_cell(app, s.environmental),
                    score_cell(app, s.social),
                    score_cell(app, s.governance),
                ),
                None => (Cell::from("-"), Cell::from("-"), Cell::from("-")),
            };

            let trend = match &report.trend {
                Some(t) => format!(
                    "E {} S {} G {}",
                    format_delta(Some(&t.environmental)),
                    format_delta(Some(&t.social)),
                    format_delta(Some(&t.governance))
                ),
                None => "-".to_string(),
            };

            let row_style = if idx % 2 == 1 {
                Style::default().bg(app.theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(app.theme.index_color)),
                Cell::from(composite_line(app, report)),
                env,
                soc,
                gov,
                Cell::from(trend),
                Cell::from(report.company.name.clone()),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(14), // Composite + bar
        Constraint::Length(5),  // E
        Constraint::Length(5),  // S
        Constraint::Length(5),  // G
        Constraint::Length(30), // Trend
        Constraint::Fill(1),    // Company name
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Env", "Soc", "Gov", "Trend", "Company"])
                .style(app.theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(app.theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_risk_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.reports.is_empty() {
        let empty_msg = Paragraph::new("No companies to show")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let rows: Vec<Row> = app
        .reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index = format!("{}.", idx + 1);

            let cells = match &report.risk {
                Some(risk) => vec![
                    risk_cell(app, risk.environmental),
                    risk_cell(app, risk.social),
                    risk_cell(app, risk.governance),
                    risk_cell(app, risk.regulatory),
                    risk_cell(app, risk.reputation),
                ],
                None => vec![
                    Cell::from("-"),
                    Cell::from("-"),
                    Cell::from("-"),
                    Cell::from("-"),
                    Cell::from("-"),
                ],
            };

            let row_style = if idx % 2 == 1 {
                Style::default().bg(app.theme.row_alt_bg)
            } else {
                Style::default()
            };

            let mut row = vec![Cell::from(index).style(Style::default().fg(app.theme.index_color))];
            row.extend(cells);
            row.push(Cell::from(report.company.name.clone()));

            Row::new(row).style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4), // Index
        Constraint::Length(5), // Env
        Constraint::Length(5), // Soc
        Constraint::Length(5), // Gov
        Constraint::Length(5), // Reg
        Constraint::Length(5), // Rep
        Constraint::Fill(1),   // Company name
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Env", "Soc", "Gov", "Reg", "Rep", "Company"])
                .style(app.theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(app.theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Export failed") || msg.starts_with("Refresh failed") {
            app.theme.flash_error
        } else if msg.starts_with("Refreshed") || msg.starts_with("Opened:") || msg.starts_with("Exported:") {
            app.theme.flash_success
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} companies", app.reports.len());

        let elapsed = app.last_refresh.elapsed();
        let refresh_time = if elapsed.as_secs() < 60 {
            format!("refreshed {}s ago", elapsed.as_secs())
        } else {
            format!("refreshed {}m ago", elapsed.as_secs() / 60)
        };

        let hints = [
            ("j/k", ":nav "),
            ("Enter", ":open "),
            ("b", ":breakdown "),
            ("e", ":export "),
            ("r", ":refresh "),
            ("Tab", ":view "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(count, Style::default().fg(app.theme.muted)),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(app.theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(app.theme.status_key_color),
            ));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area,
    );
}

fn score_bar(app: &App, score: f64, width: usize) -> Line<'static> {
    let ratio = (score / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_color = app.theme.score_color(score);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(bar_color),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(app.theme.bar_empty),
        ));
    }

    Line::from(spans)
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect { x, y, width, height }
}

/// Render the per-company breakdown overlay
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(report) = app.selected_report() else {
        return;
    };

    let popup_area = centered_rect_fixed(64, 18, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .border_style(Style::default().fg(app.theme.popup_border))
        .title(Span::styled(
            format!(" {} ", report.company.short_ref()),
            app.theme.popup_title,
        ));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let mut lines: Vec<Line> = Vec::new();

    match report.latest() {
        Some(snapshot) => {
            lines.push(Line::from(Span::styled(
                format!("Latest period: {}", snapshot.period.date()),
                Style::default().fg(app.theme.muted),
            )));
            lines.push(Line::from(""));

            let trend = report.trend.as_ref();
            let pillars = [
                ("Environmental", snapshot.environmental, trend.map(|t| &t.environmental)),
                ("Social", snapshot.social, trend.map(|t| &t.social)),
                ("Governance", snapshot.governance, trend.map(|t| &t.governance)),
            ];
            for (label, score, delta) in pillars {
                let mut spans = vec![
                    Span::raw(format!("{:<14}", label)),
                    Span::styled(
                        format!("{:>5}  ", format_score(score)),
                        Style::default().fg(app.theme.score_color(score)),
                    ),
                ];
                spans.extend(score_bar(app, score, 16).spans);
                spans.push(Span::raw(format!("  {}", format_delta(delta))));
                lines.push(Line::from(spans));
            }

            lines.push(Line::from(vec![
                Span::raw(format!("{:<14}", "Composite")),
                Span::styled(
                    format!("{:>5}", format_score(snapshot.composite)),
                    Style::default()
                        .fg(app.theme.score_color(snapshot.composite))
                        .bold(),
                ),
            ]));
        }
        None => lines.push(Line::from("No ESG data available")),
    }

    if let Some(ref risk) = report.risk {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Risk exposure (higher is worse)",
            Style::default().fg(app.theme.muted),
        )));
        let risks = [
            ("Environmental", risk.environmental),
            ("Social", risk.social),
            ("Governance", risk.governance),
            ("Regulatory", risk.regulatory),
            ("Reputation", risk.reputation),
        ];
        for (label, value) in risks {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<14}", label)),
                Span::styled(
                    format!("{:>5}", format_score(value)),
                    Style::default().fg(app.theme.risk_color(value)),
                ),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/b to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(50, 14, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .border_style(Style::default().fg(app.theme.popup_border))
        .title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let help_lines = vec![
        Line::from(vec![Span::styled("j / Down      ", key_style), Span::raw("Move down")]),
        Line::from(vec![Span::styled("k / Up        ", key_style), Span::raw("Move up")]),
        Line::from(vec![
            Span::styled("Enter / o     ", key_style),
            Span::raw("Open company in web dashboard"),
        ]),
        Line::from(vec![
            Span::styled("b             ", key_style),
            Span::raw("Score & risk breakdown"),
        ]),
        Line::from(vec![
            Span::styled("e             ", key_style),
            Span::raw("Export reports (CSV/JSON)"),
        ]),
        Line::from(vec![
            Span::styled("Tab           ", key_style),
            Span::raw("Toggle Scores/Risks"),
        ]),
        Line::from(vec![
            Span::styled("r             ", key_style),
            Span::raw("Refresh from backend"),
        ]),
        Line::from(vec![
            Span::styled("?             ", key_style),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![Span::styled("q / Ctrl-c    ", key_style), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(app.theme.muted),
        )),
    ];

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(34, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % 10];

    let text = if app.reports.is_empty() {
        format!("{} Loading companies...", spinner)
    } else {
        format!("{} Refreshing...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));

    frame.render_widget(loading_text, inner);
}
