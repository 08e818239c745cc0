//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score colors: ESG scores are "higher is better" (traffic light)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,

    // Risk colors: risk indices are "higher is worse"
    pub risk_high: Color,
    pub risk_mid: Color,
    pub risk_low: Color,

    // Score bar colors
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    /// Dark-background palette
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            risk_high: Color::Red,
            risk_mid: Color::Yellow,
            risk_low: Color::Green,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    /// Light-background palette: same semantic roles, higher-contrast muted
    /// tones.
    pub fn light() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Rgb(160, 110, 0),
            score_low: Color::Red,
            risk_high: Color::Red,
            risk_mid: Color::Rgb(160, 110, 0),
            risk_low: Color::Green,
            bar_empty: Color::Gray,
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a 0-100-ish score where higher is better. Unclamped scores
    /// outside the range just saturate the band.
    pub fn score_color(&self, score: f64) -> Color {
        if score >= 70.0 {
            self.score_high
        } else if score >= 40.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }

    /// Color for a risk index where higher is worse.
    pub fn risk_color(&self, risk: f64) -> Color {
        if risk >= 70.0 {
            self.risk_high
        } else if risk >= 40.0 {
            self.risk_mid
        } else {
            self.risk_low
        }
    }
}

/// Pick a palette from the terminal background: light backgrounds get the
/// light palette, everything else (including detection failure) the dark one.
pub fn resolve_theme() -> ThemeColors {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeColors::light(),
        _ => ThemeColors::dark(),
    }
}
