//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use super::state::PerfTab;

/// Usage at or above this percentage is highlighted as a warning.
pub const WARN_PERCENT: f64 = 75.0;
/// Usage at or above this percentage is highlighted as critical.
pub const CRIT_PERCENT: f64 = 90.0;

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    pub const HEADER_BG: Color = Color::Blue;
    pub const HEADER_FG: Color = Color::White;
    pub const SELECTED_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const VALUE: Color = Color::Yellow;
    pub const ACCENT: Color = Color::Cyan;

    pub const WARNING: Color = Color::Yellow;
    pub const CRITICAL: Color = Color::Red;
    pub const MARKED: Color = Color::Green;

    // One color per graphed metric
    pub const CPU: Color = Color::Cyan;
    pub const FAN: Color = Color::LightBlue;
    pub const THERMAL: Color = Color::LightRed;

    pub const MEM: Color = Color::Magenta;
    pub const DISK: Color = Color::Yellow;
    pub const NET: Color = Color::Green;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Theme::FG)
    }

    /// Header bar and table header rows.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Theme::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label of a `label: value` pair.
    pub fn label() -> Style {
        Self::text()
    }

    /// Value of a `label: value` pair.
    pub fn value() -> Style {
        Style::default().fg(Theme::VALUE)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn marked() -> Style {
        Style::default()
            .fg(Theme::MARKED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Self::dim()
    }

    /// Border of every popup.
    pub fn popup_border() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    /// Section title inside popups.
    pub fn section() -> Style {
        Style::default()
            .fg(Theme::VALUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Key name in a key binding hint.
    pub fn key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    pub fn filter_input() -> Style {
        Self::text().add_modifier(Modifier::UNDERLINED)
    }

    /// Line and reading color of a System graph tab.
    pub fn graph(tab: PerfTab) -> Style {
        let color = match tab {
            PerfTab::Cpu => Theme::CPU,
            PerfTab::Fan => Theme::FAN,
            PerfTab::Thermal => Theme::THERMAL,
        };
        Style::default().fg(color)
    }

    pub fn mem() -> Style {
        Style::default().fg(Theme::MEM)
    }

    pub fn disk() -> Style {
        Style::default().fg(Theme::DISK)
    }

    pub fn net() -> Style {
        Style::default().fg(Theme::NET)
    }

    /// Style for a usage percentage.
    pub fn usage(percent: f64) -> Style {
        if percent >= CRIT_PERCENT {
            Style::default()
                .fg(Theme::CRITICAL)
                .add_modifier(Modifier::BOLD)
        } else if percent >= WARN_PERCENT {
            Style::default().fg(Theme::WARNING)
        } else {
            Self::text()
        }
    }
}
