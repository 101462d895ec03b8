//! Help popup widget with panel-specific keybindings.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::state::Panel;
use crate::tui::style::Styles;

use super::popup::fixed_centered_rect;

/// Renders the help popup for the current panel.
pub fn render_help(frame: &mut Frame, area: Rect, panel: Panel) {
    let content = help_lines(panel);
    let popup_width = (area.width * 60 / 100).clamp(40, 70);
    let popup_height = (content.len() as u16 + 3).min(area.height);
    let popup_area = fixed_centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" Help: {} ", panel.name()))
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
    frame.render_widget(Paragraph::new(content), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Esc", Styles::key()),
            Span::styled(" or ", Styles::dim()),
            Span::styled("?", Styles::key()),
            Span::styled(" close", Styles::dim()),
        ])),
        chunks[1],
    );
}

fn help_lines(panel: Panel) -> Vec<Line<'static>> {
    let mut lines = vec![
        section("Global"),
        binding("Tab / Shift-Tab", "next / previous panel"),
        binding("1 2 3", "System, Memory & Processes, Network"),
        binding("r", "refresh now"),
        binding("!", "collector timing"),
        binding("q", "quit"),
        Line::from(""),
    ];
    match panel {
        Panel::System => {
            lines.push(section("Graphs"));
            lines.push(binding("Left / Right / t", "CPU, Fan, Thermal tab"));
            lines.push(binding("Space / p", "pause graph"));
            lines.push(binding("+ / -", "graph FPS (1-60)"));
            lines.push(binding("] / [", "graph Y scale (0.1-2.0)"));
        }
        Panel::MemoryProcesses => {
            lines.push(section("Processes"));
            lines.push(binding("Up / Down, j / k", "move cursor"));
            lines.push(binding("PgUp / PgDn, Home / End", "scroll"));
            lines.push(binding("Space", "mark process"));
            lines.push(binding("/", "filter by name or pid"));
            lines.push(binding("Esc", "clear filter and marks"));
        }
        Panel::Network => {
            lines.push(section("Network"));
            lines.push(binding("Left / Right / t", "RX, TX, Visual Usage tab"));
        }
    }
    lines
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Styles::section()))
}

fn binding(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<26}", keys), Styles::key()),
        Span::styled(action, Styles::dim()),
    ])
}
