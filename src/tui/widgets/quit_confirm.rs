//! Quit confirmation popup.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::style::Styles;

use super::popup::fixed_centered_rect;

/// Keys accepted while the popup is open, as `(keys, effect)`.
const BINDINGS: [(&str, &str); 2] = [("Enter / q", "quit"), ("Esc / n", "keep monitoring")];

pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let popup_area = fixed_centered_rect(44, BINDINGS.len() as u16 + 5, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled("Stop sampling and exit?", Styles::text())),
        Line::from(""),
    ];
    lines.extend(BINDINGS.iter().map(|(keys, effect)| {
        Line::from(vec![
            Span::styled(*keys, Styles::key()),
            Span::styled(format!("  {}", effect), Styles::dim()),
        ])
    }));

    let block = Block::default()
        .title(" Quit sysmon ")
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        popup_area,
    );
}
