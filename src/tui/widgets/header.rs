//! Header bar: panel tabs, host and sample time.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::{AppState, InputMode, Panel};
use crate::tui::style::Styles;

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(" sysmon ", Styles::header())];

    for (i, panel) in Panel::all().iter().enumerate() {
        let style = if *panel == state.current_panel {
            Styles::tab_active()
        } else {
            Styles::tab_inactive()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("{}:{}", i + 1, panel.name()), style));
    }

    if let Some(snapshot) = &state.snapshot {
        spans.push(Span::styled("  | ", Styles::dim()));
        spans.push(Span::styled(snapshot.system.hostname.clone(), Styles::value()));
        spans.push(Span::styled(" | ", Styles::dim()));
        spans.push(Span::raw(format_clock(&snapshot.timestamp)));
    }

    if state.input_mode == InputMode::Filter {
        spans.push(Span::styled("  filter: ", Styles::dim()));
        spans.push(Span::styled(
            format!("{}_", state.process_filter),
            Styles::filter_input(),
        ));
    } else if let Some(msg) = &state.status_message {
        spans.push(Span::styled(format!("  {}", msg), Styles::value()));
    }

    spans.push(Span::styled("  ?:help", Styles::dim()));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `HH:MM:SS` of an RFC 3339 timestamp, or the raw text if it does not parse.
fn format_clock(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
