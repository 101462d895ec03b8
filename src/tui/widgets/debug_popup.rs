//! Debug popup widget showing collector timing.
//!
//! Opened with the `!` key.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::collector::{CollectorConfig, CollectorTiming};
use crate::tui::style::Styles;

use super::popup::fixed_centered_rect;

/// Renders the debug popup showing collector timing and refresh settings.
pub fn render_debug_popup(
    frame: &mut Frame,
    area: Rect,
    timing: Option<&CollectorTiming>,
    config: &CollectorConfig,
) {
    let popup_area = fixed_centered_rect(50, 18, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from(vec![Span::styled(
        "=== Collector Timing ===",
        Styles::section(),
    )])];

    if let Some(t) = timing {
        lines.push(format_timing_line("Total", t.total));
        lines.push(format_timing_line("  CPU", t.cpu));
        lines.push(format_timing_line("  Memory", t.memory));
        lines.push(format_timing_line("  Disks", t.disks));
        lines.push(format_timing_line("  Network", t.networks));
        lines.push(format_timing_line("  Processes", t.processes));
        lines.push(format_timing_line("  Tasks", t.tasks));
        lines.push(format_timing_line("  Sensors", t.sensors));
    } else {
        lines.push(Line::from("  (no timing data)"));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "=== Refresh ===",
        Styles::section(),
    )]));
    lines.push(format_info_line(
        "  Network",
        format!("{} ms", config.net_refresh.as_millis()),
    ));
    lines.push(format_info_line(
        "  Tasks",
        format!("{} ms", config.task_refresh.as_millis()),
    ));
    lines.push(format_info_line(
        "  Memory source",
        format!("{:?}", config.memory_source),
    ));

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, popup_area);
}

fn format_timing_line(label: &str, duration: Duration) -> Line<'static> {
    let micros = duration.as_micros();
    let value = if micros >= 1000 {
        format!("{:.2} ms", micros as f64 / 1000.0)
    } else {
        format!("{} µs", micros)
    };
    format_info_line(label, value)
}

fn format_info_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Styles::label()),
        Span::styled(value, Styles::tab_active()),
    ])
}
