//! Memory & Processes panel: RAM, swap and disk gauges plus the process table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState};

use crate::fmt::{format_bytes, format_percent, format_ticks};
use crate::model::ProcessInfo;
use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;

/// Gauge rows above the process table: RAM, swap, then one per disk.
fn gauge_count(state: &AppState) -> usize {
    2 + state.snapshot.as_ref().map_or(0, |s| s.disks.len())
}

pub fn render_memory_processes(frame: &mut Frame, area: Rect, state: &AppState) {
    let gauges = gauge_count(state).min(8) as u16;
    let chunks = Layout::vertical([
        Constraint::Length(gauges + 2),
        Constraint::Min(5),
    ])
    .split(area);

    render_gauges(frame, chunks[0], state);
    render_processes(frame, chunks[1], state);
}

fn usage_gauge<'a>(label: String, used: u64, total: u64, percent: f64, style: Style) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(style)
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{}  {} / {} ({})",
            label,
            format_bytes(used),
            format_bytes(total),
            format_percent(percent)
        ))
}

fn render_gauges(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title(" Memory & Disks ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snapshot) = &state.snapshot else {
        frame.render_widget(Paragraph::new("collecting..."), inner);
        return;
    };

    let memory = &snapshot.memory;
    let mut gauges = vec![
        usage_gauge(
            "RAM ".to_string(),
            memory.used_ram,
            memory.total_ram,
            memory.ram_usage_percent(),
            Styles::mem(),
        ),
        usage_gauge(
            "SWAP".to_string(),
            memory.used_swap,
            memory.total_swap,
            memory.swap_usage_percent(),
            Styles::mem(),
        ),
    ];
    for disk in &snapshot.disks {
        gauges.push(usage_gauge(
            format!("{} ({})", disk.mount_point, disk.fs_type),
            disk.used_space,
            disk.total_space,
            disk.usage_percent(),
            Styles::disk(),
        ));
    }

    let rows = Layout::vertical(vec![Constraint::Length(1); gauges.len()]).split(inner);
    for (gauge, row) in gauges.into_iter().zip(rows.iter()) {
        frame.render_widget(gauge, *row);
    }
}

const HEADERS: [&str; 9] = [
    "PID", "PPID", "S", "THR", "CPU%", "MEM%", "RSS", "TIME", "NAME",
];

fn process_row(p: &ProcessInfo, marked: bool) -> Row<'static> {
    let cells = vec![
        Cell::from(p.pid.to_string()),
        Cell::from(p.ppid.to_string()),
        Cell::from(p.state.to_string()),
        Cell::from(p.num_threads.to_string()),
        Cell::from(format!("{:.1}", p.cpu_percent)).style(Styles::usage(p.cpu_percent)),
        Cell::from(format!("{:.1}", p.mem_percent)).style(Styles::usage(p.mem_percent)),
        Cell::from(format_bytes(p.rss_bytes)),
        Cell::from(format_ticks(p.utime + p.stime)),
        Cell::from(p.name.clone()),
    ];
    let row = Row::new(cells);
    if marked { row.style(Styles::marked()) } else { row }
}

fn render_processes(frame: &mut Frame, area: Rect, state: &AppState) {
    let processes = state.filtered_processes();
    let rows: Vec<Row> = processes
        .iter()
        .map(|p| process_row(p, state.marked.contains(&p.pid)))
        .collect();

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(Styles::header());
    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(2),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Min(10),
    ];

    let mut title = vec![Span::raw(format!(" Processes ({}", processes.len()))];
    if let Some(snapshot) = &state.snapshot
        && processes.len() != snapshot.processes.len()
    {
        title.push(Span::raw(format!(" of {}", snapshot.processes.len())));
    }
    title.push(Span::raw(")"));
    if !state.marked.is_empty() {
        title.push(Span::styled(
            format!(" {} marked", state.marked.len()),
            Styles::marked(),
        ));
    }
    if !state.process_filter.is_empty() || state.input_mode == InputMode::Filter {
        title.push(Span::styled(
            format!(" filter: {} ", state.process_filter),
            Styles::filter_input(),
        ));
    }
    title.push(Span::raw(" "));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(Line::from(title)).borders(Borders::ALL))
        .row_highlight_style(Styles::selected());

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}
