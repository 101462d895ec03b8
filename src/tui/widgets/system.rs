//! System panel: host identity, task counts and the CPU / fan / thermal graphs.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs};

use crate::fmt::format_percent;
use crate::history::MetricHistory;
use crate::model::SystemSnapshot;
use crate::tui::state::{AppState, MAX_FAN_RPM, PerfTab};
use crate::tui::style::Styles;

pub fn render_system(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Length(9), // Identity + tasks
        Constraint::Length(1), // Tabs
        Constraint::Length(2), // Reading + graph controls
        Constraint::Min(5),    // Graph
    ])
    .split(area);

    render_identity(frame, chunks[0], state.snapshot.as_ref());
    render_tabs(frame, chunks[1], state.perf_tab);
    render_reading(frame, chunks[2], state);
    render_graph(frame, chunks[3], state.perf_tab, state.active_history());
}

fn pair(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Styles::label()),
        Span::styled(value, Styles::value()),
    ])
}

fn render_identity(frame: &mut Frame, area: Rect, snapshot: Option<&SystemSnapshot>) {
    let block = Block::default().title(" System ").borders(Borders::ALL);
    let Some(snapshot) = snapshot else {
        frame.render_widget(Paragraph::new("collecting...").block(block), area);
        return;
    };
    let system = &snapshot.system;
    let tasks = &snapshot.tasks;

    let lines = vec![
        pair("Operating System:", system.os_name.clone()),
        pair("Computer Name:", system.hostname.clone()),
        pair("Logged in User:", system.user.clone()),
        pair("CPU Model:", system.cpu.model.clone()),
        pair(
            "CPU Vendor:",
            format!("{} ({} logical CPUs)", system.cpu.vendor, system.logical_cpus),
        ),
        pair(
            "Tasks:",
            format!(
                "{} total, {} running, {} sleeping, {} uninterruptible, {} zombie, {} traced",
                tasks.total,
                tasks.running,
                tasks.sleeping,
                tasks.uninterruptible,
                tasks.zombie,
                tasks.traced
            ),
        ),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, current: PerfTab) {
    let titles: Vec<&str> = PerfTab::all().iter().map(|t| t.name()).collect();
    let selected = PerfTab::all().iter().position(|t| *t == current).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Styles::tab_inactive())
        .highlight_style(Styles::tab_active())
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_reading(frame: &mut Frame, area: Rect, state: &AppState) {
    let history = state.active_history();
    let current = history.current();
    let style = Styles::graph(state.perf_tab);
    let reading = match state.perf_tab {
        PerfTab::Cpu => Line::from(vec![
            Span::raw("CPU Usage: "),
            Span::styled(format_percent(f64::from(current)), style),
        ]),
        PerfTab::Fan => {
            let status = if current > 0.0 { "Active" } else { "Inactive" };
            let level = (f64::from(current) * 100.0 / MAX_FAN_RPM) as u64;
            Line::from(vec![
                Span::raw("Fan Speed: "),
                Span::styled(format!("{} RPM", current as u64), style),
                Span::raw(format!("   Status: {}   Level: {}%", status, level)),
            ])
        }
        PerfTab::Thermal => Line::from(vec![
            Span::raw("Temperature: "),
            Span::styled(format!("{:.1}°C", current), style),
        ]),
    };

    let paused = if history.is_paused() { "yes" } else { "no" };
    let controls = Line::from(vec![Span::styled(
        format!(
            "Paused: {}   FPS: {}   Y Scale: {:.1}",
            paused,
            history.fps(),
            history.y_scale()
        ),
        Styles::dim(),
    )]);
    frame.render_widget(Paragraph::new(vec![reading, controls]), area);
}

fn render_graph(frame: &mut Frame, area: Rect, tab: PerfTab, history: &MetricHistory) {
    let points = history.points();
    let x_max = history.capacity().saturating_sub(1).max(1) as f64;
    let y_max = history.y_bound(tab.y_max());

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Styles::graph(tab))
        .data(&points);
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" {} ", tab.name()))
                .borders(Borders::ALL),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{}", y_max as u64))]),
        );
    frame.render_widget(chart, area);
}
