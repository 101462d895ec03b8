//! Network panel: interface addresses, RX / TX counter tables and usage bars.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs};

use crate::fmt::{format_bytes, format_bytes_rate};
use crate::model::NetworkStats;
use crate::tui::state::{AppState, NET_USAGE_FULL_SCALE, NetTab};
use crate::tui::style::Styles;

pub fn render_network(frame: &mut Frame, area: Rect, state: &AppState) {
    let networks: &[NetworkStats] = state
        .snapshot
        .as_ref()
        .map(|s| s.networks.as_slice())
        .unwrap_or_default();

    let chunks = Layout::vertical([
        Constraint::Length(networks.len().min(10) as u16 + 2),
        Constraint::Length(1),
        Constraint::Min(4),
    ])
    .split(area);

    render_interfaces(frame, chunks[0], networks);
    render_tabs(frame, chunks[1], state.net_tab);
    match state.net_tab {
        NetTab::Rx => render_rx_table(frame, chunks[2], networks),
        NetTab::Tx => render_tx_table(frame, chunks[2], networks),
        NetTab::Usage => render_usage(frame, chunks[2], networks),
    }
}

fn render_interfaces(frame: &mut Frame, area: Rect, networks: &[NetworkStats]) {
    let lines: Vec<Line> = networks
        .iter()
        .map(|n| {
            let ipv4 = if n.ipv4.is_empty() { "-" } else { n.ipv4.as_str() };
            Line::from(vec![
                Span::styled(format!("{:<16}", n.interface), Styles::label()),
                Span::styled(format!("{:<16}", ipv4), Styles::value()),
                Span::styled(
                    format!(
                        "rx {:>12}  tx {:>12}",
                        format_bytes_rate(n.rx_bytes_per_sec),
                        format_bytes_rate(n.tx_bytes_per_sec)
                    ),
                    Styles::net(),
                ),
            ])
        })
        .collect();
    let block = Block::default()
        .title(" Network Interfaces ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, current: NetTab) {
    let titles: Vec<&str> = NetTab::all().iter().map(|t| t.name()).collect();
    let selected = NetTab::all().iter().position(|t| *t == current).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Styles::tab_inactive())
        .highlight_style(Styles::tab_active())
        .divider("|");
    frame.render_widget(tabs, area);
}

fn counter_table<'a>(title: &'a str, headers: [&'a str; 9], rows: Vec<Row<'a>>) -> Table<'a> {
    let header = Row::new(headers.iter().map(|h| Cell::from(*h))).style(Styles::header());
    let mut widths = vec![Constraint::Length(14)];
    widths.extend(std::iter::repeat_n(Constraint::Min(9), 8));
    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn render_rx_table(frame: &mut Frame, area: Rect, networks: &[NetworkStats]) {
    let rows = networks
        .iter()
        .map(|n| {
            Row::new(vec![
                n.interface.clone(),
                format_bytes(n.rx_bytes),
                n.rx_packets.to_string(),
                n.rx_errs.to_string(),
                n.rx_drop.to_string(),
                n.rx_fifo.to_string(),
                n.rx_frame.to_string(),
                n.rx_compressed.to_string(),
                n.rx_multicast.to_string(),
            ])
        })
        .collect();
    let table = counter_table(
        " RX ",
        [
            "Interface", "Bytes", "Packets", "Errors", "Drops", "FIFO", "Frame", "Compressed",
            "Multicast",
        ],
        rows,
    );
    frame.render_widget(table, area);
}

fn render_tx_table(frame: &mut Frame, area: Rect, networks: &[NetworkStats]) {
    let rows = networks
        .iter()
        .map(|n| {
            Row::new(vec![
                n.interface.clone(),
                format_bytes(n.tx_bytes),
                n.tx_packets.to_string(),
                n.tx_errs.to_string(),
                n.tx_drop.to_string(),
                n.tx_fifo.to_string(),
                n.tx_colls.to_string(),
                n.tx_carrier.to_string(),
                n.tx_compressed.to_string(),
            ])
        })
        .collect();
    let table = counter_table(
        " TX ",
        [
            "Interface", "Bytes", "Packets", "Errors", "Drops", "FIFO", "Collisions", "Carrier",
            "Compressed",
        ],
        rows,
    );
    frame.render_widget(table, area);
}

/// Fraction of the full-scale bar covered by `bytes`, capped at 1.
fn usage_ratio(bytes: u64) -> f64 {
    (bytes as f64 / NET_USAGE_FULL_SCALE as f64).min(1.0)
}

fn render_usage(frame: &mut Frame, area: Rect, networks: &[NetworkStats]) {
    let block = Block::default()
        .title(format!(
            " Visual Usage (full bar = {}) ",
            format_bytes(NET_USAGE_FULL_SCALE)
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut bars = Vec::new();
    for n in networks {
        bars.push((format!("RX {}", n.interface), n.rx_bytes));
    }
    for n in networks {
        bars.push((format!("TX {}", n.interface), n.tx_bytes));
    }

    let rows = Layout::vertical(vec![Constraint::Length(1); bars.len()]).split(inner);
    for ((label, bytes), row) in bars.into_iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Styles::net())
            .ratio(usage_ratio(bytes))
            .label(format!("{}: {}", label, format_bytes(bytes)));
        frame.render_widget(gauge, *row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_ratio_is_capped() {
        assert_eq!(usage_ratio(0), 0.0);
        assert_eq!(usage_ratio(NET_USAGE_FULL_SCALE / 2), 0.5);
        assert_eq!(usage_ratio(NET_USAGE_FULL_SCALE * 3), 1.0);
    }
}
