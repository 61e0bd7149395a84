use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::app::SortMode;
use crate::system::snapshot::SystemTotals;
use crate::ui::theme::Theme;

/// What the branding block needs to know about the current view.
pub struct HeaderInfo {
    pub process_count: usize,
    pub sort_mode: SortMode,
    pub skipped_ticks: u64,
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    info: &HeaderInfo,
    totals: &SystemTotals,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_branding(frame, chunks[0], info, theme);
    render_ram_gauge(frame, chunks[1], totals, theme);
    render_cpu_sparkline(frame, chunks[2], totals, theme, cpu_history);
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
}

fn render_branding(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let block = bordered(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let secondary = Style::default().fg(theme.text_secondary);
    let mut spans = vec![
        Span::styled(
            " taskview ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("Procs: {}", info.process_count), secondary),
        Span::raw("  "),
        Span::styled(format!("Sort: {}", info.sort_mode.label()), secondary),
    ];

    if info.skipped_ticks > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Skipped: {}", info.skipped_ticks),
            Style::default().fg(theme.status_err),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_ram_gauge(frame: &mut Frame, area: Rect, totals: &SystemTotals, theme: &Theme) {
    let used_mb = totals.memory_used / 1_048_576;
    let total_mb = totals.memory_total / 1_048_576;
    let ratio = if totals.memory_total > 0 {
        (totals.memory_used as f64 / totals.memory_total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let block = bordered(theme).title(Span::styled(
        " RAM ",
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{used_mb}/{total_mb} MB ({:.0}%)", ratio * 100.0));

    frame.render_widget(gauge, area);
}

fn render_cpu_sparkline(
    frame: &mut Frame,
    area: Rect,
    totals: &SystemTotals,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let block = bordered(theme).title(Span::styled(
        format!(" CPU {:.0}% ", totals.cpu_usage_percent),
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ));

    let data: Vec<u64> = cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .max(10_000)
        .style(Style::default().fg(theme.sparkline_color));

    frame.render_widget(sparkline, area);
}
