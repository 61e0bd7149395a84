use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{format_cpu, format_megabytes};
use crate::system::process::TrackedProcess;
use crate::ui::theme::Theme;

const HEADERS: [&str; 5] = ["Name", "PID", "Status", "CPU", "Memory"];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[&TrackedProcess],
    state: &mut TableState,
    theme: &Theme,
) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let body = rows.iter().map(|p| {
        let cpu = p.cpu_percent();
        Row::new(vec![
            Cell::from(p.display_name().to_string()),
            Cell::from(p.pid().to_string()),
            Cell::from(p.state().label()),
            Cell::from(format_cpu(cpu)).style(Style::default().fg(theme.cpu_color(cpu))),
            Cell::from(format_megabytes(p.memory_bytes())),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Processes ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(
        body,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(table, area, state);
}
