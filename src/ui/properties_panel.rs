use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Sparkline};

use crate::format::{format_bytes, format_cpu, format_elapsed, format_megabytes};
use crate::system::process::ProcessProperties;
use crate::ui::theme::Theme;

const NOT_AVAILABLE: &str = "N/A";

pub fn render(frame: &mut Frame, area: Rect, props: &ProcessProperties, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Properties ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(inner);

    let path = props
        .path
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |p| p.display().to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", props.display_name),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        detail_line("Name", props.name.clone(), theme),
        detail_line("PID", props.pid.to_string(), theme),
        detail_line("Status", props.state.label().to_string(), theme),
        detail_line("CPU", format_cpu(props.cpu_percent), theme),
        detail_line("Memory", format_megabytes(props.memory_bytes), theme),
        detail_line("Path", path, theme),
        detail_line("Priority", or_na(props.priority), theme),
        detail_line("IO read", or_na(props.io_read_bytes.map(format_bytes)), theme),
        detail_line("IO write", or_na(props.io_write_bytes.map(format_bytes)), theme),
        detail_line("Tracked", format_elapsed(props.tracked_for), theme),
    ];
    if props.protected {
        lines.push(Line::from(Span::styled(
            " System process",
            Style::default().fg(theme.status_err),
        )));
    }

    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let cpu = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.overlay_border))
                .title(" CPU history "),
        )
        .data(&props.cpu_history)
        .max(10_000)
        .style(Style::default().fg(theme.sparkline_color));
    frame.render_widget(cpu, chunks[1]);

    // Scaled to its own peak
    let memory = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.overlay_border))
                .title(" Memory history "),
        )
        .data(&props.memory_history)
        .style(Style::default().fg(theme.accent));
    frame.render_widget(memory, chunks[2]);
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn detail_line(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<9}"),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ])
}
