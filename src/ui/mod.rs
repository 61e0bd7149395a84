pub mod header;
pub mod help;
pub mod process_table;
pub mod properties_panel;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let content_area = chunks[1];
    let properties = if app.show_properties {
        app.selected_properties()
    } else {
        None
    };

    let table_area = if let Some(props) = &properties {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(42)])
            .split(content_area);
        properties_panel::render(frame, h_chunks[1], props, &app.theme);
        h_chunks[0]
    } else {
        content_area
    };
    app.table_area = Some(table_area);

    let mut table_state = app.table_state.clone();
    {
        let rows = app.visible_processes();
        header::render(
            frame,
            chunks[0],
            &header::HeaderInfo {
                process_count: rows.len(),
                sort_mode: app.sort_mode,
                skipped_ticks: app.skipped_ticks,
            },
            &app.totals,
            &app.theme,
            &app.cpu_history,
        );
        process_table::render(frame, table_area, &rows, &mut table_state, &app.theme);
    }
    // Rendering may scroll the viewport; keep the offset for mouse hit-testing
    app.table_state = table_state;

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.filter_text,
        app.status_message.as_ref(),
        &app.keybinds,
        &app.theme,
    );

    // Help overlay last so it sits on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
