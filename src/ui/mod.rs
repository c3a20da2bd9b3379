pub mod components;
pub mod records;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::AppState;

/// Draw the whole screen: header, records table beside the form, status bar,
/// then the confirmation dialog and notification on top.
pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    components::render_header(f, root[0], app);
    records::render_records_table(f, body[0], app);
    records::render_form(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    let screen = f.area();
    if app.confirm.is_active() {
        records::render_confirm_dialog(f, screen, app);
    }
    components::render_notification(f, screen, app);
}
