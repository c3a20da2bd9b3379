//! Shared UI components (header, status bar, notification popup, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::timers::NotificationKind;
use crate::app::{AppState, Focus};

/// Render the top bar: endpoint, record count and the current backdrop.
pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let backdrop = app.backdrop.current().unwrap_or("none");
    let text = format!(
        "endpoint: {}  users:{}  backdrop: {}",
        app.endpoint,
        app.users.len(),
        backdrop
    );
    let p = Paragraph::new(text)
        .block(
            Block::default()
                .title("user-records")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

/// Render the bottom status bar with mode and the keys that apply to it.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let keys = |action: KeyAction| app.keymap.keys_for(action).join("/");
    let msg = if app.confirm.is_active() {
        "mode: CONFIRM  ←/→: choose  Enter: apply  y: yes  n/Esc: cancel".to_string()
    } else {
        match app.focus {
            Focus::Table => format!(
                "mode: {}  {}: edit  {}: delete  {}: new  {}: refresh  {}: form  {}: quit",
                if app.edit.is_active() { "EDIT" } else { "BROWSE" },
                keys(KeyAction::EditSelection),
                keys(KeyAction::DeleteSelection),
                keys(KeyAction::NewRecord),
                keys(KeyAction::Refresh),
                keys(KeyAction::FocusForm),
                keys(KeyAction::Quit),
            ),
            Focus::Form => format!(
                "mode: {}  Tab: next field  Enter: submit  Esc: {}",
                if app.edit.is_active() { "EDIT" } else { "ADD" },
                if app.edit.is_active() { "cancel edit" } else { "table" },
            ),
        }
    };
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the transient notification in the top-right corner while it is visible.
pub fn render_notification(f: &mut Frame, area: Rect, app: &AppState) {
    let n = &app.notification;
    if !n.visible {
        return;
    }
    let (title, color) = match n.kind {
        NotificationKind::Success => ("Success", app.theme.success),
        NotificationKind::Error => ("Error", app.theme.error),
    };
    let chars = n.message.chars().count();
    let width = u16::try_from(chars)
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .clamp(24, area.width.saturating_sub(2).max(24));
    let inner_w = width.saturating_sub(2).max(1) as usize;
    let lines = u16::try_from(chars.div_ceil(inner_w).max(1)).unwrap_or(u16::MAX);
    let rect = top_right_rect(width, lines.saturating_add(2), area);
    let p = Paragraph::new(n.message.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Rectangle anchored one cell in from the top-right corner of `area`.
pub fn top_right_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width.saturating_add(1));
    let y = area.y + 1.min(area.height.saturating_sub(height));
    Rect {
        x,
        y,
        width,
        height,
    }
}
