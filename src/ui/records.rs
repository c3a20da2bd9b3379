use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, ConfirmChoice, Focus, FormField, Target};

pub const EMPTY_TABLE_TEXT: &str = "No users found";

fn pane_block(title: String, focused: bool, app: &AppState) -> Block<'static> {
    let border = if focused { app.theme.title } else { app.theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

pub fn render_records_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let widths = [Constraint::Length(8), Constraint::Percentage(40), Constraint::Percentage(60)];
    let header = Row::new(vec!["ID", "NAME", "EMAIL"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = if app.users.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from(EMPTY_TABLE_TEXT),
            Cell::from(""),
        ])
        .style(Style::default().fg(app.theme.muted))]
    } else {
        let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
        let end = (start + app.rows_per_page).min(app.users.len());
        let editing = app.edit.id();
        app.users[start..end]
            .iter()
            .enumerate()
            .map(|(i, u)| {
                let mut style = Style::default().fg(app.theme.text);
                if Some(u.id) == editing {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                if start + i == app.selected_index {
                    style = style
                        .fg(app.theme.highlight_fg)
                        .bg(app.theme.highlight_bg)
                        .add_modifier(Modifier::BOLD);
                }
                Row::new(vec![
                    Cell::from(u.id.to_string()),
                    Cell::from(u.name.clone()),
                    Cell::from(u.email.clone()),
                ])
                .style(style)
            })
            .collect()
    };

    let title = format!("Users ({})", app.users.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(pane_block(title, app.focus == Focus::Table, app))
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Form;
    let title = match app.edit {
        Target::Idle => "Add user".to_string(),
        Target::Active(id) => format!("Edit user #{id}"),
    };

    let field_line = |label: &'static str, value: &str, field: FormField| {
        let active = focused && app.form_field == field;
        let marker = if active { "▶ " } else { "  " };
        let cursor = if active { "_" } else { "" };
        let value_style = if active {
            Style::default().fg(app.theme.highlight_fg)
        } else {
            Style::default().fg(app.theme.text)
        };
        Line::from(vec![
            Span::raw(format!("{marker}{label:<6} ")),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    };

    let submit_hint = if app.edit.is_active() {
        "Enter: update   Esc: cancel edit"
    } else {
        "Enter: add   Esc: back to table"
    };
    let lines = vec![
        field_line("Name", &app.draft.name, FormField::Name),
        Line::raw(""),
        field_line("Email", &app.draft.email, FormField::Email),
        Line::raw(""),
        Line::from(Span::styled(
            submit_hint,
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        )),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(pane_block(title, focused, app));
    f.render_widget(p, area);
}

pub fn render_confirm_dialog(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(id) = app.confirm.id() else {
        return;
    };
    let rect = crate::ui::components::centered_rect(50, 7, area);
    let who = app
        .users
        .iter()
        .find(|u| u.id == id)
        .map(|u| format!("'{}' (id {})", u.name, id))
        .unwrap_or_else(|| format!("id {id}"));
    let (yes, no) = match app.confirm_choice {
        ConfirmChoice::Yes => ("[Yes]", " No  "),
        ConfirmChoice::No => (" Yes ", "[No]"),
    };
    let body = format!("Delete user {who}?\n\n  {yes}    {no}");
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(pane_block("Confirm delete".to_string(), true, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
