use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::app::dispatch::{ApiOutcome, ApiRequest, Dispatcher};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, ConfirmChoice, Focus};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drive the records screen until the operator quits.
///
/// Fetches the list once on entry, then alternates between drawing, applying
/// finished requests, and handling at most one key press per tick.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
    outcomes: &Receiver<ApiOutcome>,
) -> Result<()> {
    info!(endpoint = %app.endpoint, "starting records view");
    dispatcher.dispatch(app.load_users());

    loop {
        app.tick(Instant::now());

        while let Ok(outcome) = outcomes.try_recv() {
            if let Some(next) = app.apply_outcome(outcome) {
                dispatcher.dispatch(next);
            }
        }

        terminal
            .draw(|f| ui::render(f, app))
            .context("draw frame")?;

        if event::poll(POLL_INTERVAL).context("poll terminal events")?
            && let Event::Key(key) = event::read().context("read terminal event")?
            && key.kind == KeyEventKind::Press
            && let Some(request) = handle_key(app, key)
        {
            dispatcher.dispatch(request);
        }

        if app.should_quit {
            info!("quit requested");
            break;
        }
    }

    Ok(())
}

/// Apply one key press to the view. Returns the request it triggers, if any.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<ApiRequest> {
    if app.confirm.is_active() {
        return handle_confirm_key(app, key.code);
    }
    match app.focus {
        Focus::Table => handle_table_key(app, key),
        Focus::Form => handle_form_key(app, key),
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) -> Option<ApiRequest> {
    let action = app.keymap.resolve(&key)?;
    debug!(?action, "table key");
    let page = app.rows_per_page.max(1) as isize;
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-page),
        KeyAction::PageDown => app.move_selection(page),
        KeyAction::EditSelection => app.edit_selected(),
        KeyAction::DeleteSelection => app.request_delete_selected(),
        KeyAction::NewRecord => {
            if app.edit.is_active() {
                app.cancel_edit();
            }
            app.focus = Focus::Form;
            app.form_field = crate::app::FormField::Name;
        }
        KeyAction::Refresh => return Some(app.load_users()),
        KeyAction::FocusForm => app.focus = Focus::Form,
        KeyAction::Ignore => {}
    }
    None
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) -> Option<ApiRequest> {
    match key.code {
        KeyCode::Esc => {
            if app.edit.is_active() {
                app.cancel_edit();
            }
            app.focus = Focus::Table;
        }
        KeyCode::Enter => return app.submit(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.form_field = app.form_field.next();
        }
        KeyCode::Backspace => {
            app.field_mut().pop();
        }
        // Chords such as Ctrl+c are not text.
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            app.field_mut().push(c)
        }
        _ => {}
    }
    None
}

fn handle_confirm_key(app: &mut AppState, code: KeyCode) -> Option<ApiRequest> {
    match code {
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.confirm_choice = app.confirm_choice.toggled();
        }
        KeyCode::Char('y') => return app.confirm_delete(),
        KeyCode::Enter => match app.confirm_choice {
            ConfirmChoice::Yes => return app.confirm_delete(),
            ConfirmChoice::No => app.cancel_delete(),
        },
        _ => {}
    }
    None
}
