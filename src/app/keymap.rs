//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages the records table shortcuts. It can:
//! - load custom bindings from `keybinds.conf` on top of the defaults
//! - resolve a key press (with modifiers) to a [`KeyAction`]
//! - write the current bindings back out for the operator to edit
//!
//! Only the records table is remappable. The form and the confirmation dialog
//! use fixed keys because every printable character is text input there.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions available while the records table has focus.
///
/// Several key combinations may map to the same action (both `j` and Down
/// move the selection down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Move the selection up one row.
    MoveUp,
    /// Move the selection down one row.
    MoveDown,
    /// Jump one page up.
    PageUp,
    /// Jump one page down.
    PageDown,
    /// Load the selected record into the form.
    EditSelection,
    /// Ask for confirmation before deleting the selected record.
    DeleteSelection,
    /// Focus an empty form for a new record.
    NewRecord,
    /// Fetch the record list again.
    Refresh,
    /// Move focus to the form without touching the draft.
    FocusForm,
    /// Swallow the key.
    Ignore,
}

/// Name used for each action in `keybinds.conf`.
const ACTION_NAMES: [(&str, KeyAction); 11] = [
    ("Quit", KeyAction::Quit),
    ("MoveUp", KeyAction::MoveUp),
    ("MoveDown", KeyAction::MoveDown),
    ("PageUp", KeyAction::PageUp),
    ("PageDown", KeyAction::PageDown),
    ("EditSelection", KeyAction::EditSelection),
    ("DeleteSelection", KeyAction::DeleteSelection),
    ("NewRecord", KeyAction::NewRecord),
    ("Refresh", KeyAction::Refresh),
    ("FocusForm", KeyAction::FocusForm),
    ("Ignore", KeyAction::Ignore),
];

/// Key-to-action table for the records table.
///
/// Bindings are keyed by the exact `(KeyModifiers, KeyCode)` pair, so `Ctrl+r`
/// and `r` are distinct entries. Entries loaded from a file are layered over
/// [`Keymap::new_defaults`]; a file can add or rebind keys but not unbind them.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with the default bindings.
    ///
    /// Includes:
    /// - arrow keys and `j`/`k` for row movement, PageUp/PageDown for paging
    /// - Enter or `e` to edit, Delete or `d` to delete, `n` for a new record
    /// - `r` to refresh, Tab to focus the form, `q` to quit
    ///
    /// Esc is bound to [`KeyAction::Ignore`] so it never quits from the table.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        let none = KeyModifiers::NONE;
        let defaults = [
            (Char('q'), KeyAction::Quit),
            (Esc, KeyAction::Ignore),
            (Up, KeyAction::MoveUp),
            (Char('k'), KeyAction::MoveUp),
            (Down, KeyAction::MoveDown),
            (Char('j'), KeyAction::MoveDown),
            (KeyCode::PageUp, KeyAction::PageUp),
            (KeyCode::PageDown, KeyAction::PageDown),
            (Enter, KeyAction::EditSelection),
            (Char('e'), KeyAction::EditSelection),
            (Delete, KeyAction::DeleteSelection),
            (Char('d'), KeyAction::DeleteSelection),
            (Char('n'), KeyAction::NewRecord),
            (Char('r'), KeyAction::Refresh),
            (Tab, KeyAction::FocusForm),
        ];
        let bindings = defaults
            .into_iter()
            .map(|(code, action)| ((none, code), action))
            .collect();
        Self { bindings }
    }

    /// Load `path` if it exists, otherwise write the defaults there and use them.
    ///
    /// An unreadable file falls back to the defaults. A failed write is logged
    /// and the defaults are still returned.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Parse `Action = KeySpec` lines on top of the defaults. Unknown lines are skipped.
    ///
    /// Blank lines and lines starting with `#` are comments. Returns `None`
    /// only when the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line, "ignoring keybinding line"),
            }
        }
        Some(map)
    }

    /// Write every binding to `path`, one `Action = KeySpec` line each, sorted,
    /// under a short header describing the format and the action names.
    ///
    /// # Errors
    /// Returns the I/O error from writing the file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-records keybindings (records table)\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+r, Enter, Esc, Tab, Up, Down, PageUp, PageDown, Delete\n");
        let names: Vec<&str> = ACTION_NAMES.iter().map(|(n, _)| *n).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(&mut buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    /// Action bound to this exact key press, if any.
    ///
    /// Modifiers must match exactly: with only `r` bound, `Ctrl+r` resolves to `None`.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Key specs bound to `action`, sorted, for help text.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Human-readable key spec, the inverse of the config parser.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

/// Parse a key spec such as `q`, `Ctrl+r` or `PageDown`.
///
/// Only the `Ctrl+` prefix is recognised. Anything longer than one character
/// that is not a named key yields `None`.
fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

/// Look up an action by its config-file name.
fn parse_action(s: &str) -> Option<KeyAction> {
    let name = s.trim();
    ACTION_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, a)| *a)
}

/// Config-file name of `a`, the inverse of the parser.
pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(_, action)| *action == a)
        .map(|(n, _)| *n)
        .unwrap_or("Ignore")
}
