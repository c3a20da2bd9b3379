//! Application state types and entry glue.
//!
//! Defines the view state of the records screen, its theme, and re-exports the
//! event loop entry function as `run`.
//!
pub mod actions;
pub mod dispatch;
pub mod keymap;
pub mod timers;
pub mod update;

use ratatui::style::Color;

use crate::api::{RecordId, UserRecord};
use keymap::Keymap;
use timers::{Backdrop, Notification};

/// Which pane receives key presses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Table,
    Form,
}

/// Input fields of the form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Name,
        }
    }
}

/// Two-state toggle shared by edit mode and the delete confirmation:
/// either nothing is targeted or exactly one record is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    Idle,
    Active(RecordId),
}

impl Target {
    pub fn id(self) -> Option<RecordId> {
        match self {
            Target::Idle => None,
            Target::Active(id) => Some(id),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Target::Active(_))
    }
}

/// Buttons of the delete confirmation dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    pub fn toggled(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            success: Color::Rgb(0xa6, 0xe3, 0xa1), // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),   // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    fn entries(&self) -> [(&'static str, Color); 12] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
        ]
    }

    /// Load theme from a `key = value` file. Unknown or missing keys keep the `mocha` value.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), Self::parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `reset`.
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn format_color(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            _ => "reset".to_string(),
        }
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-records theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for (key, color) in self.entries() {
            let _ = writeln!(&mut buf, "{} = {}", key, Self::format_color(color));
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default theme there when it does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Everything the records screen shows or remembers between key presses.
///
/// Created fresh on each start; nothing here is persisted.
pub struct AppState {
    /// Last successfully fetched list, in server order.
    pub users: Vec<UserRecord>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    /// Form buffer; `id` is 0 unless a stored record is being edited.
    pub draft: UserRecord,
    pub edit: Target,
    pub confirm: Target,
    pub confirm_choice: ConfirmChoice,
    pub notification: Notification,
    pub backdrop: Backdrop,
    pub focus: Focus,
    pub form_field: FormField,
    pub theme: Theme,
    pub keymap: Keymap,
    /// Collection endpoint, shown in the header.
    pub endpoint: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap, backdrop: Backdrop, endpoint: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            draft: UserRecord::default(),
            edit: Target::Idle,
            confirm: Target::Idle,
            confirm_choice: ConfirmChoice::No,
            notification: Notification::default(),
            backdrop,
            focus: Focus::Table,
            form_field: FormField::Name,
            theme,
            keymap,
            endpoint: endpoint.into(),
            should_quit: false,
        }
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.users.get(self.selected_index)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default(), Backdrop::default(), "")
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
