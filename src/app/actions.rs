//! Operations of the records view.
//!
//! Each operation mutates the view state and returns the request to send, if
//! any. Outcomes come back through [`AppState::apply_outcome`], which may in
//! turn ask for a list re-fetch.
//!
use std::time::Instant;

use super::dispatch::{ApiOutcome, ApiRequest};
use super::timers::NotificationKind;
use super::{AppState, ConfirmChoice, Focus, FormField, Target};
use crate::api::{Operation, RecordId, UserPayload, UserRecord};

impl AppState {
    /// Show `message`, superseding whatever notification is on screen.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notification.show(message, kind);
    }

    /// Advance the notification and backdrop timers.
    pub fn tick(&mut self, now: Instant) {
        self.notification.tick(now);
        self.backdrop.tick(now);
    }

    pub fn load_users(&self) -> ApiRequest {
        ApiRequest::List
    }

    /// Enter in the form: update when editing, create otherwise.
    pub fn submit(&mut self) -> Option<ApiRequest> {
        if self.edit.is_active() {
            self.update_user()
        } else {
            self.create_user()
        }
    }

    pub fn create_user(&mut self) -> Option<ApiRequest> {
        if self.draft.name.is_empty() || self.draft.email.is_empty() {
            self.notify("Name and email are required", NotificationKind::Error);
            return None;
        }
        Some(ApiRequest::Create(UserPayload::from(&self.draft)))
    }

    /// Copy `record` into the draft and remember its id.
    pub fn begin_edit(&mut self, record: &UserRecord) {
        self.edit = Target::Active(record.id);
        self.draft = record.clone();
        self.focus = Focus::Form;
        self.form_field = FormField::Name;
    }

    pub fn edit_selected(&mut self) {
        if let Some(record) = self.selected_user().cloned() {
            self.begin_edit(&record);
        }
    }

    pub fn update_user(&mut self) -> Option<ApiRequest> {
        let id = self.edit.id()?;
        Some(ApiRequest::Update {
            id,
            payload: UserPayload::from(&self.draft),
        })
    }

    pub fn cancel_edit(&mut self) {
        self.exit_edit_mode();
        self.notify("Edit cancelled", NotificationKind::Error);
    }

    fn exit_edit_mode(&mut self) {
        self.edit = Target::Idle;
        self.draft = UserRecord::default();
    }

    /// First half of a delete: remember the id and open the dialog.
    pub fn request_delete(&mut self, id: RecordId) {
        self.confirm = Target::Active(id);
        self.confirm_choice = ConfirmChoice::No;
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_user().map(|u| u.id) {
            self.request_delete(id);
        }
    }

    /// Second half of a delete. Confirmation state is cleared by the outcome.
    pub fn confirm_delete(&mut self) -> Option<ApiRequest> {
        let id = self.confirm.id()?;
        Some(ApiRequest::Delete { id })
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = Target::Idle;
        self.confirm_choice = ConfirmChoice::No;
    }

    /// Fold a finished request into the view. Returns the list re-fetch that
    /// follows every successful write.
    pub fn apply_outcome(&mut self, outcome: ApiOutcome) -> Option<ApiRequest> {
        match outcome {
            ApiOutcome::Listed(Ok(users)) => {
                self.users = users;
                self.clamp_selection();
                None
            }
            ApiOutcome::Listed(Err(message)) => {
                self.notify(message, NotificationKind::Error);
                None
            }
            ApiOutcome::Created(Ok(message)) => {
                // An edit begun while the create was in flight owns the draft now.
                if !self.edit.is_active() {
                    self.draft = UserRecord::default();
                }
                self.notify_success(Operation::Add, message);
                Some(self.load_users())
            }
            ApiOutcome::Updated(Ok(message)) => {
                self.exit_edit_mode();
                self.notify_success(Operation::Update, message);
                Some(self.load_users())
            }
            ApiOutcome::Deleted(Ok(())) => {
                self.cancel_delete();
                self.notify_success(Operation::Delete, None);
                Some(self.load_users())
            }
            ApiOutcome::Created(Err(message)) | ApiOutcome::Updated(Err(message)) => {
                self.notify(message, NotificationKind::Error);
                None
            }
            ApiOutcome::Deleted(Err(message)) => {
                self.cancel_delete();
                self.notify(message, NotificationKind::Error);
                None
            }
        }
    }

    fn notify_success(&mut self, op: Operation, server_message: Option<String>) {
        let text = server_message
            .or_else(|| op.success_message().map(str::to_string))
            .unwrap_or_default();
        self.notify(text, NotificationKind::Success);
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.users.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.users.is_empty() {
            self.selected_index = 0;
            return;
        }
        let last = self.users.len() - 1;
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
    }

    /// Text of the focused form field.
    pub fn field_mut(&mut self) -> &mut String {
        match self.form_field {
            FormField::Name => &mut self.draft.name,
            FormField::Email => &mut self.draft.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRecord {
        UserRecord::new(3, "alice", "alice@example.com")
    }

    #[test]
    fn create_requires_name_and_email() {
        let mut app = AppState::default();
        app.draft.name = "bob".into();
        assert_eq!(app.create_user(), None);
        assert!(app.notification.visible);
        assert_eq!(app.notification.kind, NotificationKind::Error);
    }

    #[test]
    fn update_without_edit_target_is_noop() {
        let mut app = AppState::default();
        app.draft = alice();
        assert_eq!(app.update_user(), None);
        assert!(!app.notification.visible);
    }

    #[test]
    fn submit_routes_on_edit_state() {
        let mut app = AppState::default();
        app.draft.name = "a".into();
        app.draft.email = "a@x".into();
        assert!(matches!(app.submit(), Some(ApiRequest::Create(_))));

        app.begin_edit(&alice());
        assert!(matches!(app.submit(), Some(ApiRequest::Update { id: 3, .. })));
    }

    #[test]
    fn move_selection_stays_in_bounds() {
        let mut app = AppState::default();
        app.move_selection(1);
        assert_eq!(app.selected_index, 0);
        app.users = vec![alice(), UserRecord::new(4, "b", "b@x")];
        app.move_selection(5);
        assert_eq!(app.selected_index, 1);
        app.move_selection(-3);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn list_failure_keeps_previous_rows() {
        let mut app = AppState::default();
        app.users = vec![alice()];
        let next = app.apply_outcome(ApiOutcome::Listed(Err("Failed to fetch users".into())));
        assert_eq!(next, None);
        assert_eq!(app.users, vec![alice()]);
        assert_eq!(app.notification.message, "Failed to fetch users");
    }

    #[test]
    fn delete_failure_clears_confirmation() {
        let mut app = AppState::default();
        app.request_delete(9);
        let next = app.apply_outcome(ApiOutcome::Deleted(Err("Not found.".into())));
        assert_eq!(next, None);
        assert_eq!(app.confirm, Target::Idle);
        assert_eq!(app.notification.kind, NotificationKind::Error);
    }

    #[test]
    fn server_confirmation_text_wins() {
        let mut app = AppState::default();
        app.apply_outcome(ApiOutcome::Created(Ok(Some("✅ User created successfully!".into()))));
        assert_eq!(app.notification.message, "✅ User created successfully!");
        app.apply_outcome(ApiOutcome::Created(Ok(None)));
        assert_eq!(app.notification.message, "User added successfully");
    }
}
