//! Inline profile-field editing.
//!
//! Every field is either showing its value or being edited, and at most one
//! field is being edited at a time. The coordinator owns that invariant: it
//! holds the single [`EditSession`] and forces the previous field back to
//! display before another one opens.
//!
//! Saving is optimistic with rollback. `commit_edit` decides locally whether
//! anything has to be sent; when it does, the caller performs the request and
//! reports the result to `finish_commit`. Until then the session is in flight
//! and every other transition is refused, so saves cannot overlap and cannot
//! be cancelled.

pub mod field;
pub mod validation;

use std::fmt;

use crate::error::AppError;
use crate::infra::local_storage::LocalCache;
use crate::notify::Notice;
use crate::service::profile::{ProfileRecord, ProfileService, ProfileUpdate};
use field::{EditSession, Field, FieldKey, FieldState};

pub const SAVED_NOTICE: &str = "Profile updated successfully!";
pub const ROLLBACK_NOTICE: &str = "Failed to update profile. Please try again.";

/// Capability a UI layer provides to show values and hand back edits.
pub trait FieldView {
    fn render(&mut self, key: FieldKey, value: &str);
    fn read_buffer(&self, key: FieldKey) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    UnknownField(FieldKey),
    NotInDisplay(FieldKey),
    NotEditing(FieldKey),
    SaveInFlight(FieldKey),
    NoPendingSave(FieldKey),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(key) => write!(f, "Field '{key}' is not editable here"),
            Self::NotInDisplay(key) => write!(f, "Field '{key}' is already being edited"),
            Self::NotEditing(key) => write!(f, "Field '{key}' is not being edited"),
            Self::SaveInFlight(key) => write!(f, "Still saving '{key}', please wait"),
            Self::NoPendingSave(key) => write!(f, "No save is pending for '{key}'"),
        }
    }
}

impl std::error::Error for EditorError {}

/// What `commit_edit` decided without talking to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitStep {
    /// Empty or unchanged buffer. The field is back in display.
    Unchanged,
    /// Validation refused the value. The field stays in edit mode.
    Invalid(AppError),
    /// The update has to be sent; report the result to `finish_commit`.
    Pending(ProfileUpdate),
}

/// Result of a full commit including the remote round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Unchanged,
    Invalid(AppError),
    Saved(Notice),
    RolledBack(Notice),
}

#[derive(Debug, Clone)]
pub struct FieldEditor {
    fields: Vec<Field>,
    active: Option<EditSession>,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self::new(FieldKey::ALL)
    }
}

impl FieldEditor {
    pub fn new(keys: impl IntoIterator<Item = FieldKey>) -> Self {
        let mut fields: Vec<Field> = Vec::new();
        for key in keys {
            if !fields.iter().any(|f| f.key() == key) {
                fields.push(Field::new(key, ""));
            }
        }
        Self {
            fields,
            active: None,
        }
    }

    /// Sets displayed values from a loaded record. Fields absent from the
    /// record, and the field being edited, keep what they show.
    pub fn load(&mut self, record: &ProfileRecord) {
        let active = self.active_field();
        for field in &mut self.fields {
            if Some(field.key()) == active {
                continue;
            }
            if let Some(value) = record.get(&field.key()) {
                field.displayed_value = value.clone();
            }
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn field(&self, key: FieldKey) -> Option<&Field> {
        self.fields.iter().find(|f| f.key() == key)
    }

    pub fn active_field(&self) -> Option<FieldKey> {
        self.active.as_ref().map(|s| s.field)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.active.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.active.as_ref().is_some_and(EditSession::in_flight)
    }

    fn field_mut(&mut self, key: FieldKey) -> Result<&mut Field, EditorError> {
        self.fields
            .iter_mut()
            .find(|f| f.key() == key)
            .ok_or(EditorError::UnknownField(key))
    }

    fn ensure_idle(&self) -> Result<(), EditorError> {
        match &self.active {
            Some(session) if session.in_flight() => Err(EditorError::SaveInFlight(session.field)),
            _ => Ok(()),
        }
    }

    fn ensure_editing(&self, key: FieldKey) -> Result<(), EditorError> {
        self.field(key).ok_or(EditorError::UnknownField(key))?;
        match &self.active {
            Some(session) if session.field == key => Ok(()),
            _ => Err(EditorError::NotEditing(key)),
        }
    }

    pub fn begin_edit(&mut self, key: FieldKey) -> Result<(), EditorError> {
        self.ensure_idle()?;
        if self.field(key).ok_or(EditorError::UnknownField(key))?.is_editing() {
            return Err(EditorError::NotInDisplay(key));
        }

        if let Some(other) = self.active_field() {
            tracing::debug!(from = %other, to = %key, "Closing open field");
            self.cancel_edit(other)?;
        }

        let field = self.field_mut(key)?;
        let original_value = field.displayed_value.clone();
        field.edit_buffer = original_value.clone();
        field.state = FieldState::Editing;

        self.active = Some(EditSession {
            field: key,
            original_value,
            pending: None,
        });
        Ok(())
    }

    pub fn cancel_edit(&mut self, key: FieldKey) -> Result<(), EditorError> {
        self.ensure_editing(key)?;
        self.ensure_idle()?;

        let field = self.field_mut(key)?;
        field.edit_buffer.clear();
        field.state = FieldState::Display;
        self.active = None;
        Ok(())
    }

    /// Replaces the buffer of the field being edited.
    pub fn set_buffer(&mut self, key: FieldKey, value: impl Into<String>) -> Result<(), EditorError> {
        self.ensure_editing(key)?;
        self.ensure_idle()?;
        self.field_mut(key)?.edit_buffer = value.into();
        Ok(())
    }

    /// Pulls the active buffer from the view.
    pub fn sync_buffer(&mut self, view: &dyn FieldView) {
        if self.is_saving() {
            return;
        }
        if let Some(key) = self.active_field() {
            if let Some(buffer) = view.read_buffer(key) {
                if let Ok(field) = self.field_mut(key) {
                    field.edit_buffer = buffer;
                }
            }
        }
    }

    /// Pushes every displayed value to the view.
    pub fn render_into(&self, view: &mut dyn FieldView) {
        for field in &self.fields {
            view.render(field.key(), &field.displayed_value);
        }
    }

    /// Live notice for the field being edited, if its buffer is not acceptable.
    pub fn live_notice(&self, key: FieldKey) -> Option<&'static str> {
        let field = self.field(key).filter(|f| f.is_editing())?;
        validation::live_check(key.kind(), &field.edit_buffer)
    }

    pub fn commit_edit(&mut self, key: FieldKey) -> Result<CommitStep, EditorError> {
        self.ensure_editing(key)?;
        self.ensure_idle()?;

        let original = self
            .active
            .as_ref()
            .map(|s| s.original_value.clone())
            .unwrap_or_default();
        let new_value = self.field_mut(key)?.edit_buffer.trim().to_string();

        if new_value.is_empty() || new_value == original {
            let field = self.field_mut(key)?;
            field.displayed_value = original;
            field.edit_buffer.clear();
            field.state = FieldState::Display;
            self.active = None;
            return Ok(CommitStep::Unchanged);
        }

        if let Err(e) = validation::validate(key.kind(), &new_value) {
            tracing::debug!(field = %key, error = %e, "Commit refused by validation");
            return Ok(CommitStep::Invalid(e));
        }

        if let Some(session) = self.active.as_mut() {
            session.pending = Some(new_value.clone());
        }
        Ok(CommitStep::Pending(ProfileUpdate {
            key,
            value: new_value,
        }))
    }

    /// Applies the backend's answer to a pending commit. Success keeps the
    /// new value and mirrors it into the cache; any failure rolls back to the
    /// value shown before editing began.
    pub fn finish_commit(
        &mut self,
        key: FieldKey,
        result: Result<(), AppError>,
        cache: &dyn LocalCache,
    ) -> Result<Notice, EditorError> {
        let session = match &self.active {
            Some(session) if session.field == key && session.in_flight() => session.clone(),
            _ => return Err(EditorError::NoPendingSave(key)),
        };
        self.active = None;

        let field = self.field_mut(key)?;
        field.edit_buffer.clear();
        field.state = FieldState::Display;

        match result {
            Ok(()) => {
                let value = session.pending.unwrap_or_default();
                field.displayed_value = value.clone();
                if let Err(e) = cache.set(&key.cache_key(), &value) {
                    tracing::warn!(field = %key, error = %e, "Failed to mirror saved value");
                }
                tracing::info!(field = %key, "Profile field saved");
                Ok(Notice::success(SAVED_NOTICE))
            }
            Err(e) => {
                field.displayed_value = session.original_value;
                tracing::warn!(field = %key, error = %e, "Profile update failed, rolled back");
                Ok(Notice::error(ROLLBACK_NOTICE))
            }
        }
    }

    /// `commit_edit` and `finish_commit` back to back.
    pub async fn commit_with(
        &mut self,
        key: FieldKey,
        service: &dyn ProfileService,
        cache: &dyn LocalCache,
        token: Option<&str>,
    ) -> Result<CommitOutcome, EditorError> {
        let update = match self.commit_edit(key)? {
            CommitStep::Unchanged => return Ok(CommitOutcome::Unchanged),
            CommitStep::Invalid(e) => return Ok(CommitOutcome::Invalid(e)),
            CommitStep::Pending(update) => update,
        };

        let result = match token {
            Some(token) => service.update_profile(&update, token).await,
            None => Err(AppError::NotAuthenticated),
        };
        let succeeded = result.is_ok();
        let notice = self.finish_commit(key, result, cache)?;

        Ok(if succeeded {
            CommitOutcome::Saved(notice)
        } else {
            CommitOutcome::RolledBack(notice)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::infra::local_storage::MemoryCache;
    use crate::notify::ToastLevel;

    #[derive(Default)]
    struct FakeProfileService {
        updates: Mutex<Vec<ProfileUpdate>>,
        failure: Option<AppError>,
    }

    impl FakeProfileService {
        fn failing(err: AppError) -> Self {
            Self {
                failure: Some(err),
                ..Self::default()
            }
        }

        fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProfileService for FakeProfileService {
        async fn fetch_profile(&self, _token: &str) -> Result<ProfileRecord, AppError> {
            Ok(ProfileRecord::new())
        }

        async fn update_profile(&self, update: &ProfileUpdate, _token: &str) -> Result<(), AppError> {
            self.updates.lock().unwrap().push(update.clone());
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        async fn change_password(&self, _old: &str, _new: &str, _token: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingView {
        shown: BTreeMap<FieldKey, String>,
        input: Option<(FieldKey, String)>,
    }

    impl FieldView for RecordingView {
        fn render(&mut self, key: FieldKey, value: &str) {
            self.shown.insert(key, value.to_string());
        }

        fn read_buffer(&self, key: FieldKey) -> Option<String> {
            self.input
                .as_ref()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        }
    }

    fn loaded_editor() -> FieldEditor {
        let mut editor = FieldEditor::default();
        let record: ProfileRecord = [
            (FieldKey::Name, "Jane".to_string()),
            (FieldKey::Email, "jane@maxx.energy".to_string()),
            (FieldKey::Location, "Austin".to_string()),
        ]
        .into_iter()
        .collect();
        editor.load(&record);
        editor
    }

    fn editing_count(editor: &FieldEditor) -> usize {
        editor.fields().filter(|f| f.is_editing()).count()
    }

    #[test]
    fn test_begin_edit_seeds_buffer_from_display() {
        let mut editor = loaded_editor();
        editor.begin_edit(FieldKey::Name).unwrap();

        let field = editor.field(FieldKey::Name).unwrap();
        assert_eq!(field.state(), FieldState::Editing);
        assert_eq!(field.edit_buffer(), "Jane");
        assert_eq!(editor.active_field(), Some(FieldKey::Name));
        assert_eq!(editor.session().unwrap().original_value, "Jane");
    }

    #[test]
    fn test_second_begin_closes_first_field() {
        let mut editor = loaded_editor();
        editor.begin_edit(FieldKey::Name).unwrap();
        editor.set_buffer(FieldKey::Name, "Someone Else").unwrap();

        editor.begin_edit(FieldKey::Location).unwrap();

        let name = editor.field(FieldKey::Name).unwrap();
        assert_eq!(name.state(), FieldState::Display);
        assert_eq!(name.displayed_value(), "Jane");
        assert_eq!(editor.active_field(), Some(FieldKey::Location));
        assert_eq!(editing_count(&editor), 1);
    }

    #[test]
    fn test_at_most_one_field_editing_for_any_sequence() {
        let mut editor = loaded_editor();
        let sequence = [
            FieldKey::Name,
            FieldKey::Skills,
            FieldKey::Skills,
            FieldKey::Email,
            FieldKey::Name,
            FieldKey::About,
            FieldKey::Location,
            FieldKey::About,
        ];
        for key in sequence {
            let _ = editor.begin_edit(key);
            assert!(editing_count(&editor) <= 1);
            assert_eq!(editor.active_field(), Some(key));
        }
        assert_eq!(editor.field(FieldKey::Name).unwrap().displayed_value(), "Jane");
    }

    #[test]
    fn test_begin_on_editing_field_is_refused() {
        let mut editor = loaded_editor();
        editor.begin_edit(FieldKey::Name).unwrap();
        assert_eq!(
            editor.begin_edit(FieldKey::Name),
            Err(EditorError::NotInDisplay(FieldKey::Name))
        );
    }

    #[test]
    fn test_cancel_discards_buffer() {
        let mut editor = loaded_editor();
        editor.begin_edit(FieldKey::Location).unwrap();
        editor.set_buffer(FieldKey::Location, "Houston").unwrap();
        editor.cancel_edit(FieldKey::Location).unwrap();

        let field = editor.field(FieldKey::Location).unwrap();
        assert_eq!(field.displayed_value(), "Austin");
        assert_eq!(field.edit_buffer(), "");
        assert_eq!(editor.active_field(), None);
        assert_eq!(
            editor.cancel_edit(FieldKey::Location),
            Err(EditorError::NotEditing(FieldKey::Location))
        );
    }

    #[test]
    fn test_unknown_field() {
        let mut editor = FieldEditor::new([FieldKey::Name]);
        assert_eq!(
            editor.begin_edit(FieldKey::Skills),
            Err(EditorError::UnknownField(FieldKey::Skills))
        );
    }

    #[tokio::test]
    async fn test_unchanged_commit_makes_no_remote_call() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Name).unwrap();
        editor.set_buffer(FieldKey::Name, "  Jane ").unwrap();
        let outcome = editor
            .commit_with(FieldKey::Name, &service, &cache, Some("tok"))
            .await
            .unwrap();

        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert_eq!(service.update_count(), 0);
        assert_eq!(editor.field(FieldKey::Name).unwrap().displayed_value(), "Jane");
        assert_eq!(editor.active_field(), None);
    }

    #[tokio::test]
    async fn test_empty_commit_is_a_no_op() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Location).unwrap();
        editor.set_buffer(FieldKey::Location, "   ").unwrap();
        let outcome = editor
            .commit_with(FieldKey::Location, &service, &cache, Some("tok"))
            .await
            .unwrap();

        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert_eq!(service.update_count(), 0);
        assert_eq!(
            editor.field(FieldKey::Location).unwrap().displayed_value(),
            "Austin"
        );
    }

    #[tokio::test]
    async fn test_trimmed_value_saved_and_mirrored() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Name).unwrap();
        editor.set_buffer(FieldKey::Name, "  Jane Doe  ").unwrap();
        let outcome = editor
            .commit_with(FieldKey::Name, &service, &cache, Some("tok"))
            .await
            .unwrap();

        assert_eq!(outcome, CommitOutcome::Saved(Notice::success(SAVED_NOTICE)));
        assert_eq!(
            service.updates.lock().unwrap()[0],
            ProfileUpdate {
                key: FieldKey::Name,
                value: "Jane Doe".into()
            }
        );
        assert_eq!(
            editor.field(FieldKey::Name).unwrap().displayed_value(),
            "Jane Doe"
        );
        assert_eq!(cache.get("profile_name").as_deref(), Some("Jane Doe"));
        assert_eq!(editor.field(FieldKey::Name).unwrap().state(), FieldState::Display);
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back() {
        let service = FakeProfileService::failing(AppError::ServerError(500, "boom".into()));
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();
        let before = editor.field(FieldKey::Location).unwrap().displayed_value().to_string();

        editor.begin_edit(FieldKey::Location).unwrap();
        editor.set_buffer(FieldKey::Location, "Houston").unwrap();
        let outcome = editor
            .commit_with(FieldKey::Location, &service, &cache, Some("tok"))
            .await
            .unwrap();

        match outcome {
            CommitOutcome::RolledBack(notice) => {
                assert_eq!(notice.level, ToastLevel::Error);
                assert_eq!(notice.text, ROLLBACK_NOTICE);
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        let field = editor.field(FieldKey::Location).unwrap();
        assert_eq!(field.displayed_value(), before);
        assert_eq!(field.state(), FieldState::Display);
        assert_eq!(cache.get("profile_location"), None);
        assert_eq!(service.update_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_rolls_back_without_call() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Name).unwrap();
        editor.set_buffer(FieldKey::Name, "Janet").unwrap();
        let outcome = editor
            .commit_with(FieldKey::Name, &service, &cache, None)
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::RolledBack(_)));
        assert_eq!(service.update_count(), 0);
        assert_eq!(editor.field(FieldKey::Name).unwrap().displayed_value(), "Jane");
    }

    #[tokio::test]
    async fn test_invalid_email_blocks_commit() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Email).unwrap();
        editor.set_buffer(FieldKey::Email, "bad-email").unwrap();
        assert!(editor.live_notice(FieldKey::Email).is_some());

        let outcome = editor
            .commit_with(FieldKey::Email, &service, &cache, Some("tok"))
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Invalid(AppError::InvalidInput(_))));
        assert_eq!(service.update_count(), 0);
        assert_eq!(editor.field(FieldKey::Email).unwrap().state(), FieldState::Editing);
        assert_eq!(editor.active_field(), Some(FieldKey::Email));
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_at_sign_blocks_text_commit() {
        let service = FakeProfileService::default();
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::About).unwrap();
        editor.set_buffer(FieldKey::About, "reach me @ hq").unwrap();
        let outcome = editor
            .commit_with(FieldKey::About, &service, &cache, Some("tok"))
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Invalid(_)));
        assert!(editor.field(FieldKey::About).unwrap().is_editing());
        assert_eq!(service.update_count(), 0);
    }

    #[test]
    fn test_pending_save_blocks_other_transitions() {
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();

        editor.begin_edit(FieldKey::Name).unwrap();
        editor.set_buffer(FieldKey::Name, "Janet").unwrap();
        let step = editor.commit_edit(FieldKey::Name).unwrap();
        assert!(matches!(step, CommitStep::Pending(_)));
        assert!(editor.is_saving());

        assert_eq!(
            editor.begin_edit(FieldKey::Email),
            Err(EditorError::SaveInFlight(FieldKey::Name))
        );
        assert_eq!(
            editor.cancel_edit(FieldKey::Name),
            Err(EditorError::SaveInFlight(FieldKey::Name))
        );
        assert_eq!(
            editor.set_buffer(FieldKey::Name, "x"),
            Err(EditorError::SaveInFlight(FieldKey::Name))
        );

        let notice = editor.finish_commit(FieldKey::Name, Ok(()), &cache).unwrap();
        assert_eq!(notice.level, ToastLevel::Success);
        assert!(!editor.is_saving());
        editor.begin_edit(FieldKey::Email).unwrap();
    }

    #[test]
    fn test_finish_without_pending_save() {
        let cache = MemoryCache::new();
        let mut editor = loaded_editor();
        assert_eq!(
            editor.finish_commit(FieldKey::Name, Ok(()), &cache),
            Err(EditorError::NoPendingSave(FieldKey::Name))
        );
    }

    #[test]
    fn test_view_round_trip() {
        let mut editor = loaded_editor();
        let mut view = RecordingView::default();
        editor.render_into(&mut view);
        assert_eq!(view.shown[&FieldKey::Name], "Jane");
        assert_eq!(view.shown[&FieldKey::Skills], "");

        editor.begin_edit(FieldKey::Skills).unwrap();
        view.input = Some((FieldKey::Skills, "Rust, SCADA".into()));
        editor.sync_buffer(&view);
        assert_eq!(
            editor.field(FieldKey::Skills).unwrap().edit_buffer(),
            "Rust, SCADA"
        );
    }

    #[test]
    fn test_load_skips_field_being_edited() {
        let mut editor = loaded_editor();
        editor.begin_edit(FieldKey::Name).unwrap();

        let record: ProfileRecord = [
            (FieldKey::Name, "Remote Name".to_string()),
            (FieldKey::Skills, "Grid".to_string()),
        ]
        .into_iter()
        .collect();
        editor.load(&record);

        assert_eq!(editor.field(FieldKey::Name).unwrap().displayed_value(), "Jane");
        assert_eq!(editor.field(FieldKey::Skills).unwrap().displayed_value(), "Grid");
    }
}
