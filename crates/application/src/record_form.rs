use hvacdesk_core::{AppError, AppResult};
use hvacdesk_domain::{FormDraft, FormMode, Resource};
use serde_json::Value;
use tracing::{info, warn};

use crate::CollectionGateway;
use crate::list_fetcher::decode_record;

/// Lifecycle of the record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Hidden.
    Closed,
    /// Visible and editable.
    Open,
    /// A save request is in flight.
    Submitting,
}

/// Create/edit form of resource `R`.
///
/// Opening the form always rebuilds the draft from the bound record, so a
/// create form never shows values left over from an earlier edit.
#[derive(Debug, Clone)]
pub struct RecordForm<R: Resource> {
    phase: FormPhase,
    bound: Option<R::Record>,
    draft: R::Draft,
    error: Option<String>,
}

impl<R: Resource> Default for RecordForm<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> RecordForm<R> {
    /// Creates a closed form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Closed,
            bound: None,
            draft: R::draft_from(None),
            error: None,
        }
    }

    /// Opens a blank create form.
    pub fn open_create(&mut self) {
        self.open_create_with(R::draft_from(None));
    }

    /// Opens a create form with prefilled values.
    pub fn open_create_with(&mut self, draft: R::Draft) {
        self.bound = None;
        self.draft = draft;
        self.error = None;
        self.phase = FormPhase::Open;
    }

    /// Opens an edit form bound to `record`.
    pub fn open_edit(&mut self, record: R::Record) {
        self.draft = R::draft_from(Some(&record));
        self.bound = Some(record);
        self.error = None;
        self.phase = FormPhase::Open;
    }

    /// Rebinds an open form to a different record, or none, and rebuilds the draft.
    pub fn rebind(&mut self, record: Option<R::Record>) {
        self.draft = R::draft_from(record.as_ref());
        self.bound = record;
        self.error = None;
    }

    /// Hides the form.
    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.error = None;
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Returns whether the form is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    /// Returns whether a save is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Returns the bound record.
    #[must_use]
    pub fn bound(&self) -> Option<&R::Record> {
        self.bound.as_ref()
    }

    /// Returns whether the form creates or edits.
    ///
    /// A bound record without an id is treated as a create.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.bound
            .as_ref()
            .and_then(R::record_id)
            .map_or(FormMode::Create, FormMode::Edit)
    }

    /// Returns the form title, such as `Add lead` or `Edit lead`.
    #[must_use]
    pub fn title(&self) -> String {
        match self.mode() {
            FormMode::Create => format!("Add {}", R::NAME),
            FormMode::Edit(_) => format!("Edit {}", R::NAME),
        }
    }

    /// Returns the draft.
    #[must_use]
    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    /// Returns the draft for direct edits.
    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    /// Returns one draft field as text.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        self.draft.field(name)
    }

    /// Sets one draft field from text input.
    pub fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        self.draft.set_field(name, value)
    }

    /// Returns the inline error of the last failed validation or save.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates and saves the draft.
    ///
    /// Validation failures keep the form open without a request. A successful
    /// save closes the form and returns the saved record when the response
    /// carries one; a failed save keeps the form open with the server message.
    pub async fn submit(
        &mut self,
        gateway: &dyn CollectionGateway,
    ) -> AppResult<Option<R::Record>> {
        if self.phase == FormPhase::Closed {
            return Err(AppError::Validation(format!("{} form is not open", R::NAME)));
        }
        if self.phase == FormPhase::Submitting {
            return Err(AppError::Validation(format!(
                "{} form is already saving",
                R::NAME
            )));
        }

        let mode = self.mode();
        if let Err(error) = R::validate(&self.draft, mode) {
            self.error = Some(error.user_message());
            return Err(error);
        }

        self.phase = FormPhase::Submitting;
        self.error = None;
        let payload = R::payload(&self.draft, mode);
        let response = match mode {
            FormMode::Create => gateway.create(R::COLLECTION_PATH, payload).await,
            FormMode::Edit(id) => {
                gateway
                    .update(&R::record_path(id), R::UPDATE_METHOD, payload)
                    .await
            }
        };

        match response {
            Ok(body) => {
                info!(resource = R::NAME, edit = mode.is_edit(), "record saved");
                self.phase = FormPhase::Closed;
                Ok(saved_record::<R>(body))
            }
            Err(error) => {
                self.phase = FormPhase::Open;
                self.error = Some(error.user_message());
                Err(error)
            }
        }
    }
}

fn saved_record<R: Resource>(body: Value) -> Option<R::Record> {
    if body.is_null() {
        return None;
    }

    decode_record::<R>(body)
        .map_err(|error| warn!(resource = R::NAME, error = %error, "saved record not readable"))
        .ok()
}
