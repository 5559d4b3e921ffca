use std::fmt::Debug;

use chrono::NaiveDate;
use hvacdesk_core::{AppError, AppResult, RecordId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Column, FilterSpec, RowAction};

/// HTTP verb used to save changes to an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Partial update.
    Patch,
    /// Full replacement.
    Put,
}

impl UpdateMethod {
    /// Returns the HTTP method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "PATCH",
            Self::Put => "PUT",
        }
    }
}

/// Whether a form creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// No record bound.
    Create,
    /// Editing the record with this id.
    Edit(RecordId),
}

impl FormMode {
    /// Returns whether the form edits an existing record.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

/// Editable field values of a record form.
pub trait FormDraft: Clone + Debug + Send + Sync + 'static {
    /// Field names accepted by [`FormDraft::set_field`].
    const FIELDS: &'static [&'static str];

    /// Returns the current value of a field as text.
    fn field(&self, name: &str) -> Option<String>;

    /// Sets one field from text input.
    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()>;
}

/// A CRM collection and the rules its list screen and form follow.
pub trait Resource: Send + Sync + 'static {
    /// Record returned by the server.
    type Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Editable form state.
    type Draft: FormDraft;

    /// Singular display name.
    const NAME: &'static str;
    /// Collection path relative to the API base URL, with a trailing slash.
    const COLLECTION_PATH: &'static str;
    /// Verb used when saving an edited record.
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;

    /// Returns the record's server id.
    fn record_id(record: &Self::Record) -> Option<RecordId>;

    /// Builds the form draft for a bound record or a blank create form.
    fn draft_from(record: Option<&Self::Record>) -> Self::Draft;

    /// Checks the draft; the first violation is the error message.
    fn validate(draft: &Self::Draft, mode: FormMode) -> AppResult<()>;

    /// Builds the JSON body sent to the server.
    fn payload(draft: &Self::Draft, mode: FormMode) -> Value;

    /// Returns the list table columns.
    fn columns() -> Vec<Column<Self::Record>>;

    /// Returns the list filter descriptors.
    fn filter_spec() -> AppResult<FilterSpec> {
        FilterSpec::search_only("Search...")
    }

    /// Returns the per-row actions.
    fn row_actions() -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    /// Returns the detail path of one record.
    fn record_path(id: RecordId) -> String {
        format!("{}{id}/", Self::COLLECTION_PATH)
    }
}

pub(crate) fn require(value: &str, message: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_owned()));
    }
    Ok(())
}

pub(crate) fn require_date(value: &str, message: &str) -> AppResult<()> {
    require(value, message)?;
    check_optional_date(value)
}

pub(crate) fn check_optional_date(value: &str) -> AppResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("'{value}' is not a YYYY-MM-DD date")))
}

pub(crate) fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" | "" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "field '{name}' expects true or false, got '{value}'"
        ))),
    }
}

pub(crate) fn parse_optional_id(name: &str, value: &str) -> AppResult<Option<RecordId>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value.parse::<RecordId>().map(Some).map_err(|_| {
        AppError::Validation(format!("field '{name}' expects a numeric id, got '{value}'"))
    })
}

pub(crate) fn unknown_field(resource: &str, name: &str) -> AppError {
    AppError::Validation(format!("unknown {resource} field '{name}'"))
}

/// Accepts a string, number or null where the server is inconsistent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

pub(crate) fn text_or_null(value: &str) -> Value {
    let value = value.trim();
    if value.is_empty() {
        Value::Null
    } else {
        Value::String(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso_formatted() {
        assert!(check_optional_date("2024-02-29").is_ok());
        assert!(check_optional_date("").is_ok());
        assert!(check_optional_date("29/02/2024").is_err());
        assert!(require_date(" ", "Date is required").is_err());
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("same", "Yes").ok(), Some(true));
        assert_eq!(parse_flag("same", "0").ok(), Some(false));
        assert!(parse_flag("same", "maybe").is_err());
    }

    #[test]
    fn ids_are_optional_but_numeric() {
        assert_eq!(parse_optional_id("assign_to", " ").ok(), Some(None));
        assert_eq!(parse_optional_id("assign_to", "7").ok(), Some(Some(7)));
        assert!(parse_optional_id("assign_to", "seven").is_err());
    }
}
