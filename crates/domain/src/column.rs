use std::str::FromStr;

use hvacdesk_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a column produces its cell text.
#[derive(Debug)]
pub enum ColumnKind<R> {
    /// Displays the record's JSON value at a dotted key path.
    Field(String),
    /// Displays the output of a render function given the row and its index.
    Rendered(fn(&R, usize) -> String),
    /// Displays the running row number across pages.
    Serial,
}

impl<R> Clone for ColumnKind<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(path) => Self::Field(path.clone()),
            Self::Rendered(render) => Self::Rendered(*render),
            Self::Serial => Self::Serial,
        }
    }
}

/// Position of a row inside the displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContext {
    /// Zero-based index of the row on the page.
    pub index: usize,
    /// One-based page number.
    pub page: u32,
    /// Page size used for serial numbers.
    pub page_size: usize,
}

impl CellContext {
    /// Returns `(page - 1) * page_size + index + 1`.
    #[must_use]
    pub fn serial_number(&self) -> usize {
        let page = usize::try_from(self.page.max(1)).unwrap_or(usize::MAX);
        (page - 1)
            .saturating_mul(self.page_size)
            .saturating_add(self.index)
            .saturating_add(1)
    }
}

/// Column of a list table.
#[derive(Debug)]
pub struct Column<R> {
    key: String,
    label: String,
    kind: ColumnKind<R>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<R> Column<R> {
    /// Creates a column showing the value at `path`, which doubles as the key.
    #[must_use]
    pub fn field(path: impl Into<String>, label: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            key: path.clone(),
            label: label.into(),
            kind: ColumnKind::Field(path),
        }
    }

    /// Creates a column rendered by a function.
    #[must_use]
    pub fn rendered(
        key: impl Into<String>,
        label: impl Into<String>,
        render: fn(&R, usize) -> String,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Rendered(render),
        }
    }

    /// Creates the running row number column.
    #[must_use]
    pub fn serial(label: impl Into<String>) -> Self {
        Self {
            key: "sr".to_owned(),
            label: label.into(),
            kind: ColumnKind::Serial,
        }
    }

    /// Returns column key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns header label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns column kind.
    #[must_use]
    pub fn kind(&self) -> &ColumnKind<R> {
        &self.kind
    }

    /// Returns the cell text for a row.
    ///
    /// `row_json` is the serialized row; missing and null values render empty.
    #[must_use]
    pub fn cell(&self, row: &R, row_json: &Value, context: CellContext) -> String {
        match &self.kind {
            ColumnKind::Field(path) => lookup_path(row_json, path)
                .map(display_value)
                .unwrap_or_default(),
            ColumnKind::Rendered(render) => render(row, context.index),
            ColumnKind::Serial => context.serial_number().to_string(),
        }
    }
}

fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Per-row action offered in the trailing actions column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    /// Open the detail view.
    View,
    /// Record a follow-up against the row.
    FollowUp,
    /// Open the edit form.
    Edit,
    /// Delete after confirmation.
    Delete,
}

impl RowAction {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::FollowUp => "follow_up",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Returns the button label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::FollowUp => "Follow-up",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

impl FromStr for RowAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "follow_up" => Ok(Self::FollowUp),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!("unknown row action '{value}'"))),
        }
    }
}
