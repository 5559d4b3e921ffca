use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use hvacdesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Control a filter field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Debounced free-text search box.
    Search,
    /// Exactly one option (radio group or drop-down).
    SingleSelect,
    /// Any number of options (checkbox group).
    MultiSelect,
    /// Plain text input.
    Text,
    /// Inclusive `from`/`to` date pair.
    DateRange,
}

impl FilterKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::SingleSelect => "single_select",
            Self::MultiSelect => "multi_select",
            Self::Text => "text",
            Self::DateRange => "date_range",
        }
    }
}

impl FromStr for FilterKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "search" => Ok(Self::Search),
            "single_select" | "select" | "radio" => Ok(Self::SingleSelect),
            "multi_select" | "checkbox" => Ok(Self::MultiSelect),
            "text" => Ok(Self::Text),
            "date_range" | "daterange" => Ok(Self::DateRange),
            _ => Err(AppError::Validation(format!(
                "unknown filter kind '{value}'"
            ))),
        }
    }
}

/// One selectable option of a select filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent to the server.
    pub value: String,
    /// Label shown to the user.
    pub label: String,
}

impl FilterOption {
    /// Creates a filter option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Current value of one filter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Search, single-select and text value.
    Text(String),
    /// Ordered multi-select value.
    Set(Vec<String>),
    /// Date range with optional halves stored as empty strings.
    DateRange {
        /// Inclusive lower bound.
        from: String,
        /// Inclusive upper bound.
        to: String,
    },
}

impl FilterValue {
    /// Returns the empty value for a filter kind.
    #[must_use]
    pub fn empty_for(kind: FilterKind) -> Self {
        match kind {
            FilterKind::MultiSelect => Self::Set(Vec::new()),
            FilterKind::DateRange => Self::DateRange {
                from: String::new(),
                to: String::new(),
            },
            FilterKind::Search | FilterKind::SingleSelect | FilterKind::Text => {
                Self::Text(String::new())
            }
        }
    }

    /// Returns whether the value contributes nothing to a query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Set(values) => values.is_empty(),
            Self::DateRange { from, to } => from.trim().is_empty() && to.trim().is_empty(),
        }
    }

    /// Returns the text of a scalar value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Adds the option when absent and removes it when present.
    ///
    /// Non-set values are replaced by a one-element set.
    pub fn toggle(&mut self, option: &str) {
        match self {
            Self::Set(values) => {
                if let Some(position) = values.iter().position(|value| value == option) {
                    values.remove(position);
                } else {
                    values.push(option.to_owned());
                }
            }
            _ => *self = Self::Set(vec![option.to_owned()]),
        }
    }

    fn matches_kind(&self, kind: FilterKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Text(_),
                FilterKind::Search | FilterKind::SingleSelect | FilterKind::Text
            ) | (Self::Set(_), FilterKind::MultiSelect)
                | (Self::DateRange { .. }, FilterKind::DateRange)
        )
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Filter field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    key: NonEmptyString,
    kind: FilterKind,
    label: String,
    placeholder: Option<String>,
    options: Vec<FilterOption>,
    default: Option<FilterValue>,
}

impl FilterField {
    /// Creates a validated filter field without options or default.
    pub fn new(key: impl Into<String>, kind: FilterKind, label: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            key: NonEmptyString::new(key)?,
            kind,
            label: label.into(),
            placeholder: None,
            options: Vec::new(),
            default: None,
        })
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the selectable options.
    #[must_use]
    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the value restored on reset.
    pub fn with_default(mut self, default: FilterValue) -> AppResult<Self> {
        if !default.matches_kind(self.kind) {
            return Err(AppError::Validation(format!(
                "default for filter '{}' does not match kind '{}'",
                self.key.as_str(),
                self.kind.as_str()
            )));
        }

        self.default = Some(default);
        Ok(self)
    }

    /// Returns filter key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns filter kind.
    #[must_use]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns optional placeholder.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns selectable options.
    #[must_use]
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Returns the configured default.
    #[must_use]
    pub fn default_value(&self) -> Option<&FilterValue> {
        self.default.as_ref()
    }

    /// Returns the value this field takes after a reset.
    #[must_use]
    pub fn cleared_value(&self) -> FilterValue {
        self.default
            .clone()
            .unwrap_or_else(|| FilterValue::empty_for(self.kind))
    }
}

/// Ordered set of filter descriptors for one list screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    fields: Vec<FilterField>,
}

impl FilterSpec {
    /// Creates a validated filter spec with unique keys.
    pub fn new(fields: Vec<FilterField>) -> AppResult<Self> {
        let mut seen_keys = HashSet::new();
        for field in &fields {
            if !seen_keys.insert(field.key()) {
                return Err(AppError::Validation(format!(
                    "duplicate filter key '{}'",
                    field.key()
                )));
            }
        }

        Ok(Self { fields })
    }

    /// Creates the common single search box spec.
    pub fn search_only(placeholder: &str) -> AppResult<Self> {
        Self::new(vec![
            FilterField::new("search", FilterKind::Search, "Search")?.with_placeholder(placeholder),
        ])
    }

    /// Returns the field descriptors in display order.
    #[must_use]
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Returns one field descriptor by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Returns the cleared value of every configured field.
    #[must_use]
    pub fn cleared_values(&self) -> FilterValues {
        let mut values = FilterValues::new();
        for field in &self.fields {
            values.set(field.key(), field.cleared_value());
        }
        values
    }
}

/// Filter values keyed by filter key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterValues(BTreeMap<String, FilterValue>);

impl FilterValues {
    /// Creates an empty value map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    /// Returns the scalar text for a key, or an empty string.
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FilterValue::as_text).unwrap_or("")
    }

    /// Sets the value for a key.
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        self.0.insert(key.into(), value);
    }

    /// Returns a copy with every entry of `other` written over this map.
    #[must_use]
    pub fn overlaid_with(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Encodes the non-empty values as URL query pairs in key order.
    ///
    /// Sets join with `,`; date ranges become `{key}_from` and `{key}_to`.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                FilterValue::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        pairs.push((key.clone(), text.to_owned()));
                    }
                }
                FilterValue::Set(values) => {
                    if !values.is_empty() {
                        pairs.push((key.clone(), values.join(",")));
                    }
                }
                FilterValue::DateRange { from, to } => {
                    if !from.trim().is_empty() {
                        pairs.push((format!("{key}_from"), from.trim().to_owned()));
                    }
                    if !to.trim().is_empty() {
                        pairs.push((format!("{key}_to"), to.trim().to_owned()));
                    }
                }
            }
        }
        pairs
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for FilterValues {
    fn from_iter<T: IntoIterator<Item = (K, FilterValue)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}
