use hvacdesk_core::{AppError, AppResult};
use hvacdesk_domain::{FilterSpec, FilterValue, FilterValues};

/// Draft and committed filter values behind a filter panel.
///
/// Edits only touch the draft. `apply` commits the draft when it differs
/// from the committed values; `reset` clears both and always emits.
#[derive(Debug, Clone)]
pub struct FilterStateManager {
    spec: FilterSpec,
    draft: FilterValues,
    baseline: FilterValues,
    last_initial: FilterValues,
}

impl FilterStateManager {
    /// Creates a manager whose draft and baseline are the filter spec's cleared values
    /// overlaid with `initial`.
    #[must_use]
    pub fn new(spec: FilterSpec, initial: FilterValues) -> Self {
        let values = spec.cleared_values().overlaid_with(&initial);
        Self {
            spec,
            draft: values.clone(),
            baseline: values,
            last_initial: initial,
        }
    }

    /// Returns the filter descriptors.
    #[must_use]
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Returns the values being edited.
    #[must_use]
    pub fn draft(&self) -> &FilterValues {
        &self.draft
    }

    /// Returns the last applied values.
    #[must_use]
    pub fn committed(&self) -> &FilterValues {
        &self.baseline
    }

    /// Replaces one draft value.
    pub fn set_draft_value(&mut self, key: &str, value: FilterValue) -> AppResult<()> {
        self.ensure_known(key)?;
        self.draft.set(key, value);
        Ok(())
    }

    /// Toggles one option of a multi-select draft value.
    pub fn toggle_option(&mut self, key: &str, option: &str) -> AppResult<()> {
        self.ensure_known(key)?;
        let mut value = self
            .draft
            .get(key)
            .cloned()
            .unwrap_or(FilterValue::Set(Vec::new()));
        value.toggle(option);
        self.draft.set(key, value);
        Ok(())
    }

    /// Returns whether the draft differs from the committed values.
    ///
    /// Keys present on only one side count as changed.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    /// Returns whether the apply control is enabled.
    #[must_use]
    pub fn can_apply(&self) -> bool {
        self.is_dirty()
    }

    /// Commits the draft and returns it, or `None` when nothing changed.
    pub fn apply(&mut self) -> Option<FilterValues> {
        if !self.is_dirty() {
            return None;
        }

        self.baseline = self.draft.clone();
        Some(self.baseline.clone())
    }

    /// Clears every configured field, commits and returns the cleared values.
    pub fn reset(&mut self) -> FilterValues {
        let cleared = self.spec.cleared_values();
        self.draft = cleared.clone();
        self.baseline = cleared.clone();
        cleared
    }

    /// Adopts new initial values from the owner when any of them changed.
    ///
    /// The draft keeps keys the new values omit; the baseline becomes the
    /// cleared values overlaid with the new ones. Returns whether a resync
    /// happened.
    pub fn sync_initial(&mut self, initial: FilterValues) -> bool {
        let changed = initial
            .iter()
            .any(|(key, value)| self.last_initial.get(key) != Some(value));
        if !changed {
            return false;
        }

        self.draft = self.draft.overlaid_with(&initial);
        self.baseline = self.spec.cleared_values().overlaid_with(&initial);
        self.last_initial = initial;
        true
    }

    fn ensure_known(&self, key: &str) -> AppResult<()> {
        if self.spec.field(key).is_none() {
            return Err(AppError::Validation(format!("unknown filter '{key}'")));
        }
        Ok(())
    }
}
