use hvacdesk_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::resource::{require, unknown_field};
use crate::{Column, FilterOption, FormDraft, FormMode, Resource, UpdateMethod};

/// Staff role as returned by `api/auth/roles/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    /// Server id.
    pub id: Option<RecordId>,
    /// Role name, such as `sales`.
    pub name: String,
}

impl Role {
    /// Returns the role as a select option keyed by its id.
    #[must_use]
    pub fn as_option(&self) -> Option<FilterOption> {
        self.id
            .map(|id| FilterOption::new(id.to_string(), self.name.clone()))
    }
}

/// Editable role form state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDraft {
    /// Role name.
    pub name: String,
}

impl FormDraft for RoleDraft {
    const FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<String> {
        (name == "name").then(|| self.name.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        if name != "name" {
            return Err(unknown_field("role", name));
        }
        self.name = value.to_owned();
        Ok(())
    }
}

/// Roles collection; edits replace the whole record.
#[derive(Debug, Clone, Copy)]
pub struct RoleResource;

impl Resource for RoleResource {
    type Record = Role;
    type Draft = RoleDraft;

    const NAME: &'static str = "role";
    const COLLECTION_PATH: &'static str = "api/auth/roles/";
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Put;

    fn record_id(record: &Role) -> Option<RecordId> {
        record.id
    }

    fn draft_from(record: Option<&Role>) -> RoleDraft {
        RoleDraft {
            name: record.map(|role| role.name.clone()).unwrap_or_default(),
        }
    }

    fn validate(draft: &RoleDraft, _mode: FormMode) -> AppResult<()> {
        require(&draft.name, "Role name is required")
    }

    fn payload(draft: &RoleDraft, _mode: FormMode) -> Value {
        json!({ "name": draft.name.trim() })
    }

    fn columns() -> Vec<Column<Role>> {
        vec![Column::serial("Sr.No"), Column::field("name", "Name")]
    }
}
