use hvacdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::{lenient_text, parse_flag, require, unknown_field};
use crate::{
    Column, FilterField, FilterKind, FilterSpec, FormDraft, FormMode, Resource, Role,
};

/// Minimum password length accepted by the staff form.
pub const STAFF_PASSWORD_MIN_LENGTH: usize = 6;

/// Staff account as returned by `api/auth/staff/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffMember {
    /// Server id.
    pub id: Option<RecordId>,
    /// Login email.
    pub email: Option<String>,
    /// Login mobile number.
    #[serde(deserialize_with = "lenient_text")]
    pub mobile_no: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Assigned role.
    pub role: Option<Role>,
}

impl StaffMember {
    /// Returns `first last` with blanks skipped.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Editable staff form state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaffDraft {
    /// Login email.
    pub email: String,
    /// Login mobile number.
    pub mobile_no: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Selected role id.
    pub role: String,
    /// New password.
    pub password: String,
    /// Whether an edit also changes the password.
    pub change_password: bool,
}

impl FormDraft for StaffDraft {
    const FIELDS: &'static [&'static str] = &[
        "email",
        "mobile_no",
        "first_name",
        "last_name",
        "role",
        "password",
        "change_password",
    ];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "email" => Some(self.email.clone()),
            "mobile_no" => Some(self.mobile_no.clone()),
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            "role" => Some(self.role.clone()),
            "password" => Some(self.password.clone()),
            "change_password" => Some(self.change_password.to_string()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        match name {
            "email" => self.email = value.to_owned(),
            "mobile_no" => self.mobile_no = value.to_owned(),
            "first_name" => self.first_name = value.to_owned(),
            "last_name" => self.last_name = value.to_owned(),
            "role" => self.role = value.to_owned(),
            "password" => self.password = value.to_owned(),
            "change_password" => self.change_password = parse_flag(name, value)?,
            _ => return Err(unknown_field("staff", name)),
        }
        Ok(())
    }
}

fn sends_password(draft: &StaffDraft, mode: FormMode) -> bool {
    !mode.is_edit() || draft.change_password
}

/// Staff accounts collection.
#[derive(Debug, Clone, Copy)]
pub struct StaffResource;

impl StaffResource {
    /// Returns the staff filters with role options built from `roles`.
    pub fn filter_spec_with_roles(roles: &[Role]) -> AppResult<FilterSpec> {
        FilterSpec::new(vec![
            FilterField::new("search", FilterKind::Search, "Search")?
                .with_placeholder("Search name, email, mobile..."),
            FilterField::new("role", FilterKind::SingleSelect, "Role")?
                .with_options(roles.iter().filter_map(Role::as_option).collect()),
        ])
    }
}

impl Resource for StaffResource {
    type Record = StaffMember;
    type Draft = StaffDraft;

    const NAME: &'static str = "staff";
    const COLLECTION_PATH: &'static str = "api/auth/staff/";

    fn record_id(record: &StaffMember) -> Option<RecordId> {
        record.id
    }

    fn draft_from(record: Option<&StaffMember>) -> StaffDraft {
        let Some(staff) = record else {
            return StaffDraft::default();
        };

        StaffDraft {
            email: staff.email.clone().unwrap_or_default(),
            mobile_no: staff.mobile_no.clone().unwrap_or_default(),
            first_name: staff.first_name.clone().unwrap_or_default(),
            last_name: staff.last_name.clone().unwrap_or_default(),
            role: staff
                .role
                .as_ref()
                .and_then(|role| role.id)
                .map(|id| id.to_string())
                .unwrap_or_default(),
            password: String::new(),
            change_password: false,
        }
    }

    fn validate(draft: &StaffDraft, mode: FormMode) -> AppResult<()> {
        require(&draft.email, "Email is required")?;
        require(&draft.mobile_no, "Mobile is required")?;
        require(&draft.first_name, "First name is required")?;
        require(&draft.role, "Please select a role")?;

        if sends_password(draft, mode)
            && draft.password.chars().count() < STAFF_PASSWORD_MIN_LENGTH
        {
            return Err(AppError::Validation(format!(
                "Password must be at least {STAFF_PASSWORD_MIN_LENGTH} characters"
            )));
        }

        Ok(())
    }

    fn payload(draft: &StaffDraft, mode: FormMode) -> Value {
        let role = draft
            .role
            .trim()
            .parse::<RecordId>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(draft.role.trim().to_owned()));

        let mut payload = Map::new();
        payload.insert("email".to_owned(), Value::from(draft.email.trim()));
        payload.insert("mobile_no".to_owned(), Value::from(draft.mobile_no.trim()));
        payload.insert("first_name".to_owned(), Value::from(draft.first_name.trim()));
        payload.insert("last_name".to_owned(), Value::from(draft.last_name.trim()));
        payload.insert("role".to_owned(), role);
        if sends_password(draft, mode) {
            payload.insert("password".to_owned(), Value::from(draft.password.as_str()));
        }

        Value::Object(payload)
    }

    fn columns() -> Vec<Column<StaffMember>> {
        vec![
            Column::serial("Sr.No"),
            Column::field("email", "Email"),
            Column::field("mobile_no", "Mobile"),
            Column::field("first_name", "First Name"),
            Column::field("last_name", "Last Name"),
            Column::field("role.name", "Role"),
        ]
    }

    fn filter_spec() -> AppResult<FilterSpec> {
        Self::filter_spec_with_roles(&[])
    }
}
