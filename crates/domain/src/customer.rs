//! Customer companies and their form rules.

use hvacdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::resource::{lenient_text, parse_flag, require, unknown_field};
use crate::{Column, FilterSpec, FormDraft, FormMode, Resource};

/// Customer company as returned by `api/lead/customer/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    /// Server id.
    pub id: Option<RecordId>,
    /// Company name.
    pub name: Option<String>,
    /// Primary mobile number.
    #[serde(deserialize_with = "lenient_text")]
    pub contact_number: Option<String>,
    /// Landline number.
    #[serde(deserialize_with = "lenient_text")]
    pub land_line_no: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Point-of-contact name.
    pub poc_name: Option<String>,
    /// Point-of-contact phone.
    #[serde(deserialize_with = "lenient_text")]
    pub poc_contact_number: Option<String>,
    /// Billing address line.
    pub address: Option<String>,
    /// Billing city.
    pub city: Option<String>,
    /// Billing state.
    pub state: Option<String>,
    /// Billing pin code.
    #[serde(deserialize_with = "lenient_text")]
    pub pin_code: Option<String>,
    /// Whether the site address equals the billing address.
    pub both_address_is_same: bool,
    /// Site address line.
    pub site_address: Option<String>,
    /// Site city.
    pub site_city: Option<String>,
    /// Site state.
    pub site_state: Option<String>,
    /// Site pin code.
    #[serde(deserialize_with = "lenient_text")]
    pub site_pin_code: Option<String>,
}

/// Editable customer form state; fields mirror [`Customer`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct CustomerDraft {
    pub name: String,
    pub contact_number: String,
    pub land_line_no: String,
    pub email: String,
    pub poc_name: String,
    pub poc_contact_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub both_address_is_same: bool,
    pub site_address: String,
    pub site_city: String,
    pub site_state: String,
    pub site_pin_code: String,
}

impl CustomerDraft {
    /// Creates a blank draft prefilled from lead contact details.
    #[must_use]
    pub fn prefilled(name: &str, contact_number: &str, email: &str) -> Self {
        Self {
            name: name.to_owned(),
            contact_number: contact_number.to_owned(),
            email: email.to_owned(),
            ..Self::default()
        }
    }
}

impl FormDraft for CustomerDraft {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "contact_number",
        "land_line_no",
        "email",
        "poc_name",
        "poc_contact_number",
        "address",
        "city",
        "state",
        "pin_code",
        "both_address_is_same",
        "site_address",
        "site_city",
        "site_state",
        "site_pin_code",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => &self.name,
            "contact_number" => &self.contact_number,
            "land_line_no" => &self.land_line_no,
            "email" => &self.email,
            "poc_name" => &self.poc_name,
            "poc_contact_number" => &self.poc_contact_number,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "pin_code" => &self.pin_code,
            "both_address_is_same" => return Some(self.both_address_is_same.to_string()),
            "site_address" => &self.site_address,
            "site_city" => &self.site_city,
            "site_state" => &self.site_state,
            "site_pin_code" => &self.site_pin_code,
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        let slot = match name {
            "name" => &mut self.name,
            "contact_number" => &mut self.contact_number,
            "land_line_no" => &mut self.land_line_no,
            "email" => &mut self.email,
            "poc_name" => &mut self.poc_name,
            "poc_contact_number" => &mut self.poc_contact_number,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "pin_code" => &mut self.pin_code,
            "both_address_is_same" => {
                self.both_address_is_same = parse_flag(name, value)?;
                return Ok(());
            }
            "site_address" => &mut self.site_address,
            "site_city" => &mut self.site_city,
            "site_state" => &mut self.site_state,
            "site_pin_code" => &mut self.site_pin_code,
            _ => return Err(unknown_field("customer", name)),
        };
        *slot = value.to_owned();
        Ok(())
    }
}

/// Customers collection.
#[derive(Debug, Clone, Copy)]
pub struct CustomerResource;

impl Resource for CustomerResource {
    type Record = Customer;
    type Draft = CustomerDraft;

    const NAME: &'static str = "customer";
    const COLLECTION_PATH: &'static str = "api/lead/customer/";

    fn record_id(record: &Customer) -> Option<RecordId> {
        record.id
    }

    fn draft_from(record: Option<&Customer>) -> CustomerDraft {
        let Some(customer) = record else {
            return CustomerDraft::default();
        };
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        CustomerDraft {
            name: text(&customer.name),
            contact_number: text(&customer.contact_number),
            land_line_no: text(&customer.land_line_no),
            email: text(&customer.email),
            poc_name: text(&customer.poc_name),
            poc_contact_number: text(&customer.poc_contact_number),
            address: text(&customer.address),
            city: text(&customer.city),
            state: text(&customer.state),
            pin_code: text(&customer.pin_code),
            both_address_is_same: customer.both_address_is_same,
            site_address: text(&customer.site_address),
            site_city: text(&customer.site_city),
            site_state: text(&customer.site_state),
            site_pin_code: text(&customer.site_pin_code),
        }
    }

    fn validate(draft: &CustomerDraft, _mode: FormMode) -> AppResult<()> {
        require(&draft.name, "Customer name is required")?;
        require(&draft.contact_number, "Contact number is required")?;
        if !draft.email.trim().is_empty() && !looks_like_email(draft.email.trim()) {
            return Err(AppError::Validation("Email is invalid".to_owned()));
        }
        require(&draft.address, "Address is required")?;
        require(&draft.city, "City is required")?;
        require(&draft.state, "State is required")?;
        require(&draft.pin_code, "Pin code is required")?;

        if !draft.both_address_is_same {
            require(&draft.site_address, "Site address is required")?;
            require(&draft.site_city, "Site city is required")?;
            require(&draft.site_state, "Site state is required")?;
            require(&draft.site_pin_code, "Site pin code is required")?;
        }

        Ok(())
    }

    fn payload(draft: &CustomerDraft, _mode: FormMode) -> Value {
        let (site_address, site_city, site_state, site_pin_code) = if draft.both_address_is_same {
            (&draft.address, &draft.city, &draft.state, &draft.pin_code)
        } else {
            (
                &draft.site_address,
                &draft.site_city,
                &draft.site_state,
                &draft.site_pin_code,
            )
        };

        json!({
            "name": draft.name.trim(),
            "contact_number": draft.contact_number.trim(),
            "land_line_no": draft.land_line_no.trim(),
            "email": draft.email.trim(),
            "poc_name": draft.poc_name.trim(),
            "poc_contact_number": draft.poc_contact_number.trim(),
            "address": draft.address.trim(),
            "city": draft.city.trim(),
            "state": draft.state.trim(),
            "pin_code": draft.pin_code.trim(),
            "both_address_is_same": draft.both_address_is_same,
            "site_address": site_address.trim(),
            "site_city": site_city.trim(),
            "site_state": site_state.trim(),
            "site_pin_code": site_pin_code.trim(),
        })
    }

    fn columns() -> Vec<Column<Customer>> {
        vec![
            Column::serial("Sr.No"),
            Column::field("name", "Company Name"),
            Column::field("contact_number", "Contact"),
            Column::field("email", "Email"),
            Column::field("land_line_no", "Landline No"),
            Column::field("poc_name", "POC Name"),
            Column::field("poc_contact_number", "POC Contact"),
            Column::field("city", "City"),
            Column::field("state", "State"),
        ]
    }

    fn filter_spec() -> AppResult<FilterSpec> {
        FilterSpec::search_only("Search name, email, contact...")
    }
}

/// Returns whether `value` has the `local@domain.tld` shape.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, character)| character == '.' && index > 0 && index + 1 < domain.len())
}
