//! Sales leads, their enumerations and form rules.

use std::str::FromStr;

use hvacdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::resource::{
    check_optional_date, lenient_text, parse_optional_id, require, require_date, text_or_null,
    unknown_field,
};
use crate::{
    Column, CustomerDraft, FilterOption, FilterSpec, FormDraft, FormMode, LeadFollowUp, Resource,
    RowAction,
};

/// Channel a lead arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// Google Ads campaign.
    GoogleAds,
    /// IndiaMART marketplace.
    Indiamart,
    /// BNI referral.
    Bni,
    /// Anything else.
    Other,
}

impl LeadSource {
    /// Every lead source in display order.
    pub const ALL: [Self; 4] = [Self::GoogleAds, Self::Indiamart, Self::Bni, Self::Other];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleAds => "google_ads",
            Self::Indiamart => "indiamart",
            Self::Bni => "bni",
            Self::Other => "other",
        }
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoogleAds => "Google Ads",
            Self::Indiamart => "IndiaMART",
            Self::Bni => "BNI",
            Self::Other => "Other",
        }
    }

    /// Returns every source as a select option.
    #[must_use]
    pub fn options() -> Vec<FilterOption> {
        Self::ALL
            .iter()
            .map(|source| FilterOption::new(source.as_str(), source.label()))
            .collect()
    }
}

impl FromStr for LeadSource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "google_ads" => Ok(Self::GoogleAds),
            "indiamart" => Ok(Self::Indiamart),
            "bni" => Ok(Self::Bni),
            "other" => Ok(Self::Other),
            _ => Err(AppError::Validation(format!(
                "unknown lead source '{value}'"
            ))),
        }
    }
}

/// Progress of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Not yet worked.
    Open,
    /// Being worked.
    InProcess,
    /// Won or lost.
    Closed,
}

impl LeadStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProcess => "in_process",
            Self::Closed => "closed",
        }
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProcess => "In Process",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "in_process" => Ok(Self::InProcess),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown lead status '{value}'"
            ))),
        }
    }
}

/// Staff summary embedded in a lead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffSummary {
    /// Display name.
    pub full_name: Option<String>,
    /// Mobile number.
    #[serde(deserialize_with = "lenient_text")]
    pub mobile_no: Option<String>,
    /// Email.
    pub email: Option<String>,
}

/// Sales lead as returned by `api/lead/lead/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lead {
    /// Server id.
    pub id: Option<RecordId>,
    /// Lead date.
    pub date: Option<String>,
    /// Next follow-up date.
    pub followup_date: Option<String>,
    /// Linked customer id.
    pub customer: Option<RecordId>,
    /// Linked customer name.
    pub customer_name: Option<String>,
    /// Linked customer phone.
    #[serde(deserialize_with = "lenient_text")]
    pub customer_contact: Option<String>,
    /// Linked customer email.
    pub customer_email: Option<String>,
    /// Project name.
    pub project_name: Option<String>,
    /// Project address. The server spells this field `project_adderess`.
    #[serde(rename = "project_adderess")]
    pub project_address: Option<String>,
    /// Requirement notes.
    pub requirements_details: Option<String>,
    /// HVAC application, such as VRF or chiller.
    pub hvac_application: Option<String>,
    /// Required capacity in tons.
    #[serde(deserialize_with = "lenient_text")]
    pub capacity_required: Option<String>,
    /// Lead source value.
    pub lead_source: Option<String>,
    /// Lead status value.
    pub status: Option<String>,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// Assigned staff id.
    pub assign_to: Option<RecordId>,
    /// Assigned staff summary.
    pub assign_to_details: Option<StaffSummary>,
    /// Creator summary. The server spells this field `creatd_by_details`.
    #[serde(rename = "creatd_by_details")]
    pub created_by_details: Option<StaffSummary>,
    /// Follow-up history, present on the detail endpoint.
    pub followups: Vec<LeadFollowUp>,
}

/// Editable lead form state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadDraft {
    /// Lead date.
    pub date: String,
    /// Customer name, used to prefill a new customer.
    pub client_name: String,
    /// Customer phone, used for the customer lookup.
    pub contact_number: String,
    /// Customer email, used to prefill a new customer.
    pub email: String,
    /// Project name.
    pub project_name: String,
    /// Project address.
    pub project_address: String,
    /// Requirement notes.
    pub requirement_details: String,
    /// HVAC application.
    pub hvac_application: String,
    /// Required capacity.
    pub capacity_required: String,
    /// Lead source value.
    pub lead_source: String,
    /// Lead status value.
    pub status: String,
    /// Assigned staff id.
    pub assign_to: String,
    /// Next follow-up date.
    pub followup_date: String,
    /// Free-form remarks.
    pub remarks: String,
    /// Customer id matched by phone lookup or kept from the bound lead.
    pub customer: Option<RecordId>,
}

impl LeadDraft {
    /// Returns a customer draft prefilled from the lead's contact fields.
    #[must_use]
    pub fn customer_prefill(&self) -> CustomerDraft {
        CustomerDraft::prefilled(&self.client_name, &self.contact_number, &self.email)
    }
}

impl FormDraft for LeadDraft {
    const FIELDS: &'static [&'static str] = &[
        "date",
        "client_name",
        "contact_number",
        "email",
        "project_name",
        "project_address",
        "requirement_details",
        "hvac_application",
        "capacity_required",
        "lead_source",
        "status",
        "assign_to",
        "followup_date",
        "remarks",
        "customer",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "date" => &self.date,
            "client_name" => &self.client_name,
            "contact_number" => &self.contact_number,
            "email" => &self.email,
            "project_name" => &self.project_name,
            "project_address" => &self.project_address,
            "requirement_details" => &self.requirement_details,
            "hvac_application" => &self.hvac_application,
            "capacity_required" => &self.capacity_required,
            "lead_source" => &self.lead_source,
            "status" => &self.status,
            "assign_to" => &self.assign_to,
            "followup_date" => &self.followup_date,
            "remarks" => &self.remarks,
            "customer" => return Some(self.customer.map(|id| id.to_string()).unwrap_or_default()),
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        let slot = match name {
            "date" => &mut self.date,
            "client_name" => &mut self.client_name,
            "contact_number" => &mut self.contact_number,
            "email" => &mut self.email,
            "project_name" => &mut self.project_name,
            "project_address" => &mut self.project_address,
            "requirement_details" => &mut self.requirement_details,
            "hvac_application" => &mut self.hvac_application,
            "capacity_required" => &mut self.capacity_required,
            "lead_source" => &mut self.lead_source,
            "status" => &mut self.status,
            "assign_to" => &mut self.assign_to,
            "followup_date" => &mut self.followup_date,
            "remarks" => &mut self.remarks,
            "customer" => {
                self.customer = parse_optional_id(name, value)?;
                return Ok(());
            }
            _ => return Err(unknown_field("lead", name)),
        };
        *slot = value.to_owned();
        Ok(())
    }
}

/// Leads collection.
#[derive(Debug, Clone, Copy)]
pub struct LeadResource;

impl Resource for LeadResource {
    type Record = Lead;
    type Draft = LeadDraft;

    const NAME: &'static str = "lead";
    const COLLECTION_PATH: &'static str = "api/lead/lead/";

    fn record_id(record: &Lead) -> Option<RecordId> {
        record.id
    }

    fn draft_from(record: Option<&Lead>) -> LeadDraft {
        let Some(lead) = record else {
            return LeadDraft::default();
        };
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        LeadDraft {
            date: text(&lead.date),
            client_name: text(&lead.customer_name),
            contact_number: text(&lead.customer_contact),
            email: text(&lead.customer_email),
            project_name: text(&lead.project_name),
            project_address: text(&lead.project_address),
            requirement_details: text(&lead.requirements_details),
            hvac_application: text(&lead.hvac_application),
            capacity_required: text(&lead.capacity_required),
            lead_source: text(&lead.lead_source),
            status: text(&lead.status),
            assign_to: lead.assign_to.map(|id| id.to_string()).unwrap_or_default(),
            followup_date: text(&lead.followup_date),
            remarks: text(&lead.remarks),
            customer: lead.customer,
        }
    }

    fn validate(draft: &LeadDraft, _mode: FormMode) -> AppResult<()> {
        require(&draft.contact_number, "Contact Number is required")?;
        require_date(&draft.date, "Date is required")?;
        require(&draft.lead_source, "Lead source is required")?;
        draft.lead_source.trim().parse::<LeadSource>()?;
        require(&draft.status, "Status is required")?;
        draft.status.trim().parse::<LeadStatus>()?;
        check_optional_date(&draft.followup_date)?;
        parse_optional_id("assign_to", &draft.assign_to)?;
        Ok(())
    }

    fn payload(draft: &LeadDraft, _mode: FormMode) -> Value {
        let assign_to = parse_optional_id("assign_to", &draft.assign_to)
            .ok()
            .flatten();

        json!({
            "project_name": draft.project_name.trim(),
            "project_adderess": draft.project_address.trim(),
            "requirements_details": draft.requirement_details.trim(),
            "hvac_application": draft.hvac_application.trim(),
            "capacity_required": draft.capacity_required.trim(),
            "lead_source": text_or_null(&draft.lead_source),
            "status": text_or_null(&draft.status),
            "date": text_or_null(&draft.date),
            "followup_date": text_or_null(&draft.followup_date),
            "remarks": draft.remarks.trim(),
            "customer": draft.customer,
            "assign_to": assign_to,
        })
    }

    fn columns() -> Vec<Column<Lead>> {
        vec![
            Column::serial("Sr.No"),
            Column::field("date", "Date"),
            Column::field("followup_date", "Followup Date"),
            Column::field("customer_name", "Name"),
            Column::field("customer_contact", "Contact"),
            Column::field("customer_email", "Email"),
            Column::field("hvac_application", "HVAC Application"),
            Column::rendered("lead_source", "Source", source_label),
            Column::field("status", "Status"),
            Column::field("assign_to_details.full_name", "Assign to"),
        ]
    }

    fn filter_spec() -> AppResult<FilterSpec> {
        FilterSpec::search_only("Search name, email, contact...")
    }

    fn row_actions() -> Vec<RowAction> {
        vec![
            RowAction::View,
            RowAction::FollowUp,
            RowAction::Edit,
            RowAction::Delete,
        ]
    }
}

fn source_label(lead: &Lead, _index: usize) -> String {
    let Some(source) = lead.lead_source.as_deref() else {
        return String::new();
    };
    source
        .parse::<LeadSource>()
        .map(|parsed| parsed.label().to_owned())
        .unwrap_or_else(|_| source.to_owned())
}
