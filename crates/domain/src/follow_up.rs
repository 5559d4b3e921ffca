use std::collections::BTreeMap;

use hvacdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::{
    check_optional_date, parse_optional_id, require, require_date, text_or_null, unknown_field,
};
use crate::{Column, FormDraft, FormMode, LeadStatus, Resource};

/// Qualification question asked during follow-ups, from `api/lead/lead-faqs/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFaq {
    /// Server id.
    pub id: Option<RecordId>,
    /// Question text.
    pub question: String,
}

/// Answer to one FAQ recorded on a follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqAnswer {
    /// Server id of the answer.
    pub id: Option<RecordId>,
    /// FAQ id.
    pub faq: Option<RecordId>,
    /// FAQ question text, when expanded by the server.
    pub faq_question: Option<String>,
    /// Answer text.
    pub answer: Option<String>,
}

/// Lead follow-up as returned by `api/lead/lead-followups/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFollowUp {
    /// Server id.
    pub id: Option<RecordId>,
    /// Parent lead id.
    pub lead: Option<RecordId>,
    /// Date the follow-up happened.
    pub followup_date: Option<String>,
    /// Date of the next planned follow-up.
    pub next_followup_date: Option<String>,
    /// Lead status after the follow-up.
    pub status: Option<String>,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// FAQ answers captured during the follow-up.
    pub faq_answers: Vec<FaqAnswer>,
}

/// Editable follow-up form state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowUpDraft {
    /// Parent lead id; required when creating.
    pub lead: Option<RecordId>,
    /// Date the follow-up happened.
    pub followup_date: String,
    /// Date of the next planned follow-up.
    pub next_followup_date: String,
    /// Lead status after the follow-up.
    pub status: String,
    /// Free-form remarks.
    pub remarks: String,
    /// Answers keyed by FAQ id.
    pub faq_answers: BTreeMap<RecordId, String>,
}

impl FollowUpDraft {
    /// Creates a blank follow-up for a lead with the default `open` status.
    #[must_use]
    pub fn for_lead(lead: RecordId) -> Self {
        Self {
            lead: Some(lead),
            status: LeadStatus::Open.as_str().to_owned(),
            ..Self::default()
        }
    }

    /// Adds an empty answer slot for each FAQ not yet answered.
    pub fn include_faqs(&mut self, faqs: &[LeadFaq]) {
        for id in faqs.iter().filter_map(|faq| faq.id) {
            self.faq_answers.entry(id).or_default();
        }
    }
}

impl FormDraft for FollowUpDraft {
    const FIELDS: &'static [&'static str] = &[
        "lead",
        "followup_date",
        "next_followup_date",
        "status",
        "remarks",
        "faq:<id>",
    ];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "lead" => Some(self.lead.map(|id| id.to_string()).unwrap_or_default()),
            "followup_date" => Some(self.followup_date.clone()),
            "next_followup_date" => Some(self.next_followup_date.clone()),
            "status" => Some(self.status.clone()),
            "remarks" => Some(self.remarks.clone()),
            _ => faq_id(name).and_then(|id| self.faq_answers.get(&id).cloned()),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> AppResult<()> {
        match name {
            "lead" => self.lead = parse_optional_id(name, value)?,
            "followup_date" => self.followup_date = value.to_owned(),
            "next_followup_date" => self.next_followup_date = value.to_owned(),
            "status" => self.status = value.to_owned(),
            "remarks" => self.remarks = value.to_owned(),
            _ => {
                let id = faq_id(name).ok_or_else(|| unknown_field("follow-up", name))?;
                self.faq_answers.insert(id, value.to_owned());
            }
        }
        Ok(())
    }
}

fn faq_id(name: &str) -> Option<RecordId> {
    name.strip_prefix("faq:")?.trim().parse().ok()
}

/// Lead follow-ups collection.
#[derive(Debug, Clone, Copy)]
pub struct FollowUpResource;

impl Resource for FollowUpResource {
    type Record = LeadFollowUp;
    type Draft = FollowUpDraft;

    const NAME: &'static str = "follow-up";
    const COLLECTION_PATH: &'static str = "api/lead/lead-followups/";

    fn record_id(record: &LeadFollowUp) -> Option<RecordId> {
        record.id
    }

    fn draft_from(record: Option<&LeadFollowUp>) -> FollowUpDraft {
        let Some(follow_up) = record else {
            return FollowUpDraft {
                status: LeadStatus::Open.as_str().to_owned(),
                ..FollowUpDraft::default()
            };
        };

        FollowUpDraft {
            lead: follow_up.lead,
            followup_date: follow_up.followup_date.clone().unwrap_or_default(),
            next_followup_date: follow_up.next_followup_date.clone().unwrap_or_default(),
            status: follow_up
                .status
                .clone()
                .unwrap_or_else(|| LeadStatus::Open.as_str().to_owned()),
            remarks: follow_up.remarks.clone().unwrap_or_default(),
            faq_answers: follow_up
                .faq_answers
                .iter()
                .filter_map(|answer| {
                    answer
                        .faq
                        .map(|faq| (faq, answer.answer.clone().unwrap_or_default()))
                })
                .collect(),
        }
    }

    fn validate(draft: &FollowUpDraft, mode: FormMode) -> AppResult<()> {
        if !mode.is_edit() && draft.lead.is_none() {
            return Err(AppError::Validation(
                "Lead is required to create follow-up.".to_owned(),
            ));
        }
        require_date(&draft.followup_date, "Follow-up date is required")?;
        check_optional_date(&draft.next_followup_date)?;
        require(&draft.status, "Status is required")?;
        draft.status.trim().parse::<LeadStatus>()?;
        Ok(())
    }

    fn payload(draft: &FollowUpDraft, _mode: FormMode) -> Value {
        let mut payload = Map::new();
        payload.insert(
            "lead".to_owned(),
            draft.lead.map(Value::from).unwrap_or(Value::Null),
        );
        payload.insert(
            "followup_date".to_owned(),
            Value::from(draft.followup_date.trim()),
        );
        payload.insert(
            "next_followup_date".to_owned(),
            text_or_null(&draft.next_followup_date),
        );
        payload.insert("status".to_owned(), Value::from(draft.status.trim()));
        payload.insert("remarks".to_owned(), Value::from(draft.remarks.trim()));

        let answers: Vec<Value> = draft
            .faq_answers
            .iter()
            .filter(|(_, answer)| !answer.trim().is_empty())
            .map(|(faq, answer)| serde_json::json!({ "faq": faq, "answer": answer.trim() }))
            .collect();
        if !answers.is_empty() {
            payload.insert("faq_answers".to_owned(), Value::Array(answers));
        }

        Value::Object(payload)
    }

    fn columns() -> Vec<Column<LeadFollowUp>> {
        vec![
            Column::serial("#"),
            Column::field("followup_date", "Follow-up Date"),
            Column::field("next_followup_date", "Next Follow-up"),
            Column::field("status", "Status"),
            Column::field("remarks", "Remarks"),
        ]
    }
}
