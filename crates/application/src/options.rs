use std::sync::Arc;

use hvacdesk_core::AppResult;
use hvacdesk_domain::{FilterOption, FilterSpec, LeadFaq, Resource, Role, RoleResource, StaffMember, StaffResource};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::CollectionGateway;
use crate::list_fetcher::collection_items;

const LEAD_FAQS_PATH: &str = "api/lead/lead-faqs/";
const ASSIGNEE_SEARCH: &str = "sales";

/// Loads the option lists forms and filter panels choose from.
#[derive(Clone)]
pub struct LookupOptionsService {
    gateway: Arc<dyn CollectionGateway>,
}

impl LookupOptionsService {
    /// Creates the service.
    #[must_use]
    pub fn new(gateway: Arc<dyn CollectionGateway>) -> Self {
        Self { gateway }
    }

    /// Returns sales staff as lead assignee options keyed by staff id.
    pub async fn assignee_options(&self) -> AppResult<Vec<FilterOption>> {
        let query = vec![("search".to_owned(), ASSIGNEE_SEARCH.to_owned())];
        let staff: Vec<StaffMember> = self.load(StaffResource::COLLECTION_PATH, &query).await?;

        Ok(staff
            .iter()
            .filter_map(|member| {
                member
                    .id
                    .map(|id| FilterOption::new(id.to_string(), member.full_name()))
            })
            .collect())
    }

    /// Returns every role.
    pub async fn roles(&self) -> AppResult<Vec<Role>> {
        self.load(RoleResource::COLLECTION_PATH, &[]).await
    }

    /// Returns the staff filter panel with a role select built from the server's roles.
    pub async fn staff_filter_spec(&self) -> AppResult<FilterSpec> {
        let roles = self.roles().await?;
        StaffResource::filter_spec_with_roles(&roles)
    }

    /// Returns the follow-up qualification questions.
    pub async fn lead_faqs(&self) -> AppResult<Vec<LeadFaq>> {
        self.load(LEAD_FAQS_PATH, &[]).await
    }

    async fn load<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> AppResult<Vec<T>> {
        let body = self.gateway.list(path, query).await?;
        Ok(collection_items(body)
            .into_iter()
            .filter_map(|item| decode_option(path, item))
            .collect())
    }
}

fn decode_option<T: DeserializeOwned>(path: &str, item: Value) -> Option<T> {
    serde_json::from_value(item)
        .map_err(|error| warn!(path, error = %error, "skipping unreadable option"))
        .ok()
}
