use std::process::ExitCode;
use std::sync::Arc;

use async_trait::async_trait;
use hvacdesk_application::{
    AuthGateway, CollectionGateway, ConfirmationPrompt, SessionContext, SessionService,
};
use hvacdesk_core::{AppError, AppResult, Credential};
use hvacdesk_domain::{
    CustomerResource, FilterKind, FilterValue, LeadResource, Resource, RoleResource,
    StaffResource,
};
use hvacdesk_infrastructure::{InMemoryCollectionGateway, InMemoryCredentialStore};
use serde_json::json;

use super::{Console, ListRequest, filter_values, parse_filter_value};
use crate::cli::{Commands, ResourceKind};

struct RefusingAuth;

#[async_trait]
impl AuthGateway for RefusingAuth {
    async fn login(&self, _email_or_mobile: &str, _password: &str) -> AppResult<Credential> {
        Err(AppError::Unauthorized("invalid credentials".to_owned()))
    }

    async fn current_role(&self, _credential: &Credential) -> AppResult<Option<String>> {
        Ok(None)
    }
}

struct Decline;

#[async_trait]
impl ConfirmationPrompt for Decline {
    async fn confirm(&self, _message: &str) -> AppResult<bool> {
        Ok(false)
    }
}

fn console(gateway: Arc<InMemoryCollectionGateway>, signed_in: bool) -> Console {
    let context = SessionContext::new();
    if signed_in {
        context.set(Credential::new("token", None).unwrap_or_else(|_| unreachable!()));
    }
    let session = SessionService::new(
        Arc::new(RefusingAuth),
        Arc::new(InMemoryCredentialStore::new()),
        context,
    );
    Console::new(gateway, session, None)
}

fn customer() -> serde_json::Value {
    json!({
        "name": "Acme Cooling",
        "contact_number": "9876543210",
        "address": "12 MG Road",
        "city": "Pune",
        "state": "Maharashtra",
        "pin_code": 411001,
        "both_address_is_same": true,
    })
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[test]
fn filter_values_follow_the_field_kind() {
    assert_eq!(
        parse_filter_value(FilterKind::MultiSelect, "open, in_process,"),
        FilterValue::Set(vec!["open".to_owned(), "in_process".to_owned()])
    );
    assert_eq!(
        parse_filter_value(FilterKind::DateRange, "2024-01-01..2024-01-31"),
        FilterValue::DateRange {
            from: "2024-01-01".to_owned(),
            to: "2024-01-31".to_owned(),
        }
    );
    assert_eq!(
        parse_filter_value(FilterKind::DateRange, "2024-01-01"),
        FilterValue::DateRange {
            from: "2024-01-01".to_owned(),
            to: String::new(),
        }
    );
    assert_eq!(
        parse_filter_value(FilterKind::SingleSelect, "admin"),
        FilterValue::from("admin")
    );
}

#[test]
fn search_lands_on_the_search_field_and_unknown_keys_fail() {
    let spec = StaffResource::filter_spec_with_roles(&[]).unwrap_or_else(|_| unreachable!());

    let values = filter_values(&spec, Some("ravi"), &fields(&[("role", "3")]))
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(values.text("search"), "ravi");
    assert_eq!(values.text("role"), "3");

    let result = filter_values(&spec, None, &fields(&[("city", "Pune")]));
    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message == "unknown filter 'city'; expected one of: search, role"
    ));
}

#[tokio::test]
async fn commands_need_a_session() {
    let console = console(Arc::new(InMemoryCollectionGateway::default()), false);

    let result = console
        .run(Commands::List {
            resource: ResourceKind::Roles,
            page: 1,
            search: None,
            filters: Vec::new(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn list_clamps_pages_and_accepts_empty_results() {
    let gateway = Arc::new(InMemoryCollectionGateway::default());
    gateway
        .seed(RoleResource::COLLECTION_PATH, vec![json!({ "name": "sales" })])
        .await
        .unwrap_or_else(|_| unreachable!());
    let console = console(Arc::clone(&gateway), true);

    let listed = console
        .list_page::<RoleResource>(
            RoleResource::filter_spec().unwrap_or_else(|_| unreachable!()),
            &ListRequest {
                page: 4,
                ..ListRequest::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(listed, ExitCode::SUCCESS);

    let searched = console
        .list_page::<RoleResource>(
            RoleResource::filter_spec().unwrap_or_else(|_| unreachable!()),
            &ListRequest {
                page: 1,
                search: Some("nobody".to_owned()),
                filters: Vec::new(),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(searched, ExitCode::SUCCESS);
}

#[tokio::test]
async fn new_lead_links_the_customer_with_the_same_phone() {
    let gateway = Arc::new(InMemoryCollectionGateway::default());
    gateway
        .seed(CustomerResource::COLLECTION_PATH, vec![customer()])
        .await
        .unwrap_or_else(|_| unreachable!());
    let console = console(Arc::clone(&gateway), true);

    console
        .create_lead(&fields(&[
            ("date", "2024-05-01"),
            ("contact_number", "9876543210"),
            ("lead_source", "google_ads"),
            ("status", "open"),
        ]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let leads = gateway
        .list(LeadResource::COLLECTION_PATH, &[])
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(leads["count"], json!(1));
    assert_eq!(leads["results"][0]["customer"], json!(1));
}

#[tokio::test]
async fn invalid_lead_is_not_sent() {
    let gateway = Arc::new(InMemoryCollectionGateway::default());
    let console = console(Arc::clone(&gateway), true);

    let result = console
        .create_lead(&fields(&[("date", "2024-05-01"), ("lead_source", "google_ads")]))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message == "Contact Number is required"
    ));
    assert_eq!(gateway.record_count(LeadResource::COLLECTION_PATH).await, 0);
}

#[tokio::test]
async fn edit_changes_only_the_given_fields() {
    let gateway = Arc::new(InMemoryCollectionGateway::default());
    gateway
        .seed(CustomerResource::COLLECTION_PATH, vec![customer()])
        .await
        .unwrap_or_else(|_| unreachable!());
    let console = console(Arc::clone(&gateway), true);

    console
        .edit_record::<CustomerResource>(1, &fields(&[("city", "Mumbai")]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let record = gateway
        .retrieve(&CustomerResource::record_path(1))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(record["city"], json!("Mumbai"));
    assert_eq!(record["site_city"], json!("Mumbai"));
    assert_eq!(record["name"], json!("Acme Cooling"));
}

#[tokio::test]
async fn delete_honours_the_confirmation() {
    let gateway = Arc::new(InMemoryCollectionGateway::default());
    gateway
        .seed(RoleResource::COLLECTION_PATH, vec![json!({ "name": "sales" })])
        .await
        .unwrap_or_else(|_| unreachable!());
    let console = console(Arc::clone(&gateway), true);

    console
        .delete_record::<RoleResource>(1, Arc::new(Decline))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(gateway.record_count(RoleResource::COLLECTION_PATH).await, 1);

    console
        .delete_record::<RoleResource>(1, Arc::new(crate::prompt::AssumeYes))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(gateway.record_count(RoleResource::COLLECTION_PATH).await, 0);
}
