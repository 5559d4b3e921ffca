use std::sync::Arc;

use hvacdesk_core::AppError;
use hvacdesk_domain::{FilterValue, FilterValues, LeadResource, RoleResource, StaffResource};
use serde_json::json;

use super::{RemoteListFetcher, page_query, parse_collection_page};
use crate::test_support::{FakeCollectionGateway, requested_page, role_page};

#[test]
fn envelope_page_count_uses_item_count_when_undeclared() {
    let items: Vec<_> = (1..=10).map(|id| json!({ "id": id })).collect();
    let page = parse_collection_page(json!({ "count": 23, "results": items }), 1, None)
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total_count(), 23);
    assert_eq!(page.page_size(), 10);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.page(), 1);
}

#[test]
fn declared_page_size_beats_configured_and_item_count() {
    let items: Vec<_> = (1..=3).map(|id| json!({ "id": id })).collect();
    let body = json!({ "count": 23, "page_size": 10, "results": items });

    let page = parse_collection_page(body, 3, Some(25)).unwrap_or_else(|_| unreachable!());
    assert_eq!(page.page_size(), 10);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.page(), 3);
}

#[test]
fn configured_page_size_covers_short_last_page() {
    let items: Vec<_> = (1..=3).map(|id| json!({ "id": id })).collect();
    let body = json!({ "count": 23, "results": items });

    let page = parse_collection_page(body, 3, Some(10)).unwrap_or_else(|_| unreachable!());
    assert_eq!(page.total_pages(), 3);
}

#[test]
fn bare_array_is_a_single_page() {
    let items: Vec<_> = (1..=5).map(|id| json!({ "id": id })).collect();
    let page = parse_collection_page(json!(items), 4, None).unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total_count(), 5);
    assert_eq!(page.total_pages(), 1);
    assert_eq!(page.page(), 1);
}

#[test]
fn data_array_without_count_is_a_single_page() {
    let page = parse_collection_page(json!({ "data": [{ "id": 1 }, { "id": 2 }] }), 1, None)
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(page.total_count(), 2);
}

#[test]
fn other_shapes_are_unexpected() {
    let result = parse_collection_page(json!({ "detail": "ok" }), 1, None);
    assert!(matches!(result, Err(AppError::UnexpectedShape(_))));

    let result = parse_collection_page(json!("ok"), 1, None);
    assert!(matches!(result, Err(AppError::UnexpectedShape(_))));
}

#[test]
fn query_starts_with_page_then_non_empty_filters() {
    let mut filters = FilterValues::new();
    filters.set("search", FilterValue::from("ravi"));
    filters.set("role", FilterValue::from(""));

    assert_eq!(
        page_query(2, &filters),
        vec![
            ("page".to_owned(), "2".to_owned()),
            ("search".to_owned(), "ravi".to_owned()),
        ]
    );
}

#[tokio::test]
async fn fetch_page_sends_collection_path_and_decodes_records() {
    let gateway = Arc::new(FakeCollectionGateway::with_list(|_, query| {
        Ok(role_page(requested_page(query), 23, 10))
    }));
    let fetcher = RemoteListFetcher::<RoleResource>::new(gateway.clone(), None);

    let page = fetcher
        .fetch_page(3, &FilterValues::new())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.items().len(), 3);
    assert_eq!(page.items()[0].name, "role-21");
    assert_eq!(page.page(), 3);

    let requests = gateway.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "api/auth/roles/");
    assert_eq!(requests[0].query_value("page"), Some("3"));
}

#[tokio::test]
async fn server_error_is_returned_with_its_message() {
    let gateway = Arc::new(FakeCollectionGateway::failing(500, r#"{"detail":"boom"}"#));
    let fetcher = RemoteListFetcher::<LeadResource>::new(gateway, None);

    let result = fetcher.fetch_page(1, &FilterValues::new()).await;
    let error = result.err().unwrap_or_else(|| unreachable!());
    assert!(error.user_message().contains("boom"));
}

#[tokio::test]
async fn unparseable_rows_degrade_to_empty_page() {
    let gateway = Arc::new(FakeCollectionGateway::returning(
        json!({ "count": 1, "results": [{ "id": "not-a-number" }] }),
    ));
    let fetcher = RemoteListFetcher::<StaffResource>::new(gateway, None);

    let page = fetcher
        .fetch_page(1, &FilterValues::new())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(page.items().is_empty());
    assert_eq!(page.total_count(), 0);
    assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn fetch_record_reads_detail_path() {
    let gateway = Arc::new(FakeCollectionGateway::returning(json!({
        "id": 41,
        "customer_name": "Acme",
        "followups": [{ "id": 1, "followup_date": "2024-05-01", "status": "open" }]
    })));
    let fetcher = RemoteListFetcher::<LeadResource>::new(gateway.clone(), None);

    let lead = fetcher
        .fetch_record(41)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(lead.customer_name.as_deref(), Some("Acme"));
    assert_eq!(lead.followups.len(), 1);
    assert_eq!(gateway.requests().await[0].path, "api/lead/lead/41/");
}
