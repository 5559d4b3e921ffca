use std::sync::Arc;

use async_trait::async_trait;
use hvacdesk_application::{CollectionGateway, ConfirmationPrompt, PageController};
use hvacdesk_core::{AppError, AppResult};
use hvacdesk_domain::{CustomerResource, FilterValue, FilterValues, UpdateMethod};
use serde_json::{Value, json};

use super::InMemoryCollectionGateway;

const CUSTOMERS: &str = "api/lead/customer/";

struct AlwaysConfirm;

#[async_trait]
impl ConfirmationPrompt for AlwaysConfirm {
    async fn confirm(&self, _message: &str) -> AppResult<bool> {
        Ok(true)
    }
}

fn customer(name: &str, city: &str) -> Value {
    json!({
        "name": name,
        "contact_number": "9876543210",
        "address": "12 MG Road",
        "city": city,
        "state": "Maharashtra",
        "pin_code": 411001,
        "both_address_is_same": true,
    })
}

async fn seeded(count: usize) -> InMemoryCollectionGateway {
    let gateway = InMemoryCollectionGateway::new(10);
    let records = (1..=count)
        .map(|index| customer(&format!("Customer {index}"), if index % 2 == 0 { "Pune" } else { "Nashik" }))
        .collect();
    gateway
        .seed(CUSTOMERS, records)
        .await
        .unwrap_or_else(|_| unreachable!());
    gateway
}

fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[tokio::test]
async fn list_returns_paginated_envelope() {
    let gateway = seeded(23).await;

    let body = gateway
        .list(CUSTOMERS, &query(&[("page", "3")]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(body["count"], json!(23));
    assert_eq!(body["page_size"], json!(10));
    assert_eq!(body["results"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["results"][0]["name"], json!("Customer 21"));
}

#[tokio::test]
async fn out_of_range_page_is_not_found() {
    let gateway = seeded(5).await;

    let result = gateway.list(CUSTOMERS, &query(&[("page", "2")])).await;

    assert!(matches!(result, Err(AppError::Fetch { status: 404, .. })));
}

#[tokio::test]
async fn search_and_field_filters_narrow_results() {
    let gateway = seeded(6).await;

    let body = gateway
        .list(CUSTOMERS, &query(&[("search", "customer 1"), ("city", "Nashik")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(body["count"], json!(1));

    let body = gateway
        .list(CUSTOMERS, &query(&[("city", "Pune,Nashik")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(body["count"], json!(6));
}

#[tokio::test]
async fn date_bounds_filter_by_field() {
    let gateway = InMemoryCollectionGateway::default();
    gateway
        .seed(
            "api/lead/lead/",
            vec![
                json!({ "date": "2024-01-05" }),
                json!({ "date": "2024-02-10" }),
                json!({ "date": "2024-03-15" }),
            ],
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let body = gateway
        .list(
            "api/lead/lead/",
            &query(&[("date_from", "2024-02-01"), ("date_to", "2024-02-28")]),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(body["count"], json!(1));
    assert_eq!(body["results"][0]["date"], json!("2024-02-10"));
}

#[tokio::test]
async fn create_patch_put_and_delete_records() {
    let gateway = seeded(2).await;

    let created = gateway
        .create(CUSTOMERS, customer("Acme Cooling", "Pune"))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(created["id"], json!(3));

    let patched = gateway
        .update("api/lead/customer/3/", UpdateMethod::Patch, json!({ "city": "Mumbai" }))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(patched["city"], json!("Mumbai"));
    assert_eq!(patched["name"], json!("Acme Cooling"));

    let replaced = gateway
        .update("api/lead/customer/3/", UpdateMethod::Put, json!({ "name": "Acme" }))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(replaced, json!({ "id": 3, "name": "Acme" }));

    gateway
        .delete("api/lead/customer/3/")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(gateway.record_count(CUSTOMERS).await, 2);

    let missing = gateway.retrieve("api/lead/customer/3/").await;
    assert!(matches!(missing, Err(AppError::Fetch { status: 404, .. })));
}

#[tokio::test]
async fn page_controller_drives_the_in_memory_api() {
    let gateway = Arc::new(seeded(21).await);
    let mut controller = PageController::<CustomerResource>::for_resource(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        None,
    )
    .unwrap_or_else(|_| unreachable!());

    controller.load().await;
    assert_eq!(controller.state().total_pages, 3);

    controller.go_to_page(3).await;
    assert_eq!(controller.state().rows.len(), 1);

    let deleted = controller
        .delete(21)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(deleted);
    assert_eq!(controller.current_page(), 2);
    assert_eq!(controller.state().total_pages, 2);

    let mut filters = FilterValues::new();
    filters.set("search", FilterValue::from("Customer 7"));
    controller
        .apply_filters(filters)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(controller.current_page(), 1);
    assert_eq!(controller.state().total_count, 1);

    controller.open_add();
    for (field, value) in [
        ("name", "Acme Cooling"),
        ("contact_number", "9123456780"),
        ("address", "5 FC Road"),
        ("city", "Pune"),
        ("state", "Maharashtra"),
        ("pin_code", "411004"),
        ("both_address_is_same", "true"),
    ] {
        controller
            .form_mut()
            .set_field(field, value)
            .unwrap_or_else(|_| unreachable!());
    }
    let saved = controller
        .submit_form()
        .await
        .unwrap_or_else(|_| unreachable!());

    let saved = saved.unwrap_or_else(|| unreachable!());
    assert_eq!(saved.site_city.as_deref(), Some("Pune"));
    assert_eq!(gateway.record_count(CUSTOMERS).await, 21);
}
