use std::collections::VecDeque;

use async_trait::async_trait;
use hvacdesk_core::{AppError, AppResult};
use hvacdesk_domain::UpdateMethod;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{CollectionGateway, ConfirmationPrompt};

type ListHandler = Box<dyn Fn(&str, &[(String, String)]) -> AppResult<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Option<Value>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) struct FakeCollectionGateway {
    list_handler: ListHandler,
    write_responses: Mutex<VecDeque<AppResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeCollectionGateway {
    pub fn with_list<F>(handler: F) -> Self
    where
        F: Fn(&str, &[(String, String)]) -> AppResult<Value> + Send + Sync + 'static,
    {
        Self {
            list_handler: Box::new(handler),
            write_responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(body: Value) -> Self {
        Self::with_list(move |_, _| Ok(body.clone()))
    }

    pub fn failing(status: u16, body: &'static str) -> Self {
        Self::with_list(move |_, _| {
            Err(AppError::Fetch {
                status,
                body: body.to_owned(),
            })
        })
    }

    pub async fn push_write_response(&self, response: AppResult<Value>) {
        self.write_responses.lock().await.push_back(response);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    async fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(String, String)],
        payload: Option<Value>,
    ) {
        self.requests.lock().await.push(RecordedRequest {
            method,
            path: path.to_owned(),
            query: query.to_vec(),
            payload,
        });
    }

    async fn next_write_response(&self) -> AppResult<Value> {
        self.write_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl CollectionGateway for FakeCollectionGateway {
    async fn list(&self, path: &str, query: &[(String, String)]) -> AppResult<Value> {
        self.record("GET", path, query, None).await;
        (self.list_handler)(path, query)
    }

    async fn retrieve(&self, path: &str) -> AppResult<Value> {
        self.record("GET", path, &[], None).await;
        (self.list_handler)(path, &[])
    }

    async fn create(&self, path: &str, payload: Value) -> AppResult<Value> {
        self.record("POST", path, &[], Some(payload)).await;
        self.next_write_response().await
    }

    async fn update(&self, path: &str, method: UpdateMethod, payload: Value) -> AppResult<Value> {
        self.record(method.as_str(), path, &[], Some(payload)).await;
        self.next_write_response().await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.record("DELETE", path, &[], None).await;
        self.next_write_response().await.map(|_| ())
    }
}

pub(crate) struct FakeConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeConfirmation {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for FakeConfirmation {
    async fn confirm(&self, message: &str) -> AppResult<bool> {
        self.prompts.lock().await.push(message.to_owned());
        Ok(self.answer)
    }
}

/// Page number requested by a recorded list query, defaulting to 1.
pub(crate) fn requested_page(query: &[(String, String)]) -> u64 {
    query
        .iter()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1)
}

/// A `{count, results}` envelope of roles named `role-{n}` for one page.
pub(crate) fn role_page(page: u64, count: u64, page_size: u64) -> Value {
    let first = (page - 1) * page_size + 1;
    let last = (page * page_size).min(count);
    let results: Vec<Value> = (first..=last)
        .map(|id| json!({ "id": id, "name": format!("role-{id}") }))
        .collect();
    json!({ "count": count, "results": results })
}
