use std::collections::BTreeMap;

use async_trait::async_trait;
use hvacdesk_application::CollectionGateway;
use hvacdesk_core::{AppError, AppResult, RecordId};
use hvacdesk_domain::{DEFAULT_PAGE_SIZE, UpdateMethod};
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;

type Collection = BTreeMap<RecordId, Map<String, Value>>;

/// In-memory collection gateway speaking the same envelope as the CRM API.
///
/// Lists answer `{count, page_size, results}`, honour `page` and `search`,
/// and match any other query key against the record field of that name.
#[derive(Debug)]
pub struct InMemoryCollectionGateway {
    page_size: usize,
    collections: RwLock<BTreeMap<String, Collection>>,
    next_id: RwLock<RecordId>,
}

impl Default for InMemoryCollectionGateway {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryCollectionGateway {
    /// Creates an empty gateway serving pages of `page_size` records.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            collections: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Stores records under `collection_path`, assigning ids to those without one.
    pub async fn seed(&self, collection_path: &str, records: Vec<Value>) -> AppResult<()> {
        for record in records {
            self.insert(collection_path, record).await?;
        }
        Ok(())
    }

    /// Returns the number of records stored under `collection_path`.
    pub async fn record_count(&self, collection_path: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection_path)
            .map_or(0, BTreeMap::len)
    }

    async fn insert(&self, collection_path: &str, record: Value) -> AppResult<Value> {
        let Value::Object(mut fields) = record else {
            return Err(bad_request("record must be a JSON object"));
        };

        let id = match fields.get("id").and_then(Value::as_i64) {
            Some(id) => {
                let mut next_id = self.next_id.write().await;
                *next_id = (*next_id).max(id + 1);
                id
            }
            None => {
                let mut next_id = self.next_id.write().await;
                let id = *next_id;
                *next_id += 1;
                id
            }
        };
        fields.insert("id".to_owned(), json!(id));

        self.collections
            .write()
            .await
            .entry(collection_path.to_owned())
            .or_default()
            .insert(id, fields.clone());
        Ok(Value::Object(fields))
    }
}

#[async_trait]
impl CollectionGateway for InMemoryCollectionGateway {
    async fn list(&self, path: &str, query: &[(String, String)]) -> AppResult<Value> {
        let mut page = 1_usize;
        let mut filters = Vec::new();
        for (key, value) in query {
            if key == "page" {
                page = value
                    .parse()
                    .map_err(|_| not_found("Invalid page."))?;
            } else {
                filters.push((key.as_str(), value.as_str()));
            }
        }

        let collections = self.collections.read().await;
        let matching: Vec<Value> = collections
            .get(path)
            .map(|collection| {
                collection
                    .values()
                    .filter(|record| filters.iter().all(|(key, value)| record_matches(record, key, value)))
                    .map(|record| Value::Object(record.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let count = matching.len();
        let last_page = count.div_ceil(self.page_size).max(1);
        if page == 0 || page > last_page {
            return Err(not_found("Invalid page."));
        }

        let results: Vec<Value> = matching
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();
        Ok(json!({
            "count": count,
            "page_size": self.page_size,
            "results": results,
        }))
    }

    async fn retrieve(&self, path: &str) -> AppResult<Value> {
        let (collection_path, id) = split_record_path(path)?;
        self.collections
            .read()
            .await
            .get(collection_path)
            .and_then(|collection| collection.get(&id))
            .map(|record| Value::Object(record.clone()))
            .ok_or_else(|| not_found("Not found."))
    }

    async fn create(&self, path: &str, payload: Value) -> AppResult<Value> {
        let mut payload = payload;
        if let Value::Object(fields) = &mut payload {
            fields.remove("id");
        }
        self.insert(path, payload).await
    }

    async fn update(&self, path: &str, method: UpdateMethod, payload: Value) -> AppResult<Value> {
        let (collection_path, id) = split_record_path(path)?;
        let Value::Object(changes) = payload else {
            return Err(bad_request("record must be a JSON object"));
        };

        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection_path)
            .and_then(|collection| collection.get_mut(&id))
            .ok_or_else(|| not_found("Not found."))?;

        if method == UpdateMethod::Put {
            record.clear();
        }
        record.extend(changes);
        record.insert("id".to_owned(), json!(id));
        Ok(Value::Object(record.clone()))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let (collection_path, id) = split_record_path(path)?;
        self.collections
            .write()
            .await
            .get_mut(collection_path)
            .and_then(|collection| collection.remove(&id))
            .map(|_| ())
            .ok_or_else(|| not_found("Not found."))
    }
}

/// Splits `api/x/{id}/` into `api/x/` and the id.
fn split_record_path(path: &str) -> AppResult<(&str, RecordId)> {
    let trimmed = path.trim_end_matches('/');
    let (prefix, id) = trimmed
        .rsplit_once('/')
        .ok_or_else(|| not_found("Not found."))?;
    let id = id.parse().map_err(|_| not_found("Not found."))?;
    Ok((&path[..=prefix.len()], id))
}

fn record_matches(record: &Map<String, Value>, key: &str, expected: &str) -> bool {
    if key == "search" {
        let needle = expected.trim().to_lowercase();
        return needle.is_empty()
            || record
                .values()
                .any(|value| value_text(value).is_some_and(|text| text.to_lowercase().contains(&needle)));
    }

    if !record.contains_key(key) {
        let field_text = |field: &str| record.get(field).and_then(value_text);
        if let Some(field) = key.strip_suffix("_from") {
            return field_text(field).is_some_and(|text| text.as_str() >= expected);
        }
        if let Some(field) = key.strip_suffix("_to") {
            return field_text(field).is_some_and(|text| text.as_str() <= expected);
        }
    }

    let accepted: Vec<&str> = expected.split(',').map(str::trim).collect();
    record
        .get(key)
        .and_then(|value| match value {
            Value::Object(nested) => nested.get("id").and_then(value_text),
            other => value_text(other),
        })
        .is_some_and(|text| accepted.contains(&text.as_str()))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn not_found(detail: &str) -> AppError {
    AppError::Fetch {
        status: 404,
        body: json!({ "detail": detail }).to_string(),
    }
}

fn bad_request(detail: &str) -> AppError {
    AppError::Fetch {
        status: 400,
        body: json!({ "detail": detail }).to_string(),
    }
}

#[cfg(test)]
mod tests;
