use std::marker::PhantomData;
use std::sync::Arc;

use hvacdesk_core::{AppError, AppResult, RecordId};
use hvacdesk_domain::{DEFAULT_PAGE_SIZE, FilterValues, PageResult, Resource};
use serde_json::Value;
use tracing::{debug, warn};

use crate::CollectionGateway;

/// Fetches pages and single records of one resource collection.
pub struct RemoteListFetcher<R: Resource> {
    gateway: Arc<dyn CollectionGateway>,
    page_size: Option<usize>,
    resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for RemoteListFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            page_size: self.page_size,
            resource: PhantomData,
        }
    }
}

impl<R: Resource> RemoteListFetcher<R> {
    /// Creates a fetcher; `page_size` overrides the item-count fallback
    /// when the server does not declare one.
    #[must_use]
    pub fn new(gateway: Arc<dyn CollectionGateway>, page_size: Option<usize>) -> Self {
        Self {
            gateway,
            page_size: page_size.filter(|size| *size > 0),
            resource: PhantomData,
        }
    }

    /// Fetches one page with the committed filters.
    ///
    /// Server and transport failures are returned. Unrecognised bodies are
    /// logged and degrade to an empty page.
    pub async fn fetch_page(
        &self,
        page: u32,
        filters: &FilterValues,
    ) -> AppResult<PageResult<R::Record>> {
        let page = page.max(1);
        let query = page_query(page, filters);
        debug!(resource = R::NAME, page, "fetching collection page");

        let body = self.gateway.list(R::COLLECTION_PATH, &query).await?;
        let parsed = parse_collection_page(body, page, self.page_size)
            .and_then(|result| result.try_map(decode_record::<R>));

        match parsed {
            Ok(result) => Ok(result),
            Err(AppError::UnexpectedShape(detail)) => {
                warn!(resource = R::NAME, page, detail = %detail, "showing empty page");
                Ok(PageResult::empty())
            }
            Err(error) => Err(error),
        }
    }

    /// Fetches one record by id.
    pub async fn fetch_record(&self, id: RecordId) -> AppResult<R::Record> {
        let body = self.gateway.retrieve(&R::record_path(id)).await?;
        if body.is_null() {
            return Err(AppError::NotFound(format!("{} {id}", R::NAME)));
        }
        decode_record::<R>(body)
    }
}

/// Returns `page` followed by the non-empty filter pairs.
#[must_use]
pub fn page_query(page: u32, filters: &FilterValues) -> Vec<(String, String)> {
    let mut query = vec![("page".to_owned(), page.to_string())];
    query.extend(filters.to_query_pairs());
    query
}

/// Interprets a collection response body.
///
/// A `{count, results}` envelope keeps the requested page; its page size is
/// the declared `page_size`, else `configured_page_size`, else the number of
/// items, else [`DEFAULT_PAGE_SIZE`]. A bare array, or an object with a
/// `results` or `data` array but no count, is one page holding everything.
pub fn parse_collection_page(
    body: Value,
    requested_page: u32,
    configured_page_size: Option<usize>,
) -> AppResult<PageResult<Value>> {
    let mut map = match body {
        Value::Array(items) => return Ok(PageResult::single_page(items)),
        Value::Object(map) => map,
        other => {
            return Err(AppError::UnexpectedShape(format!(
                "expected a list or an object, got {}",
                json_kind(&other)
            )));
        }
    };

    let count = map
        .get("count")
        .and_then(Value::as_u64)
        .map(|count| usize::try_from(count).unwrap_or(usize::MAX));
    let declared_page_size = map
        .get("page_size")
        .and_then(Value::as_u64)
        .and_then(|size| usize::try_from(size).ok())
        .filter(|size| *size > 0);

    match (count, map.remove("results")) {
        (Some(count), Some(Value::Array(items))) => {
            let page_size = declared_page_size
                .or(configured_page_size)
                .or((!items.is_empty()).then_some(items.len()))
                .unwrap_or(DEFAULT_PAGE_SIZE);
            PageResult::new(items, count, page_size, requested_page.max(1))
        }
        (_, Some(Value::Array(items))) => Ok(PageResult::single_page(items)),
        _ => match map.remove("data") {
            Some(Value::Array(items)) => Ok(PageResult::single_page(items)),
            _ => Err(AppError::UnexpectedShape(
                "collection response has no results array".to_owned(),
            )),
        },
    }
}

/// Returns the records of a list body: a bare array or its `results` array.
pub(crate) fn collection_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

pub(crate) fn decode_record<R: Resource>(value: Value) -> AppResult<R::Record> {
    serde_json::from_value(value).map_err(|error| {
        AppError::UnexpectedShape(format!("failed to parse {} record: {error}", R::NAME))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests;
