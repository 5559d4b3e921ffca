use async_trait::async_trait;
use hvacdesk_core::AppResult;
use hvacdesk_domain::UpdateMethod;
use serde_json::Value;

/// Port for the CRM REST collections.
///
/// Paths are relative to the API base URL and end with `/`, for example
/// `api/lead/lead/` or `api/lead/lead/41/`.
#[async_trait]
pub trait CollectionGateway: Send + Sync {
    /// Sends `GET path?query` and returns the JSON body.
    async fn list(&self, path: &str, query: &[(String, String)]) -> AppResult<Value>;

    /// Sends `GET path` for one record.
    async fn retrieve(&self, path: &str) -> AppResult<Value>;

    /// Sends `POST path` with a JSON body.
    async fn create(&self, path: &str, payload: Value) -> AppResult<Value>;

    /// Sends `PATCH` or `PUT` to a record path with a JSON body.
    async fn update(&self, path: &str, method: UpdateMethod, payload: Value) -> AppResult<Value>;

    /// Sends `DELETE path`.
    async fn delete(&self, path: &str) -> AppResult<()>;
}

/// Port for asking the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Returns `true` when the user accepts.
    async fn confirm(&self, message: &str) -> AppResult<bool>;
}
