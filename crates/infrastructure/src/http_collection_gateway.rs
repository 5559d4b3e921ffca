use async_trait::async_trait;
use hvacdesk_application::{CollectionGateway, SessionContext};
use hvacdesk_core::AppResult;
use hvacdesk_domain::UpdateMethod;
use reqwest::Method;
use serde_json::Value;

use crate::api_client::ApiClient;

/// `reqwest` implementation of the collection gateway.
///
/// Every request carries `Authorization: Bearer` when the session holds a
/// credential. Non-success statuses become `AppError::Fetch` with the body,
/// transport failures become `AppError::Connection`.
#[derive(Clone)]
pub struct HttpCollectionGateway {
    client: ApiClient,
}

impl HttpCollectionGateway {
    /// Creates a gateway for the API rooted at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        session: SessionContext,
    ) -> AppResult<Self> {
        Ok(Self {
            client: ApiClient::new(http_client, base_url, session)?,
        })
    }
}

fn update_method(method: UpdateMethod) -> Method {
    match method {
        UpdateMethod::Patch => Method::PATCH,
        UpdateMethod::Put => Method::PUT,
    }
}

#[async_trait]
impl CollectionGateway for HttpCollectionGateway {
    async fn list(&self, path: &str, query: &[(String, String)]) -> AppResult<Value> {
        self.client.send(Method::GET, path, query, None).await
    }

    async fn retrieve(&self, path: &str) -> AppResult<Value> {
        self.client.send(Method::GET, path, &[], None).await
    }

    async fn create(&self, path: &str, payload: Value) -> AppResult<Value> {
        self.client
            .send(Method::POST, path, &[], Some(&payload))
            .await
    }

    async fn update(&self, path: &str, method: UpdateMethod, payload: Value) -> AppResult<Value> {
        self.client
            .send(update_method(method), path, &[], Some(&payload))
            .await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.client
            .send(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use hvacdesk_domain::UpdateMethod;
    use reqwest::Method;

    use super::update_method;

    #[test]
    fn update_methods_map_to_http_verbs() {
        assert_eq!(update_method(UpdateMethod::Patch), Method::PATCH);
        assert_eq!(update_method(UpdateMethod::Put), Method::PUT);
    }
}
