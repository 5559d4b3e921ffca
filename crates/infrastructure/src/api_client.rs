use hvacdesk_application::SessionContext;
use hvacdesk_core::{AppError, AppResult};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// JSON client for the CRM API rooted at one base URL.
#[derive(Clone)]
pub(crate) struct ApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    pub(crate) fn new(
        http_client: reqwest::Client,
        base_url: &str,
        session: SessionContext,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            base_url: parse_base_url(base_url)?,
            session,
        })
    }

    /// Sends a request, adding the bearer header when the session has a credential.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        payload: Option<&Value>,
    ) -> AppResult<Value> {
        let token = self.session.access_token();
        self.send_with_token(method, path, query, payload, token.as_deref())
            .await
    }

    /// Sends a request with an explicit bearer token.
    pub(crate) async fn send_with_token(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> AppResult<Value> {
        let url = endpoint_url(&self.base_url, path, query)?;
        debug!(method = %method, url = %url, "sending api request");

        let mut builder = self.http_client.request(method.clone(), url.clone());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(|error| {
            AppError::Connection(format!("failed to reach {url}: {error}"))
        })?;
        let status = response.status();
        debug!(method = %method, url = %url, status = status.as_u16(), "api response");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|error| {
            AppError::Connection(format!("failed to read response from {url}: {error}"))
        })?;
        parse_body(&body)
    }
}

/// Parses the base URL so relative endpoint paths join beneath it.
pub(crate) fn parse_base_url(base_url: &str) -> AppResult<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
        .map_err(|error| AppError::Validation(format!("invalid API base URL '{base_url}': {error}")))
}

pub(crate) fn endpoint_url(base_url: &Url, path: &str, query: &[(String, String)]) -> AppResult<Url> {
    let mut url = base_url
        .join(path.trim_start_matches('/'))
        .map_err(|error| AppError::Validation(format!("invalid endpoint path '{path}': {error}")))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// An empty success body reads as `null`.
pub(crate) fn parse_body(body: &str) -> AppResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body)
        .map_err(|error| AppError::UnexpectedShape(format!("response is not JSON: {error}")))
}

#[cfg(test)]
mod tests {
    use hvacdesk_core::AppError;
    use serde_json::json;

    use super::{endpoint_url, parse_base_url, parse_body};

    #[test]
    fn endpoints_join_under_base_path() {
        let base = parse_base_url("https://crm.example.com/backend//")
            .unwrap_or_else(|_| unreachable!());

        let url = endpoint_url(&base, "/api/lead/lead/", &[]).unwrap_or_else(|_| unreachable!());
        assert_eq!(url.as_str(), "https://crm.example.com/backend/api/lead/lead/");
    }

    #[test]
    fn query_pairs_are_encoded_in_order() {
        let base = parse_base_url("http://127.0.0.1:8000").unwrap_or_else(|_| unreachable!());
        let query = vec![
            ("page".to_owned(), "2".to_owned()),
            ("search".to_owned(), "ac repair".to_owned()),
            ("status".to_owned(), "open,in_process".to_owned()),
        ];

        let url = endpoint_url(&base, "api/lead/lead/", &query).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/lead/lead/?page=2&search=ac+repair&status=open%2Cin_process"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn bodies_parse_as_json_or_null() {
        assert_eq!(parse_body("").ok(), Some(serde_json::Value::Null));
        assert_eq!(parse_body(r#"{"id":1}"#).ok(), Some(json!({ "id": 1 })));
        assert!(matches!(
            parse_body("<html>"),
            Err(AppError::UnexpectedShape(_))
        ));
    }
}
