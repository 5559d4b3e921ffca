use async_trait::async_trait;
use hvacdesk_application::{AuthGateway, SessionContext};
use hvacdesk_core::{AppError, AppResult, Credential};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api_client::ApiClient;

const LOGIN_PATH: &str = "api/auth/dj-rest-auth/login/";
const CURRENT_USER_PATH: &str = "api/auth/me/";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: Option<String>,
    refresh: Option<String>,
}

/// `reqwest` implementation of the CRM authentication endpoints.
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: ApiClient,
}

impl HttpAuthGateway {
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

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email_or_mobile: &str, password: &str) -> AppResult<Credential> {
        let payload = json!({
            "email_or_mobile": email_or_mobile,
            "password": password,
        });
        let body = self
            .client
            .send_with_token(Method::POST, LOGIN_PATH, &[], Some(&payload), None)
            .await?;
        credential_from_login(body)
    }

    async fn current_role(&self, credential: &Credential) -> AppResult<Option<String>> {
        let body = self
            .client
            .send_with_token(
                Method::GET,
                CURRENT_USER_PATH,
                &[],
                None,
                Some(credential.access()),
            )
            .await?;
        Ok(role_name(&body))
    }
}

fn credential_from_login(body: Value) -> AppResult<Credential> {
    let response: LoginResponse = serde_json::from_value(body).map_err(|error| {
        AppError::UnexpectedShape(format!("failed to parse login response: {error}"))
    })?;
    let access = response
        .access
        .ok_or_else(|| AppError::Unauthorized("login response carried no access token".to_owned()))?;
    Credential::new(access, response.refresh)
}

/// Reads `role` as either a name or a `{name}` object.
fn role_name(body: &Value) -> Option<String> {
    match body.get("role")? {
        Value::String(name) if !name.trim().is_empty() => Some(name.clone()),
        Value::Object(role) => role
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use hvacdesk_core::AppError;
    use serde_json::json;

    use super::{credential_from_login, role_name};

    #[test]
    fn login_response_yields_credential() {
        let credential = credential_from_login(json!({ "access": "abc", "refresh": "def" }))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(credential.access(), "abc");
        assert_eq!(credential.refresh(), Some("def"));
    }

    #[test]
    fn login_response_without_access_is_unauthorized() {
        let result = credential_from_login(json!({ "refresh": "def" }));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn role_reads_name_or_object() {
        assert_eq!(role_name(&json!({ "role": "admin" })), Some("admin".to_owned()));
        assert_eq!(
            role_name(&json!({ "role": { "id": 2, "name": "sales" } })),
            Some("sales".to_owned())
        );
        assert_eq!(role_name(&json!({ "role": null })), None);
        assert_eq!(role_name(&json!({})), None);
    }
}
