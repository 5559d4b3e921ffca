use async_trait::async_trait;
use hvacdesk_core::{AppResult, Credential};

/// Port for the CRM authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges an email or mobile number and a password for a credential.
    async fn login(&self, email_or_mobile: &str, password: &str) -> AppResult<Credential>;

    /// Returns the role name of the credential's user, when one is assigned.
    async fn current_role(&self, credential: &Credential) -> AppResult<Option<String>>;
}

/// Port for persisting the credential between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    async fn load(&self) -> AppResult<Option<Credential>>;

    /// Replaces the stored credential.
    async fn save(&self, credential: &Credential) -> AppResult<()>;

    /// Removes the stored credential; succeeds when nothing is stored.
    async fn clear(&self) -> AppResult<()>;
}
