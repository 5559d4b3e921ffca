//! Session context and the login/logout service.
//!
//! The credential lives in an explicit [`SessionContext`] handle that is
//! passed to whoever needs it. Changes are published over a `watch` channel.

use std::sync::Arc;

use hvacdesk_core::{AppError, AppResult, Credential};
use tokio::sync::watch;
use tracing::info;

use crate::{AuthGateway, CredentialStore};

/// Shared handle to the signed-in credential.
#[derive(Clone)]
pub struct SessionContext {
    credential: Arc<watch::Sender<Option<Credential>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        let (credential, _) = watch::channel(None);
        Self {
            credential: Arc::new(credential),
        }
    }

    /// Returns the current credential.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.credential.borrow().clone()
    }

    /// Returns the access token to send as a bearer header.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.credential
            .borrow()
            .as_ref()
            .map(|credential| credential.access().to_owned())
    }

    /// Returns whether a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.borrow().is_some()
    }

    /// Publishes a new credential.
    pub fn set(&self, credential: Credential) {
        self.credential.send_replace(Some(credential));
    }

    /// Publishes the signed-out state.
    pub fn clear(&self) {
        self.credential.send_replace(None);
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.credential.subscribe()
    }
}

/// Application service for signing in and out.
#[derive(Clone)]
pub struct SessionService {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn CredentialStore>,
    context: SessionContext,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        store: Arc<dyn CredentialStore>,
        context: SessionContext,
    ) -> Self {
        Self {
            auth,
            store,
            context,
        }
    }

    /// Returns the session handle.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Signs in, persists the credential and publishes it.
    pub async fn login(&self, email_or_mobile: &str, password: &str) -> AppResult<()> {
        let email_or_mobile = email_or_mobile.trim();
        if email_or_mobile.is_empty() {
            return Err(AppError::Validation(
                "Email or mobile is required".to_owned(),
            ));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_owned()));
        }

        let credential = self.auth.login(email_or_mobile, password).await?;
        self.store.save(&credential).await?;
        self.context.set(credential);
        info!("signed in");
        Ok(())
    }

    /// Forgets the stored credential and publishes the signed-out state.
    pub async fn logout(&self) -> AppResult<()> {
        self.store.clear().await?;
        self.context.clear();
        info!("signed out");
        Ok(())
    }

    /// Publishes the stored credential, if any; returns whether one was found.
    pub async fn restore(&self) -> AppResult<bool> {
        match self.store.load().await? {
            Some(credential) => {
                self.context.set(credential);
                Ok(true)
            }
            None => {
                self.context.clear();
                Ok(false)
            }
        }
    }

    /// Returns the signed-in user's role.
    pub async fn current_role(&self) -> AppResult<Option<String>> {
        let credential = self
            .context
            .credential()
            .ok_or_else(|| AppError::Unauthorized("not signed in".to_owned()))?;
        self.auth.current_role(&credential).await
    }
}
