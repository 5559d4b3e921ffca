use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppResult, NonEmptyString};

/// Bearer credential issued by the CRM login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    access: NonEmptyString,
    #[serde(default)]
    refresh: Option<String>,
}

impl Credential {
    /// Creates a credential from an access token and an optional refresh token.
    pub fn new(access: impl Into<String>, refresh: Option<String>) -> AppResult<Self> {
        Ok(Self {
            access: NonEmptyString::new(access)?,
            refresh: refresh.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns the access token sent as `Authorization: Bearer`.
    #[must_use]
    pub fn access(&self) -> &str {
        self.access.as_str()
    }

    /// Returns the refresh token when the server issued one.
    #[must_use]
    pub fn refresh(&self) -> Option<&str> {
        self.refresh.as_deref()
    }
}

impl Debug for Credential {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credential")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
