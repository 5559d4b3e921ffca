use std::env;
use std::path::PathBuf;
use std::time::Duration;

use hvacdesk_core::{AppError, AppResult};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_CREDENTIAL_PATH: &str = ".hvacdesk/credential.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Console runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub credential_path: PathBuf,
    pub page_size: Option<usize>,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the settings from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_base_url = lookup("HVACDESK_API_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let credential_path = lookup("HVACDESK_CREDENTIAL_PATH")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CREDENTIAL_PATH.to_owned());
        let page_size = parse_optional_usize(&lookup, "HVACDESK_PAGE_SIZE")?;
        let http_timeout_secs =
            parse_u64(&lookup, "HVACDESK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        if page_size == Some(0) {
            return Err(AppError::Validation(
                "HVACDESK_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "HVACDESK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            credential_path: PathBuf::from(credential_path),
            page_size,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

fn parse_optional_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> AppResult<Option<usize>> {
    match lookup(name) {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value.trim().parse::<usize>().map(Some).map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(None),
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    use hvacdesk_core::AppError;

    use super::ConsoleConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.credential_path, Path::new(".hvacdesk/credential.json"));
        assert_eq!(config.page_size, None);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        let config = load(&[
            ("HVACDESK_API_BASE_URL", "https://crm.example.com//"),
            ("HVACDESK_PAGE_SIZE", "25"),
            ("HVACDESK_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url, "https://crm.example.com");
        assert_eq!(config.page_size, Some(25));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_and_garbage_values_are_rejected() {
        assert!(matches!(
            load(&[("HVACDESK_PAGE_SIZE", "0")]),
            Err(AppError::Validation(message)) if message.contains("greater than zero")
        ));
        assert!(matches!(
            load(&[("HVACDESK_HTTP_TIMEOUT_SECS", "0")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("HVACDESK_PAGE_SIZE", "ten")]),
            Err(AppError::Validation(message)) if message.starts_with("invalid HVACDESK_PAGE_SIZE value 'ten'")
        ));
    }
}
