use std::env;
use std::time::Duration;

use dtrack_core::{AppError, AppResult, Credentials};
use dtrack_infrastructure::ClientSettings;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Provider settings read from the environment.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: Url,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub page_size: u32,
}

impl ProviderConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let endpoint = lookup("DTRACK_ENDPOINT")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DTRACK_ENDPOINT is required".to_owned()))?;
        let endpoint = Url::parse(endpoint.trim().trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid DTRACK_ENDPOINT '{endpoint}': {error}"))
        })?;

        let credentials = Credentials::from_settings(
            lookup("DTRACK_API_KEY"),
            lookup("DTRACK_USERNAME"),
            lookup("DTRACK_PASSWORD"),
        )?;

        let timeout_secs = positive(&lookup, "DTRACK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let page_size = positive(&lookup, "DTRACK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        Ok(Self {
            endpoint,
            credentials,
            timeout: Duration::from_secs(timeout_secs),
            page_size,
        })
    }

    /// Returns the HTTP client settings.
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            credentials: self.credentials.clone(),
            timeout: self.timeout,
        }
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(name).filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(AppError::Validation(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use dtrack_core::{AppError, Credentials};

    use super::ProviderConfig;

    fn load(vars: &[(&str, &str)]) -> Result<ProviderConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ProviderConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_and_trailing_slash_is_trimmed() {
        let config = load(&[
            ("DTRACK_ENDPOINT", "https://dtrack.example/dtrack/"),
            ("DTRACK_API_KEY", "odt_secret"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.endpoint.as_str(), "https://dtrack.example/dtrack");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 100);
        assert_eq!(config.credentials, Credentials::ApiKey("odt_secret".to_owned()));
    }

    #[test]
    fn endpoint_is_required() {
        let result = load(&[("DTRACK_API_KEY", "odt_secret")]);
        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("DTRACK_ENDPOINT")
        ));
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        let result = load(&[("DTRACK_ENDPOINT", "not a url"), ("DTRACK_API_KEY", "k")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn credential_rules_are_enforced() {
        let result = load(&[
            ("DTRACK_ENDPOINT", "https://dtrack.example"),
            ("DTRACK_API_KEY", "odt_secret"),
            ("DTRACK_USERNAME", "admin"),
        ]);
        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("mutually exclusive")
        ));

        let config = load(&[
            ("DTRACK_ENDPOINT", "https://dtrack.example"),
            ("DTRACK_USERNAME", "admin"),
            ("DTRACK_PASSWORD", "hunter2"),
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.credentials.method(), "username_password");
    }

    #[test]
    fn zero_or_garbage_numbers_are_rejected() {
        for (name, value) in [
            ("DTRACK_TIMEOUT_SECS", "0"),
            ("DTRACK_TIMEOUT_SECS", "soon"),
            ("DTRACK_PAGE_SIZE", "-5"),
        ] {
            let result = load(&[
                ("DTRACK_ENDPOINT", "https://dtrack.example"),
                ("DTRACK_API_KEY", "k"),
                (name, value),
            ]);
            assert!(
                matches!(&result, Err(AppError::Validation(message)) if message.contains(name)),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn debug_output_keeps_the_api_key_out() {
        let config = load(&[
            ("DTRACK_ENDPOINT", "https://dtrack.example"),
            ("DTRACK_API_KEY", "odt_secret"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert!(!format!("{config:?}").contains("odt_secret"));
    }
}
