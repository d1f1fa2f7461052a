//! Provider configuration.
//!
//! The provider block carries the tenant domain and a management API token.
//! Either may be left out of configuration and supplied through the
//! environment instead:
//!
//! - `AUTH0_DOMAIN`: tenant domain, e.g. `example.us.auth0.com`
//! - `AUTH0_API_TOKEN`: management API access token

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::management::client::DEFAULT_TIMEOUT;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Environment variable read when `domain` is not configured.
pub const DOMAIN_ENV: &str = "AUTH0_DOMAIN";
/// Environment variable read when `api_token` is not configured.
pub const API_TOKEN_ENV: &str = "AUTH0_API_TOKEN";

/// Settings used to build the management API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Tenant domain.
    pub domain: String,
    /// Management API access token.
    pub api_token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    domain: Option<String>,
    api_token: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Resolve the configuration, falling back to the process environment.
    pub fn from_value(config: &Value) -> Result<Self, Vec<Diagnostic>> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve the configuration with a custom environment lookup.
    pub fn resolve<F>(config: &Value, env: F) -> Result<Self, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: RawConfig = if config.is_null() {
            RawConfig::default()
        } else {
            serde_json::from_value(config.clone()).map_err(|err| {
                vec![Diagnostic::error("Invalid provider configuration").with_detail(err.to_string())]
            })?
        };

        let pick = |configured: Option<String>, var: &str| {
            configured
                .filter(|v| !v.is_empty())
                .or_else(|| env(var).filter(|v| !v.is_empty()))
        };
        let domain = pick(raw.domain, DOMAIN_ENV);
        let api_token = pick(raw.api_token, API_TOKEN_ENV);

        let mut diagnostics = Vec::new();
        if domain.is_none() {
            diagnostics.push(missing("domain", DOMAIN_ENV));
        }
        if api_token.is_none() {
            diagnostics.push(missing("api_token", API_TOKEN_ENV));
        }
        if raw.timeout_seconds == Some(0) {
            diagnostics.push(
                Diagnostic::error("Invalid timeout")
                    .with_detail("timeout_seconds must be greater than zero")
                    .with_attribute("timeout_seconds"),
            );
        }

        match (domain, api_token) {
            (Some(domain), Some(api_token)) if diagnostics.is_empty() => Ok(Self {
                domain,
                api_token,
                timeout: raw
                    .timeout_seconds
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TIMEOUT),
            }),
            _ => Err(diagnostics),
        }
    }
}

fn missing(attribute: &str, var: &str) -> Diagnostic {
    Diagnostic::error(format!("Missing provider setting '{}'", attribute))
        .with_detail(format!(
            "Set `{}` in the provider block or the {} environment variable",
            attribute, var
        ))
        .with_attribute(attribute)
}

/// Schema of the provider block.
pub fn provider_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "domain",
            Attribute::optional_string().with_description(format!(
                "Your Auth0 tenant domain. Falls back to the `{}` environment variable.",
                DOMAIN_ENV
            )),
        )
        .with_attribute(
            "api_token",
            Attribute::optional_string().sensitive().with_description(format!(
                "Management API access token. Falls back to the `{}` environment variable.",
                API_TOKEN_ENV
            )),
        )
        .with_attribute(
            "timeout_seconds",
            Attribute::optional_number().with_description(format!(
                "Timeout for each management API request. Defaults to {} seconds.",
                DEFAULT_TIMEOUT.as_secs()
            )),
        )
}
