//! The Auth0 provider: configuration plus dispatch to the resource module.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{provider_schema, ProviderConfig};
use crate::error::ProviderError;
use crate::logstream::{self, RESOURCE_TYPE};
use crate::management::{LogStreamApi, ManagementClient};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};
use crate::validation;

/// Provider serving the `auth0_log_stream` resource.
pub struct Auth0Provider {
    api: RwLock<Option<Arc<dyn LogStreamApi>>>,
}

impl Auth0Provider {
    /// An unconfigured provider; [`ProviderService::configure`] must run first.
    pub fn new() -> Self {
        Self {
            api: RwLock::new(None),
        }
    }

    /// A provider already bound to a management API implementation.
    pub fn with_api(api: Arc<dyn LogStreamApi>) -> Self {
        Self {
            api: RwLock::new(Some(api)),
        }
    }

    async fn api(&self) -> Result<Arc<dyn LogStreamApi>, ProviderError> {
        self.api.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "the provider has not been configured with a domain and API token".to_string(),
            )
        })
    }
}

impl Default for Auth0Provider {
    fn default() -> Self {
        Self::new()
    }
}

fn check_resource_type(resource_type: &str) -> Result<(), ProviderError> {
    if resource_type == RESOURCE_TYPE {
        Ok(())
    } else {
        Err(ProviderError::UnknownResource(resource_type.to_string()))
    }
}

#[async_trait::async_trait]
impl ProviderService for Auth0Provider {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(provider_schema())
            .with_resource(RESOURCE_TYPE, logstream::resource_schema())
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validation::validate(&provider_schema(), &config))
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = match ProviderConfig::from_value(&config) {
            Ok(config) => config,
            Err(diagnostics) => return Ok(diagnostics),
        };

        let client = ManagementClient::with_timeout(&config.domain, config.api_token, config.timeout)?;
        info!(base_url = client.base_url(), "Configured management API client");
        *self.api.write().await = Some(Arc::new(client));
        Ok(vec![])
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        self.api.write().await.take();
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        check_resource_type(resource_type)?;
        Ok(logstream::validate(&config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        check_resource_type(resource_type)?;
        logstream::plan(prior_state, proposed_state)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        check_resource_type(resource_type)?;
        logstream::create(self.api().await?.as_ref(), planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        check_resource_type(resource_type)?;
        logstream::read(self.api().await?.as_ref(), current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        check_resource_type(resource_type)?;
        logstream::update(self.api().await?.as_ref(), prior_state, planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        check_resource_type(resource_type)?;
        logstream::delete(self.api().await?.as_ref(), current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        check_resource_type(resource_type)?;
        logstream::import(self.api().await?.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_lists_log_stream() {
        let provider = Auth0Provider::new();
        assert_eq!(provider.metadata().resources, vec![RESOURCE_TYPE.to_string()]);
        assert!(provider.schema().provider.block.attributes.contains_key("domain"));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_rejects_operations() {
        let provider = Auth0Provider::new();
        let err = provider
            .read(RESOURCE_TYPE, json!({"id": "lst_1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = Auth0Provider::new();
        let err = provider
            .validate_resource_config("auth0_client", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(ref t) if t == "auth0_client"));
    }

    #[tokio::test]
    async fn test_configure_builds_client() {
        let provider = Auth0Provider::new();
        let diagnostics = provider
            .configure(json!({"domain": "example.us.auth0.com", "api_token": "t"}))
            .await
            .unwrap();
        assert!(diagnostics.is_empty());
        assert!(provider.api().await.is_ok());

        provider.stop().await.unwrap();
        assert!(provider.api().await.is_err());
    }

    #[tokio::test]
    async fn test_configure_reports_diagnostics() {
        let provider = Auth0Provider::new();
        let diagnostics = provider
            .configure(json!({"domain": 42}))
            .await
            .unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(provider.api().await.is_err());
    }

    #[tokio::test]
    async fn test_plan_does_not_need_configuration() {
        let provider = Auth0Provider::new();
        let result = provider
            .plan(
                RESOURCE_TYPE,
                None,
                json!({
                    "name": "s",
                    "type": "segment",
                    "sink": {"segment_write_key": "k"}
                }),
                json!({}),
            )
            .await
            .unwrap();
        assert!(!result.requires_replace);
        assert!(!result.is_empty());
    }
}
