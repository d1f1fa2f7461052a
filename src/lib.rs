//! Auth0 Log Stream Provider
//!
//! This crate manages Auth0 log streams as declarative resources. It maps
//! the `auth0_log_stream` attribute bag to the management API's
//! `/api/v2/log-streams` endpoints and back.
//!
//! # Overview
//!
//! - **Schema types**: Describe the provider block and the resource ([`schema`])
//! - **ProviderService trait**: The lifecycle a host drives ([`ProviderService`])
//! - **Auth0Provider**: The provider implementation ([`Auth0Provider`])
//! - **Field mapping**: Config to request and response to state ([`logstream`])
//! - **Management client**: HTTP access to the log-stream endpoints ([`management`])
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use auth0_log_stream_provider::{Auth0Provider, ProviderService, RESOURCE_TYPE};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     auth0_log_stream_provider::init_logging();
//!
//!     let provider = Auth0Provider::new();
//!     provider
//!         .configure(json!({"domain": "example.us.auth0.com", "api_token": "..."}))
//!         .await?;
//!
//!     let config = json!({
//!         "name": "audit",
//!         "type": "http",
//!         "sink": {
//!             "http_endpoint": "https://logs.example.com",
//!             "http_content_format": "JSONLINES",
//!             "http_content_type": "application/json",
//!             "http_authorization": "Bearer secret"
//!         }
//!     });
//!     let plan = provider.plan(RESOURCE_TYPE, None, config.clone(), config).await?;
//!     let state = provider.create(RESOURCE_TYPE, plan.planned_state).await?;
//!     println!("created {}", state["id"]);
//!     Ok(())
//! }
//! ```
//!
//! # Lifecycle
//!
//! - **Create**: sends the stream without a status, then patches the status
//!   when the configured one differs from what the server assigned
//! - **Read**: a stream that no longer exists reads as `None`
//! - **Update**: patches name, status, filters and mutable sinks
//! - **Delete**: a stream that is already gone counts as deleted
//! - **Import**: reads the stream with the given id

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod logging;
pub mod logstream;
pub mod management;
pub mod provider;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use logstream::RESOURCE_TYPE;
pub use management::{LogStreamApi, ManagementClient, ManagementError};
pub use provider::Auth0Provider;
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
