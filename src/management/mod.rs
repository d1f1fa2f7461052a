//! Management API access for log streams.
//!
//! [`LogStreamApi`] is the seam between the resource and the remote API.
//! [`ManagementClient`] implements it over HTTP; tests use
//! [`crate::testing::InMemoryLogStreams`].

pub mod client;
pub mod error;
pub mod model;

use async_trait::async_trait;

pub use client::ManagementClient;
pub use error::ManagementError;
pub use model::{LogStream, Sink};

/// The log-stream operations the resource needs from the management API.
#[async_trait]
pub trait LogStreamApi: Send + Sync {
    /// Create a log stream and return it as stored by the server.
    async fn create(&self, log_stream: &LogStream) -> Result<LogStream, ManagementError>;

    /// Fetch a log stream by id.
    async fn read(&self, id: &str) -> Result<LogStream, ManagementError>;

    /// Patch a log stream and return the updated representation.
    async fn update(&self, id: &str, log_stream: &LogStream) -> Result<LogStream, ManagementError>;

    /// Delete a log stream.
    async fn delete(&self, id: &str) -> Result<(), ManagementError>;
}
