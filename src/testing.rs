//! Test support: a lifecycle harness and an in-memory management API.
//!
//! [`InMemoryLogStreams`] behaves like the `/api/v2/log-streams` endpoints
//! closely enough to drive the resource end to end: ids are assigned on
//! create, status defaults to `active`, secrets are never echoed back and
//! unknown ids answer 404.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use auth0_log_stream_provider::testing::{InMemoryLogStreams, ProviderTester};
//! use auth0_log_stream_provider::Auth0Provider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn creates_a_stream() {
//!     let api = Arc::new(InMemoryLogStreams::new());
//!     let tester = ProviderTester::new(Auth0Provider::with_api(api.clone()));
//!
//!     let state = tester
//!         .lifecycle_create("auth0_log_stream", json!({
//!             "name": "events",
//!             "type": "segment",
//!             "sink": {"segment_write_key": "key"}
//!         }))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(state["status"], "active");
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::ProviderError;
use crate::management::{LogStream, LogStreamApi, ManagementError, Sink};
use crate::schema::{has_errors, Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// Drives a [`ProviderService`] through plan and apply the way a host would.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Resource type names served by the provider.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Validate provider configuration; error diagnostics become `Err`.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        check_diagnostics(self.provider.validate_provider_config(config).await?)
    }

    /// Configure the provider; error diagnostics become `Err`.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        check_diagnostics(self.provider.configure(config).await?)
    }

    /// Validate a resource configuration; error diagnostics become `Err`.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        check_diagnostics(
            self.provider
                .validate_resource_config(resource_type, config)
                .await?,
        )
    }

    /// Plan a create.
    pub async fn plan_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, config.clone(), config)
            .await
    }

    /// Plan an update of `prior_state` towards `config`.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), config.clone(), config)
            .await
    }

    /// Plan a destroy.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a resource from a planned state.
    pub async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read a resource; `None` when it is gone.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update a resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import a resource by id.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Plan, create, then read back. Returns the state after the read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self.plan_create(resource_type, config).await?;
        let created = self.create(resource_type, plan.planned_state).await?;
        self.read_existing(resource_type, created).await
    }

    /// Plan, update, then read back. Returns the state after the read.
    ///
    /// A plan that requires replacement is an error here; replacement is a
    /// delete followed by a create and has to be driven explicitly.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self
            .plan_update(resource_type, prior_state.clone(), config)
            .await?;
        if plan.requires_replace {
            return Err(ProviderError::FailedPrecondition(
                "plan requires replacement".to_string(),
            ));
        }
        let updated = self
            .update(resource_type, prior_state, plan.planned_state)
            .await?;
        self.read_existing(resource_type, updated).await
    }

    /// Plan a destroy, then delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.plan_delete(resource_type, current_state.clone())
            .await?;
        self.delete(resource_type, current_state).await
    }

    /// Create, update and delete in turn. Returns the state after the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created = self.lifecycle_create(resource_type, initial_config).await?;
        let updated = self
            .lifecycle_update(resource_type, created, updated_config)
            .await?;
        self.lifecycle_delete(resource_type, updated.clone()).await?;
        Ok(updated)
    }

    async fn read_existing(&self, resource_type: &str, state: Value) -> Result<Value, ProviderError> {
        let id = state.get("id").cloned().unwrap_or(Value::Null);
        self.read(resource_type, state)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("{} {}", resource_type, id)))
    }
}

/// Failure of a harness call that reports diagnostics.
#[derive(Debug, Error)]
pub enum TestError {
    /// The call returned error diagnostics.
    #[error("{}", describe_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),
    /// The call itself failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TestError {
    /// The error diagnostics, if any.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            TestError::Diagnostics(diagnostics) => diagnostics,
            TestError::Provider(_) => &[],
        }
    }
}

fn describe_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("{} error diagnostic(s):", diagnostics.len());
    for diag in diagnostics {
        out.push_str("\n  ");
        out.push_str(&diag.summary);
        if let Some(detail) = &diag.detail {
            out.push_str(": ");
            out.push_str(detail);
        }
        if let Some(attribute) = &diag.attribute {
            out.push_str(&format!(" (at {})", attribute));
        }
    }
    out
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    if has_errors(&diagnostics) {
        Err(TestError::Diagnostics(
            diagnostics.into_iter().filter(Diagnostic::is_error).collect(),
        ))
    } else {
        Ok(())
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

fn changed_paths(plan: &PlanResult) -> Vec<&str> {
    plan.changes.iter().map(|c| c.path.as_str()).collect()
}

/// Assert that a plan creates a resource without replacing anything.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(!plan.is_empty(), "expected a create plan, got no changes");
    assert!(!plan.requires_replace, "expected a create plan, got a replacement");
}

/// Assert that a plan changes nothing.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.is_empty(),
        "expected no changes, got {:?}",
        changed_paths(plan)
    );
}

/// Assert that a plan requires replacement.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "expected a replacement, changes were {:?}",
        changed_paths(plan)
    );
}

/// Assert that a plan updates in place.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(!plan.is_empty(), "expected an update, got no changes");
    assert!(
        !plan.requires_replace,
        "expected an in-place update, changes were {:?}",
        changed_paths(plan)
    );
}

/// Assert that a plan touches `path`.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    assert!(
        plan.changes.iter().any(|c| c.path == path),
        "expected a change to '{}', changes were {:?}",
        path,
        changed_paths(plan)
    );
}

/// Assert that a plan leaves `path` alone.
pub fn assert_plan_does_not_change_attribute(plan: &PlanResult, path: &str) {
    assert!(
        plan.changes.iter().all(|c| c.path != path),
        "expected no change to '{}'",
        path
    );
}

/// Assert that no diagnostic is an error.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.summary.as_str())
        .collect();
    assert!(errors.is_empty(), "expected no errors, got {:?}", errors);
}

/// Assert that some error diagnostic's summary or detail contains `needle`.
pub fn assert_error_contains(diagnostics: &[Diagnostic], needle: &str) {
    let found = diagnostics.iter().filter(|d| d.is_error()).any(|d| {
        d.summary.contains(needle) || d.detail.as_deref().is_some_and(|detail| detail.contains(needle))
    });
    assert!(
        found,
        "expected an error mentioning '{}', got {:?}",
        needle,
        diagnostics
    );
}

// =========================================================================
// In-memory management API
// =========================================================================

/// Which endpoint a recorded call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// `POST /log-streams`
    Create,
    /// `GET /log-streams/{id}`
    Read,
    /// `PATCH /log-streams/{id}`
    Update,
    /// `DELETE /log-streams/{id}`
    Delete,
}

/// A call received by [`InMemoryLogStreams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    /// The endpoint.
    pub operation: ApiOperation,
    /// The id in the path, empty for creates.
    pub id: String,
    /// The request body for creates and updates.
    pub body: Option<LogStream>,
}

#[derive(Default)]
struct State {
    streams: BTreeMap<String, LogStream>,
    calls: Vec<ApiCall>,
    failures: Vec<(ApiOperation, u16)>,
    next_id: u64,
}

/// An in-memory stand-in for the log-stream endpoints.
#[derive(Default)]
pub struct InMemoryLogStreams {
    state: Mutex<State>,
}

impl InMemoryLogStreams {
    /// An empty tenant.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls to one endpoint.
    pub fn calls_to(&self, operation: ApiOperation) -> Vec<ApiCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    /// The stored stream, secrets included.
    pub fn stored(&self, id: &str) -> Option<LogStream> {
        self.lock().streams.get(id).cloned()
    }

    /// Number of stored streams.
    pub fn len(&self) -> usize {
        self.lock().streams.len()
    }

    /// Whether the tenant has no streams.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a stream directly, bypassing the API.
    pub fn insert(&self, stream: LogStream) {
        let id = stream.id().to_string();
        self.lock().streams.insert(id, stream);
    }

    /// Remove a stream out of band, as another client would.
    pub fn remove(&self, id: &str) -> Option<LogStream> {
        self.lock().streams.remove(id)
    }

    /// Make the next call to `operation` fail with `status`.
    pub fn fail_next(&self, operation: ApiOperation, status: u16) {
        self.lock().failures.push((operation, status));
    }

    fn begin(
        &self,
        operation: ApiOperation,
        id: &str,
        body: Option<&LogStream>,
    ) -> Result<MutexGuard<'_, State>, ManagementError> {
        let mut state = self.lock();
        state.calls.push(ApiCall {
            operation,
            id: id.to_string(),
            body: body.cloned(),
        });
        if let Some(pos) = state.failures.iter().position(|(op, _)| *op == operation) {
            let (_, status) = state.failures.remove(pos);
            return Err(ManagementError::status(status, "Injected", "injected failure"));
        }
        Ok(state)
    }
}

#[async_trait]
impl LogStreamApi for InMemoryLogStreams {
    async fn create(&self, log_stream: &LogStream) -> Result<LogStream, ManagementError> {
        let mut state = self.begin(ApiOperation::Create, "", Some(log_stream))?;
        if log_stream.status.is_some() {
            return Err(ManagementError::status(400, "Bad Request", "status cannot be set on create"));
        }

        state.next_id += 1;
        let id = format!("lst_{:016}", state.next_id);
        let mut stored = log_stream.clone();
        stored.id = Some(id.clone());
        stored.status = Some("active".to_string());
        if let Some(sink) = stored.sink.as_mut() {
            fill_partner_names(&id, stored.stream_type.as_deref(), sink);
        }
        state.streams.insert(id, stored.clone());
        Ok(masked(stored))
    }

    async fn read(&self, id: &str) -> Result<LogStream, ManagementError> {
        let state = self.begin(ApiOperation::Read, id, None)?;
        state
            .streams
            .get(id)
            .cloned()
            .map(masked)
            .ok_or_else(|| ManagementError::not_found(id))
    }

    async fn update(&self, id: &str, log_stream: &LogStream) -> Result<LogStream, ManagementError> {
        let mut state = self.begin(ApiOperation::Update, id, Some(log_stream))?;
        if log_stream.stream_type.is_some() {
            return Err(ManagementError::status(400, "Bad Request", "type cannot be updated"));
        }
        let stored = state
            .streams
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found(id))?;

        if let Some(name) = &log_stream.name {
            stored.name = Some(name.clone());
        }
        if let Some(status) = &log_stream.status {
            stored.status = Some(status.clone());
        }
        if let Some(filters) = &log_stream.filters {
            stored.filters = Some(filters.clone());
        }
        if let Some(sink) = &log_stream.sink {
            let partner = stored.sink.take().unwrap_or_default();
            let mut replacement = sink.clone();
            replacement.aws_partner_event_source = partner.aws_partner_event_source;
            replacement.azure_partner_topic = partner.azure_partner_topic;
            stored.sink = Some(replacement);
        }
        Ok(masked(stored.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), ManagementError> {
        let mut state = self.begin(ApiOperation::Delete, id, None)?;
        state
            .streams
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ManagementError::not_found(id))
    }
}

fn fill_partner_names(id: &str, stream_type: Option<&str>, sink: &mut Sink) {
    match stream_type {
        Some("eventbridge") => {
            sink.aws_partner_event_source
                .get_or_insert_with(|| format!("aws.partner/auth0.com/{}/auth0.logs", id));
        },
        Some("eventgrid") => {
            sink.azure_partner_topic
                .get_or_insert_with(|| format!("auth0-logs-{}", id));
        },
        _ => {},
    }
}

/// Strip the fields the API never returns.
fn masked(mut stream: LogStream) -> LogStream {
    if let Some(sink) = stream.sink.as_mut() {
        sink.http_authorization = None;
        sink.datadog_api_key = None;
        sink.splunk_token = None;
        sink.mixpanel_service_account_password = None;
        sink.segment_write_key = None;
    }
    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    fn segment_stream() -> LogStream {
        LogStream {
            name: Some("events".to_string()),
            stream_type: Some("segment".to_string()),
            sink: Some(Sink {
                segment_write_key: Some("secret".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fake_assigns_ids_and_masks_secrets() {
        let api = InMemoryLogStreams::new();
        let created = api.create(&segment_stream()).await.unwrap();

        assert_eq!(created.id(), "lst_0000000000000001");
        assert_eq!(created.status(), "active");
        assert!(created.sink.unwrap().segment_write_key.is_none());

        let stored = api.stored("lst_0000000000000001").unwrap();
        assert_eq!(stored.sink.unwrap().segment_write_key.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_fake_rejects_status_on_create_and_type_on_update() {
        let api = InMemoryLogStreams::new();
        let mut request = segment_stream();
        request.status = Some("paused".to_string());
        let err = api.create(&request).await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));

        let created = api.create(&segment_stream()).await.unwrap();
        let err = api.update(created.id(), &segment_stream()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn test_fake_missing_ids_are_not_found() {
        let api = InMemoryLogStreams::new();
        assert!(api.read("lst_x").await.unwrap_err().is_not_found());
        assert!(api.delete("lst_x").await.unwrap_err().is_not_found());
        assert!(api
            .update("lst_x", &LogStream::status_only("paused"))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_fake_injected_failure_applies_once() {
        let api = InMemoryLogStreams::new();
        api.fail_next(ApiOperation::Create, 503);

        let err = api.create(&segment_stream()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(api.create(&segment_stream()).await.is_ok());
        assert_eq!(api.calls_to(ApiOperation::Create).len(), 2);
        assert_eq!(api.len(), 1);
    }

    #[tokio::test]
    async fn test_fake_generates_partner_event_source() {
        let api = InMemoryLogStreams::new();
        let request = LogStream {
            name: Some("bridge".to_string()),
            stream_type: Some("eventbridge".to_string()),
            sink: Some(Sink {
                aws_account_id: Some("999999999999".to_string()),
                aws_region: Some("us-west-2".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created = api.create(&request).await.unwrap();
        assert_eq!(
            created.sink.unwrap().aws_partner_event_source.as_deref(),
            Some("aws.partner/auth0.com/lst_0000000000000001/auth0.logs")
        );
    }

    #[test]
    fn test_check_diagnostics_ignores_warnings() {
        assert!(check_diagnostics(vec![Diagnostic::warning("deprecated")]).is_ok());

        let err = check_diagnostics(vec![
            Diagnostic::warning("deprecated"),
            Diagnostic::error("Missing domain").with_attribute("domain"),
        ])
        .unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].severity, DiagnosticSeverity::Error);
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("sink.datadog_region"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = err.to_string();
        assert!(display.starts_with("2 error diagnostic(s):"));
        assert!(display.contains("First error (at sink.datadog_region)"));
        assert!(display.contains("Second error: More info"));
    }

    #[test]
    fn test_assert_error_contains_checks_detail() {
        let diagnostics = vec![Diagnostic::error("Invalid value").with_detail("expected `us`")];
        assert_error_contains(&diagnostics, "Invalid");
        assert_error_contains(&diagnostics, "expected `us`");
    }

    #[test]
    #[should_panic(expected = "expected no errors")]
    fn test_assert_no_errors_fails() {
        assert_no_errors(&[Diagnostic::error("An error")]);
    }
}
