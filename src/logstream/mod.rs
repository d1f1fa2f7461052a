//! The `auth0_log_stream` resource.
//!
//! Each operation takes the management API as a trait object so the same
//! code runs against [`crate::management::ManagementClient`] and the
//! in-memory fake in [`crate::testing`].

pub mod expand;
pub mod flatten;
pub mod model;
pub mod plan;
pub mod schema;

pub use expand::{expand, ExpandMode};
pub use flatten::flatten;
pub use model::{LogStreamConfig, Sink, SinkBlock, StreamType};
pub use plan::plan;
pub use schema::resource_schema;

use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::management::{LogStream, LogStreamApi};
use crate::schema::Diagnostic;
use crate::types::ImportedResource;
use crate::validation;

/// Resource type name.
pub const RESOURCE_TYPE: &str = "auth0_log_stream";

/// Validate a configuration.
///
/// On top of the schema rules, the sink must hold exactly one provider's
/// settings and that provider must match `type`.
pub fn validate(config: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = validation::validate(&resource_schema(), config);

    let Ok(parsed) = LogStreamConfig::from_value(config.clone()) else {
        return diagnostics;
    };

    let populated = parsed.sink.populated();
    match populated.as_slice() {
        [] => diagnostics.push(
            Diagnostic::error("Empty sink")
                .with_detail("The sink block must configure exactly one provider")
                .with_attribute("sink"),
        ),
        [kind] => {
            if let Ok(stream_type) = parsed.stream_type() {
                if stream_type != *kind {
                    diagnostics.push(
                        Diagnostic::error("Sink does not match type")
                            .with_detail(format!(
                                "The sink configures `{}` but the stream type is `{}`",
                                kind, stream_type
                            ))
                            .with_attribute("sink"),
                    );
                }
            }
        },
        many => {
            let names: Vec<&str> = many.iter().map(StreamType::as_str).collect();
            diagnostics.push(
                Diagnostic::error("Conflicting sink settings")
                    .with_detail(format!(
                        "Only one provider may be configured, found: {}",
                        names.join(", ")
                    ))
                    .with_attribute("sink"),
            );
        },
    }

    diagnostics
}

/// Create a log stream and return its state.
///
/// When the configuration asks for a status other than the one the server
/// assigned, a second status-only update follows the create. A failure there
/// leaves the stream in place and is returned as an error.
#[instrument(skip_all)]
pub async fn create(api: &dyn LogStreamApi, planned_state: Value) -> Result<Value, ProviderError> {
    let config = LogStreamConfig::from_value(planned_state)?;
    let request = expand(&config, ExpandMode::Create)?;

    let created = api.create(&request).await?;
    let id = created.id().to_string();
    if id.is_empty() {
        return Err(ProviderError::FailedPrecondition(
            "management API returned a log stream without an id".to_string(),
        ));
    }
    info!(id = %id, name = %config.name, "Created log stream");

    if let Some(status) = config.status() {
        if status != created.status() {
            debug!(id = %id, from = created.status(), to = status, "Updating log stream status");
            if let Err(err) = api.update(&id, &LogStream::status_only(status)).await {
                error!(id = %id, error = %err, "Log stream created but its status could not be set");
                return Err(err.into());
            }
        }
    }

    let state = LogStreamConfig {
        id: Some(id.clone()),
        ..config
    };
    refresh(api, &state).await?.ok_or_else(|| {
        ProviderError::NotFound(format!("log stream {} vanished after creation", id))
    })
}

/// Refresh a stored state from the API.
///
/// Returns `Ok(None)` when the stream no longer exists or the state carries
/// no id; the caller drops it from its records.
#[instrument(skip_all)]
pub async fn read(api: &dyn LogStreamApi, current_state: Value) -> Result<Option<Value>, ProviderError> {
    let prior = LogStreamConfig::from_value(current_state)?;
    refresh(api, &prior).await
}

/// Apply a planned update and return the new state.
#[instrument(skip_all)]
pub async fn update(
    api: &dyn LogStreamApi,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value, ProviderError> {
    let prior = LogStreamConfig::from_value(prior_state)?;
    let planned = LogStreamConfig::from_value(planned_state)?;

    let Some(id) = prior.id().map(str::to_string) else {
        return Err(ProviderError::FailedPrecondition(
            "cannot update a log stream that has no id".to_string(),
        ));
    };
    if !prior.stream_type.eq_ignore_ascii_case(&planned.stream_type) {
        return Err(ProviderError::FailedPrecondition(format!(
            "type cannot change from `{}` to `{}` in place; the log stream must be replaced",
            prior.stream_type, planned.stream_type
        )));
    }
    let replaced = plan::replacement_changes(&prior, &planned)?;
    if !replaced.is_empty() {
        return Err(ProviderError::FailedPrecondition(format!(
            "{} cannot change in place; the log stream must be replaced",
            replaced.join(", ")
        )));
    }

    let request = expand(&planned, ExpandMode::Update)?;
    api.update(&id, &request).await?;
    info!(id = %id, "Updated log stream");

    let state = LogStreamConfig {
        id: Some(id.clone()),
        ..planned
    };
    refresh(api, &state).await?.ok_or_else(|| {
        ProviderError::NotFound(format!("log stream {} vanished after update", id))
    })
}

/// Delete a log stream. A stream that is already gone counts as deleted.
#[instrument(skip_all)]
pub async fn delete(api: &dyn LogStreamApi, current_state: Value) -> Result<(), ProviderError> {
    let state = LogStreamConfig::from_value(current_state)?;
    let Some(id) = state.id() else {
        debug!("Log stream has no id, nothing to delete");
        return Ok(());
    };

    match api.delete(id).await {
        Ok(()) => {
            info!(id = %id, "Deleted log stream");
            Ok(())
        },
        Err(err) if err.is_not_found() => {
            warn!(id = %id, "Log stream already deleted");
            Ok(())
        },
        Err(err) => Err(err.into()),
    }
}

/// Import an existing log stream by id.
#[instrument(skip(api))]
pub async fn import(api: &dyn LogStreamApi, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
    let state = json!({ "id": id });
    match read(api, state).await? {
        Some(state) => Ok(vec![ImportedResource::new(RESOURCE_TYPE, state)]),
        None => Err(ProviderError::NotFound(format!("log stream {}", id))),
    }
}

async fn refresh(
    api: &dyn LogStreamApi,
    prior: &LogStreamConfig,
) -> Result<Option<Value>, ProviderError> {
    let Some(id) = prior.id() else {
        return Ok(None);
    };

    match api.read(id).await {
        Ok(stream) => {
            debug!(id = %id, status = stream.status(), "Read log stream");
            Ok(Some(flatten(&stream, Some(prior)).to_value()?))
        },
        Err(err) if err.is_not_found() => {
            warn!(id = %id, "Log stream not found, removing it from state");
            Ok(None)
        },
        Err(err) => Err(err.into()),
    }
}
