//! Error types for outcome lookup and execution

use aura_core::{ApiError, TemplateError};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors that can occur while describing or executing an outcome
///
/// None of these terminate the process; the front door turns every variant
/// into a structured `{error, message, ...}` payload for the caller.
#[derive(Error, Debug)]
pub enum OutcomeError {
    /// No outcome is registered under the requested id
    #[error("Outcome with ID '{0}' not found")]
    OutcomeNotFound(String),

    /// The template file has no configuration with the requested label
    #[error("Configuration with label '{0}' not found")]
    TemplateNotFound(String),

    /// The Aura API reported the instance as missing
    #[error(
        "Instance '{id}' not found: {source}. The instance may not exist or you may not have access to it."
    )]
    InstanceNotFound {
        id: String,
        #[source]
        source: ApiError,
    },

    /// A parameter was missing, of the wrong type, or out of range
    #[error("{message}")]
    Validation { parameter: String, message: String },

    /// A mutating outcome was requested while the server is read-only
    #[error(
        "Cannot execute '{0}' Outcome: server is in read-only mode. Write operations are disabled. Set READ_ONLY=false to enable write operations."
    )]
    ReadOnlyModeViolation(String),

    /// The outcome was registered without a handler
    #[error("No handler registered for Outcome: {0}")]
    HandlerMissing(String),

    /// The Aura API client could not be built at startup
    #[error("Aura API client is not initialized. Check CLIENT_ID and CLIENT_SECRET")]
    ClientUnavailable,

    /// Any other failure reported by the Aura API
    #[error("Failed to {action}: {source}")]
    Upstream {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    /// The template file is missing, unreadable, malformed, or invalid
    #[error(transparent)]
    Template(TemplateError),

    /// The result could not be converted to JSON
    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two outcomes were registered under the same id
    #[error("Duplicate Outcome ID '{0}'")]
    DuplicateOutcome(String),
}

impl From<TemplateError> for OutcomeError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::LabelNotFound(label) => OutcomeError::TemplateNotFound(label),
            other => OutcomeError::Template(other),
        }
    }
}

impl OutcomeError {
    /// Build a validation error for `parameter`
    pub fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        OutcomeError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Classify an API failure for a single instance lookup
    pub fn instance_lookup(id: &str, action: &'static str, source: ApiError) -> Self {
        if source.is_not_found() {
            OutcomeError::InstanceNotFound {
                id: id.to_string(),
                source,
            }
        } else {
            OutcomeError::Upstream { action, source }
        }
    }

    /// Returns true for any of the "not found" variants
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OutcomeError::OutcomeNotFound(_)
                | OutcomeError::TemplateNotFound(_)
                | OutcomeError::InstanceNotFound { .. }
        )
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            OutcomeError::OutcomeNotFound(_) => "outcome_not_found",
            OutcomeError::TemplateNotFound(_) => "template_not_found",
            OutcomeError::InstanceNotFound { .. } => "instance_not_found",
            OutcomeError::Validation { .. } => "validation_error",
            OutcomeError::ReadOnlyModeViolation(_) => "read_only_mode",
            OutcomeError::HandlerMissing(_) => "handler_missing",
            OutcomeError::ClientUnavailable => "client_unavailable",
            OutcomeError::Upstream { .. } => "upstream_error",
            OutcomeError::Template(_) => "template_error",
            OutcomeError::Serialization(_) => "serialization_error",
            OutcomeError::DuplicateOutcome(_) => "duplicate_outcome",
        }
    }

    /// Structured payload returned to the caller
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        match self {
            OutcomeError::OutcomeNotFound(id)
            | OutcomeError::ReadOnlyModeViolation(id)
            | OutcomeError::HandlerMissing(id)
            | OutcomeError::DuplicateOutcome(id) => {
                payload["outcome_id"] = json!(id);
            }
            OutcomeError::TemplateNotFound(label) => {
                payload["label"] = json!(label);
            }
            OutcomeError::InstanceNotFound { id, .. } => {
                payload["instance_id"] = json!(id);
            }
            OutcomeError::Validation { parameter, .. } => {
                payload["parameter"] = json!(parameter);
            }
            OutcomeError::Upstream { source, .. } => {
                payload["retryable"] = json!(source.is_retryable());
            }
            _ => {}
        }

        payload
    }
}
