//! The Outcome record and its handler trait
//!
//! An Outcome is a named, self-describing operation. Callers discover
//! outcomes by id, read their parameter declarations, then execute them
//! through the registry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OutcomeError;
use crate::params::Parameters;
use crate::state::Dependencies;

/// Classification of an outcome; informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeType {
    List,
    Read,
    Create,
    Update,
    Delete,
}

/// Declared parameter of an outcome
///
/// Declarations are advisory. Handlers enforce their own parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl OutcomeParameter {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Executes one outcome against validated dependencies
#[async_trait]
pub trait OutcomeHandler: Send + Sync {
    async fn execute(&self, params: &Parameters, deps: &Dependencies)
    -> Result<Value, OutcomeError>;
}

/// A registered operation
#[derive(Clone, Serialize)]
pub struct Outcome {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub outcome_type: OutcomeType,
    /// Whether the outcome may run while the server is read-only
    #[serde(rename = "readonly")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<OutcomeParameter>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(skip)]
    pub(crate) handler: Option<Arc<dyn OutcomeHandler>>,
}

impl Outcome {
    /// Start building an outcome. Outcomes are mutating unless marked read-only.
    pub fn new(id: impl Into<String>, name: impl Into<String>, outcome_type: OutcomeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            outcome_type,
            read_only: false,
            parameters: Vec::new(),
            metadata: Map::new(),
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn parameter(mut self, parameter: OutcomeParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn handler(mut self, handler: impl OutcomeHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            outcome_type: self.outcome_type,
            read_only: self.read_only,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outcome")
            .field("id", &self.id)
            .field("outcome_type", &self.outcome_type)
            .field("read_only", &self.read_only)
            .field("parameters", &self.parameters.len())
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// Short form returned by discovery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub outcome_type: OutcomeType,
    #[serde(rename = "readonly")]
    pub read_only: bool,
}
