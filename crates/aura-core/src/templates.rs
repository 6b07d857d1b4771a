//! Reusable instance-creation presets
//!
//! Templates live in a JSON document of the form:
//!
//! ```json
//! {
//!   "configurations": [
//!     {
//!       "label": "small-dev",
//!       "name": "dev1",
//!       "cloud_provider": "aws",
//!       "region": "us-east-1",
//!       "memory": "2GB",
//!       "type": "free-db",
//!       "tenant_id": "t1"
//!     }
//!   ]
//! }
//! ```
//!
//! The file is read on every use; there is no cache.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{CloudProvider, CreateInstanceRequest, InstanceType};

/// Aura database version used when a template does not pin one
pub const DEFAULT_INSTANCE_VERSION: &str = "5";

/// Errors raised while loading or using templates
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error(
        "instance configuration file not found at '{path}'. Create this file with your instance configurations or set the INSTANCE_CONFIG_FILE environment variable"
    )]
    FileNotFound { path: String },

    #[error("failed to read instance configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse instance configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no configurations found in file")]
    Empty,

    #[error("duplicate configuration label '{0}'")]
    DuplicateLabel(String),

    #[error("configuration with label '{0}' not found")]
    LabelNotFound(String),

    #[error("{message}")]
    Invalid { label: String, message: String },
}

/// A named preset of instance-creation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTemplate {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default, rename = "type")]
    pub instance_type: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl InstanceTemplate {
    /// Check required fields and enumerated values
    pub fn validate(&self) -> Result<(), TemplateError> {
        let invalid = |message: String| TemplateError::Invalid {
            label: self.label.clone(),
            message,
        };

        if self.label.trim().is_empty() {
            return Err(invalid("label is required".to_string()));
        }

        let required = [
            ("name", &self.name),
            ("cloud_provider", &self.cloud_provider),
            ("region", &self.region),
            ("memory", &self.memory),
            ("type", &self.instance_type),
            ("tenant_id", &self.tenant_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(format!(
                    "{} is required for configuration '{}'",
                    field, self.label
                )));
            }
        }

        self.cloud_provider.parse::<CloudProvider>().map_err(|_| {
            invalid(format!(
                "invalid cloud_provider '{}' in configuration '{}'. Must be one of: {}",
                self.cloud_provider,
                self.label,
                CloudProvider::expected()
            ))
        })?;

        self.instance_type.parse::<InstanceType>().map_err(|_| {
            invalid(format!(
                "invalid type '{}' in configuration '{}'. Must be one of: {}",
                self.instance_type,
                self.label,
                InstanceType::expected()
            ))
        })?;

        Ok(())
    }

    /// Validate and convert into an API create request
    pub fn to_create_request(&self) -> Result<CreateInstanceRequest, TemplateError> {
        self.validate()?;

        let invalid = |message: String| TemplateError::Invalid {
            label: self.label.clone(),
            message,
        };

        Ok(CreateInstanceRequest {
            name: self.name.clone(),
            cloud_provider: self.cloud_provider.parse().map_err(invalid)?,
            region: self.region.clone(),
            memory: self.memory.clone(),
            instance_type: self.instance_type.parse().map_err(invalid)?,
            version: self
                .version
                .clone()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INSTANCE_VERSION.to_string()),
            tenant_id: self.tenant_id.clone(),
        })
    }
}

/// The parsed contents of a template file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStore {
    configurations: Vec<InstanceTemplate>,
}

impl TemplateStore {
    /// Read, parse, and validate the template file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TemplateError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let store = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            count = store.len(),
            "Loaded instance configurations"
        );
        Ok(store)
    }

    /// Parse and validate a template document
    pub fn from_json(content: &str) -> Result<Self, TemplateError> {
        let store: TemplateStore = serde_json::from_str(content)?;
        store.check()?;
        Ok(store)
    }

    fn check(&self) -> Result<(), TemplateError> {
        if self.configurations.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut seen = HashSet::new();
        for template in &self.configurations {
            template.validate()?;
            if !seen.insert(template.label.as_str()) {
                return Err(TemplateError::DuplicateLabel(template.label.clone()));
            }
        }
        Ok(())
    }

    /// Look up a template by its label
    pub fn find_by_label(&self, label: &str) -> Result<&InstanceTemplate, TemplateError> {
        self.configurations
            .iter()
            .find(|t| t.label == label)
            .ok_or_else(|| TemplateError::LabelNotFound(label.to_string()))
    }

    pub fn templates(&self) -> &[InstanceTemplate] {
        &self.configurations
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}
