//! Request and response models for the Aura instances API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cloud providers an instance can run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Gcp,
    Aws,
    Azure,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 3] = [CloudProvider::Gcp, CloudProvider::Aws, CloudProvider::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Gcp => "gcp",
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
        }
    }

    /// Quoted, comma separated list for error messages
    pub fn expected() -> String {
        quoted(Self::ALL.iter().map(|p| p.as_str()))
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Must be one of: {}", Self::expected()))
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aura instance tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceType {
    EnterpriseDb,
    EnterpriseDs,
    ProfessionalDb,
    ProfessionalDs,
    FreeDb,
    BusinessCritical,
}

impl InstanceType {
    pub const ALL: [InstanceType; 6] = [
        InstanceType::EnterpriseDb,
        InstanceType::EnterpriseDs,
        InstanceType::ProfessionalDb,
        InstanceType::ProfessionalDs,
        InstanceType::FreeDb,
        InstanceType::BusinessCritical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::EnterpriseDb => "enterprise-db",
            InstanceType::EnterpriseDs => "enterprise-ds",
            InstanceType::ProfessionalDb => "professional-db",
            InstanceType::ProfessionalDs => "professional-ds",
            InstanceType::FreeDb => "free-db",
            InstanceType::BusinessCritical => "business-critical",
        }
    }

    /// Quoted, comma separated list for error messages
    pub fn expected() -> String {
        quoted(Self::ALL.iter().map(|t| t.as_str()))
    }
}

impl FromStr for InstanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Must be one of: {}", Self::expected()))
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn quoted<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Entry returned by `GET /instances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub tenant_id: String,
}

/// Body of `GET /instances/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_url: Option<String>,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, rename = "type")]
    pub instance_type: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_integration_url: Option<String>,
}

/// Body of `POST /instances`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub cloud_provider: CloudProvider,
    pub region: String,
    pub memory: String,
    #[serde(rename = "type")]
    pub instance_type: InstanceType,
    pub version: String,
    pub tenant_id: String,
}

/// Response to `POST /instances`, including the one-time credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedInstance {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_url: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, rename = "type")]
    pub instance_type: String,
    #[serde(default)]
    pub tenant_id: String,
}

/// Acknowledgement of `DELETE /instances/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
