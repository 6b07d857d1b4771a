//! Aura API client
//!
//! [`InstanceApi`] is the capability the outcome handlers consume. The
//! production implementation is [`AuraClient`]; tests substitute stubs.

mod http;
mod types;

pub use http::{AuraClient, AuraClientBuilder};
pub use types::{
    CloudProvider, CreateInstanceRequest, CreatedInstance, DeletedInstance, InstanceDetails,
    InstanceSummary, InstanceType,
};

use async_trait::async_trait;

use crate::error::Result;

/// Instance lifecycle operations exposed by the Aura API
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// List every instance visible to the credentials
    async fn list_instances(&self) -> Result<Vec<InstanceSummary>>;

    /// Fetch full details of one instance
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetails>;

    /// Create an instance. The response carries the initial credentials.
    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance>;

    /// Delete an instance
    async fn delete_instance(&self, instance_id: &str) -> Result<DeletedInstance>;
}
