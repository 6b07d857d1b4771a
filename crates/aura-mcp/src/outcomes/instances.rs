//! Instance lifecycle outcomes: list, inspect, create, delete

use async_trait::async_trait;
use aura_core::templates::DEFAULT_INSTANCE_VERSION;
use aura_core::{CloudProvider, CreateInstanceRequest, InstanceApi, InstanceType};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::error::OutcomeError;
use crate::outcome::{Outcome, OutcomeHandler, OutcomeParameter, OutcomeType};
use crate::params::Parameters;
use crate::state::Dependencies;

pub const LIST_INSTANCES: &str = "list-instances";
pub const GET_INSTANCE_DETAILS: &str = "get-instance-details";
pub const CREATE_INSTANCE: &str = "create-instance";
pub const DELETE_INSTANCE: &str = "delete-instance";

const EMPTY_LIST_MESSAGE: &str =
    "No instances found or user does not have access to any instances.";

const DELETE_NOT_CONFIRMED: &str = "Deletion not confirmed. Set 'confirm' to true to proceed with deletion. WARNING: This action cannot be undone.";

pub fn outcomes() -> Vec<Outcome> {
    vec![
        list_instances(),
        get_instance_details(),
        create_instance(),
        delete_instance(),
    ]
}

// ============================================================================
// Read operations
// ============================================================================

fn list_instances() -> Outcome {
    Outcome::new(LIST_INSTANCES, "List Instances", OutcomeType::List)
        .description(
            "Retrieve a list of all Neo4j Aura database instances. Returns the id, name, \
             creation time, cloud provider and tenant of each instance.",
        )
        .read_only()
        .metadata("category", "instances")
        .handler(ListInstances)
}

pub struct ListInstances;

#[async_trait]
impl OutcomeHandler for ListInstances {
    async fn execute(
        &self,
        _params: &Parameters,
        deps: &Dependencies,
    ) -> Result<Value, OutcomeError> {
        let client = deps.client()?;

        let instances = client
            .list_instances()
            .await
            .map_err(|source| OutcomeError::Upstream {
                action: "list instances",
                source,
            })?;

        let mut result = json!({ "instances": instances, "count": instances.len() });
        if instances.is_empty() {
            result["message"] = json!(EMPTY_LIST_MESSAGE);
        }
        Ok(result)
    }
}

fn get_instance_details() -> Outcome {
    Outcome::new(
        GET_INSTANCE_DETAILS,
        "Get Instance Details",
        OutcomeType::Read,
    )
    .description(
        "Retrieve detailed information about a specific Neo4j Aura database instance. Returns \
         name, status, connection URL, cloud provider, region, memory, storage, type, tenant ID, \
         and the Prometheus metrics endpoint URL for monitoring.",
    )
    .read_only()
    .parameter(OutcomeParameter::required(
        "instance_id",
        "string",
        "The ID of the instance to retrieve details for",
    ))
    .metadata("category", "instances")
    .handler(GetInstanceDetails)
}

pub struct GetInstanceDetails;

#[async_trait]
impl OutcomeHandler for GetInstanceDetails {
    async fn execute(&self, params: &Parameters, deps: &Dependencies) -> Result<Value, OutcomeError> {
        let client = deps.client()?;
        let instance_id = params.require_str("instance_id")?;

        let details = client
            .get_instance(instance_id)
            .await
            .map_err(|e| OutcomeError::instance_lookup(instance_id, "retrieve instance details", e))?;

        Ok(serde_json::to_value(details)?)
    }
}

// ============================================================================
// Write operations
// ============================================================================

fn create_instance() -> Outcome {
    Outcome::new(CREATE_INSTANCE, "Create Instance", OutcomeType::Create)
        .description(
            "Create a new Neo4j Aura database instance with the specified configuration. Returns \
             the created instance details including ID, name, connection URL and the initial \
             credentials. The password is only shown once.",
        )
        .parameter(OutcomeParameter::required(
            "name",
            "string",
            "Name for the new instance",
        ))
        .parameter(OutcomeParameter::required(
            "cloud_provider",
            "string",
            format!("Cloud provider: {}", CloudProvider::expected()),
        ))
        .parameter(OutcomeParameter::required(
            "region",
            "string",
            "Cloud region (e.g., 'us-east-1' for AWS, 'us-central1' for GCP, 'eastus' for Azure)",
        ))
        .parameter(OutcomeParameter::required(
            "memory",
            "string",
            "Memory size for the instance (e.g., '2GB', '8GB', '16GB', '32GB', '64GB')",
        ))
        .parameter(OutcomeParameter::required(
            "type",
            "string",
            format!("Instance type: {}", InstanceType::expected()),
        ))
        .parameter(OutcomeParameter::required(
            "tenantId",
            "string",
            "The id of the project (tenant) that the instance will be created in. 'tenant_id' is also accepted.",
        ))
        .parameter(
            OutcomeParameter::optional("version", "string", "Neo4j version")
                .default_value(DEFAULT_INSTANCE_VERSION),
        )
        .metadata("category", "instances")
        .handler(CreateInstance)
}

pub struct CreateInstance;

#[async_trait]
impl OutcomeHandler for CreateInstance {
    async fn execute(&self, params: &Parameters, deps: &Dependencies) -> Result<Value, OutcomeError> {
        let client = deps.client()?;
        let request = create_request(params)?;
        create(client, &request).await
    }
}

/// Validate `create-instance` parameters into an API request
fn create_request(params: &Parameters) -> Result<CreateInstanceRequest, OutcomeError> {
    let name = params.require_str("name")?;

    let cloud_provider = params.require_str("cloud_provider")?;
    let cloud_provider: CloudProvider = cloud_provider.parse().map_err(|_| {
        OutcomeError::validation(
            "cloud_provider",
            format!(
                "Invalid cloud_provider '{}'. Must be one of: {}",
                cloud_provider,
                CloudProvider::expected()
            ),
        )
    })?;

    let region = params.require_str("region")?;
    let memory = params.require_str("memory")?;

    let instance_type = params.require_str("type")?;
    let instance_type: InstanceType = instance_type.parse().map_err(|_| {
        OutcomeError::validation(
            "type",
            format!(
                "Invalid type '{}'. Must be one of: {}",
                instance_type,
                InstanceType::expected()
            ),
        )
    })?;

    let tenant_id = params.require_str_any(&["tenantId", "tenant_id"])?;
    let version = params
        .optional_str("version")?
        .unwrap_or(DEFAULT_INSTANCE_VERSION);

    Ok(CreateInstanceRequest {
        name: name.to_string(),
        cloud_provider,
        region: region.to_string(),
        memory: memory.to_string(),
        instance_type,
        version: version.to_string(),
        tenant_id: tenant_id.to_string(),
    })
}

/// Result of a successful creation
#[derive(Debug, Serialize)]
struct CreateResult {
    success: bool,
    message: String,
    id: String,
    name: String,
    status: Option<String>,
    cloud_provider: String,
    region: String,
    memory: String,
    #[serde(rename = "type")]
    instance_type: String,
    tenant_id: String,
    connection_url: Option<String>,
    username: String,
    password: String,
}

fn or_requested(returned: String, requested: &str) -> String {
    if returned.is_empty() {
        requested.to_string()
    } else {
        returned
    }
}

/// Creation path shared by `create-instance` and `create-instance-from-config`
pub(crate) async fn create(
    client: &dyn InstanceApi,
    request: &CreateInstanceRequest,
) -> Result<Value, OutcomeError> {
    info!(
        name = %request.name,
        cloud_provider = %request.cloud_provider,
        region = %request.region,
        instance_type = %request.instance_type,
        "Creating instance"
    );

    let created = client
        .create_instance(request)
        .await
        .map_err(|source| OutcomeError::Upstream {
            action: "create instance",
            source,
        })?;

    info!(instance_id = %created.id, "Instance created");

    let result = CreateResult {
        success: true,
        message: "Instance created successfully".to_string(),
        id: created.id,
        name: or_requested(created.name, &request.name),
        status: created.status,
        cloud_provider: or_requested(created.cloud_provider, request.cloud_provider.as_str()),
        region: or_requested(created.region, &request.region),
        memory: created.memory.unwrap_or_else(|| request.memory.clone()),
        instance_type: or_requested(created.instance_type, request.instance_type.as_str()),
        tenant_id: or_requested(created.tenant_id, &request.tenant_id),
        connection_url: created.connection_url,
        username: created.username,
        password: created.password,
    };

    Ok(serde_json::to_value(result)?)
}

fn delete_instance() -> Outcome {
    Outcome::new(DELETE_INSTANCE, "Delete Instance", OutcomeType::Delete)
        .description(
            "Permanently delete a Neo4j Aura database instance. This is a destructive operation \
             that cannot be undone. Requires explicit confirmation via the 'confirm' parameter.",
        )
        .parameter(OutcomeParameter::required(
            "instance_id",
            "string",
            "The ID of the instance to delete",
        ))
        .parameter(OutcomeParameter::required(
            "confirm",
            "boolean",
            "Must be set to true to confirm deletion. This is a safety measure to prevent accidental deletions.",
        ))
        .metadata("category", "instances")
        .metadata("destructive", true)
        .metadata(
            "warning",
            "This operation permanently deletes the instance and all its data. This cannot be undone.",
        )
        .handler(DeleteInstance)
}

pub struct DeleteInstance;

#[async_trait]
impl OutcomeHandler for DeleteInstance {
    async fn execute(&self, params: &Parameters, deps: &Dependencies) -> Result<Value, OutcomeError> {
        let client = deps.client()?;
        let instance_id = params.require_str("instance_id")?;

        if !params.require_bool("confirm")? {
            return Err(OutcomeError::validation("confirm", DELETE_NOT_CONFIRMED));
        }

        // Look up first so the confirmation can name what was deleted
        let instance = client.get_instance(instance_id).await.map_err(|e| {
            OutcomeError::instance_lookup(instance_id, "retrieve instance details before deletion", e)
        })?;

        info!(instance_id, name = %instance.name, "Deleting instance");
        client
            .delete_instance(instance_id)
            .await
            .map_err(|source| OutcomeError::Upstream {
                action: "delete instance",
                source,
            })?;

        Ok(json!({
            "success": true,
            "message": format!(
                "Instance '{}' (ID: {}) has been successfully deleted",
                instance.name, instance_id
            ),
            "deleted_id": instance_id,
            "deleted_name": instance.name,
            "warning": "This instance and all its data have been permanently deleted and cannot be recovered.",
        }))
    }
}
