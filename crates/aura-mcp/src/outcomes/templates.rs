//! Outcomes backed by the instance configuration file

use async_trait::async_trait;
use aura_core::TemplateStore;
use serde_json::{Value, json};
use tracing::debug;

use super::instances::create;
use crate::error::OutcomeError;
use crate::outcome::{Outcome, OutcomeHandler, OutcomeParameter, OutcomeType};
use crate::params::Parameters;
use crate::state::Dependencies;

pub const CREATE_INSTANCE_FROM_CONFIG: &str = "create-instance-from-config";
pub const LIST_INSTANCE_CONFIGS: &str = "list-instance-configs";

pub fn outcomes() -> Vec<Outcome> {
    vec![create_instance_from_config(), list_instance_configs()]
}

fn load_store(deps: &Dependencies) -> Result<TemplateStore, OutcomeError> {
    let path = &deps.config().instance_config_file;
    debug!(path = %path.display(), "Loading instance configurations");
    Ok(TemplateStore::load(path)?)
}

fn create_instance_from_config() -> Outcome {
    Outcome::new(
        CREATE_INSTANCE_FROM_CONFIG,
        "Create Instance From Configuration",
        OutcomeType::Create,
    )
    .description(
        "Create a new Neo4j Aura database instance from a named configuration in the instance \
         configuration file. Use list-instance-configs to see the available labels.",
    )
    .parameter(OutcomeParameter::required(
        "label",
        "string",
        "Label of the configuration to use",
    ))
    .parameter(OutcomeParameter::optional(
        "name",
        "string",
        "Overrides the instance name from the configuration",
    ))
    .metadata("category", "instances")
    .handler(CreateInstanceFromConfig)
}

pub struct CreateInstanceFromConfig;

#[async_trait]
impl OutcomeHandler for CreateInstanceFromConfig {
    async fn execute(&self, params: &Parameters, deps: &Dependencies) -> Result<Value, OutcomeError> {
        let client = deps.client()?;
        let label = params.require_str("label")?;
        let name = params.optional_str("name")?;

        let store = load_store(deps)?;
        let template = store.find_by_label(label)?;
        let mut request = template.to_create_request()?;
        if let Some(name) = name {
            request.name = name.to_string();
        }

        let mut result = create(client, &request).await?;
        result["configuration"] = json!(label);
        Ok(result)
    }
}

fn list_instance_configs() -> Outcome {
    Outcome::new(
        LIST_INSTANCE_CONFIGS,
        "List Instance Configurations",
        OutcomeType::List,
    )
    .description(
        "List the named instance configurations available to create-instance-from-config, \
         with their cloud provider, region, memory, type and tenant.",
    )
    .read_only()
    .metadata("category", "configurations")
    .handler(ListInstanceConfigs)
}

pub struct ListInstanceConfigs;

#[async_trait]
impl OutcomeHandler for ListInstanceConfigs {
    async fn execute(
        &self,
        _params: &Parameters,
        deps: &Dependencies,
    ) -> Result<Value, OutcomeError> {
        deps.client()?;
        let store = load_store(deps)?;
        Ok(json!({
            "configurations": store.templates(),
            "count": store.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_flags() {
        assert!(!create_instance_from_config().read_only);
        assert!(list_instance_configs().read_only);
        assert!(list_instance_configs().parameters.is_empty());
    }
}
