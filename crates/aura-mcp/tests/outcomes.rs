//! Integration tests for outcome dispatch using stub Aura clients

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use aura_core::{
    ApiError, Config, CreateInstanceRequest, CreatedInstance, DeletedInstance, InstanceApi,
    InstanceDetails, InstanceSummary,
};
use aura_mcp::{Dependencies, OutcomeError, OutcomeRegistry, tools};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower_mcp::Tool;

// ============================================================================
// Stub client
// ============================================================================

/// Counts every call and echoes create requests back
#[derive(Default)]
struct SpyClient {
    instances: Vec<InstanceSummary>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl SpyClient {
    fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.get_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceApi for SpyClient {
    async fn list_instances(&self) -> aura_core::Result<Vec<InstanceSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instances.clone())
    }

    async fn get_instance(&self, instance_id: &str) -> aura_core::Result<InstanceDetails> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if instance_id == "missing" {
            return Err(ApiError::NotFound {
                message: format!("Instance {} not found", instance_id),
            });
        }
        Ok(InstanceDetails {
            id: instance_id.to_string(),
            name: "Production".to_string(),
            status: "running".to_string(),
            connection_url: Some(format!("neo4j+s://{}.databases.neo4j.io", instance_id)),
            cloud_provider: "gcp".to_string(),
            region: "europe-west1".to_string(),
            memory: "8GB".to_string(),
            storage: Some("16GB".to_string()),
            instance_type: "professional-db".to_string(),
            tenant_id: "t1".to_string(),
            metrics_integration_url: None,
        })
    }

    async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> aura_core::Result<CreatedInstance> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedInstance {
            id: format!("new-{}", n + 1),
            name: request.name.clone(),
            status: Some("creating".to_string()),
            connection_url: Some("neo4j+s://new.databases.neo4j.io".to_string()),
            username: "neo4j".to_string(),
            password: "generated".to_string(),
            cloud_provider: request.cloud_provider.to_string(),
            region: request.region.clone(),
            memory: Some(request.memory.clone()),
            instance_type: request.instance_type.to_string(),
            tenant_id: request.tenant_id.clone(),
        })
    }

    async fn delete_instance(&self, instance_id: &str) -> aura_core::Result<DeletedInstance> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(DeletedInstance {
            id: instance_id.to_string(),
            name: None,
            status: Some("destroying".to_string()),
        })
    }
}

fn deps_with(spy: Arc<SpyClient>, config: Config) -> Dependencies {
    let client: Arc<dyn InstanceApi> = spy;
    Dependencies::new(Some(client), config, OutcomeRegistry::build().unwrap())
}

fn writable() -> Config {
    Config {
        read_only: false,
        ..Config::default()
    }
}

fn write_templates(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("instance_configs.json");
    fs::write(
        &path,
        r#"{
  "configurations": [
    {
      "label": "small-dev",
      "name": "dev1",
      "cloud_provider": "aws",
      "region": "us-east-1",
      "memory": "2GB",
      "type": "free-db",
      "tenant_id": "t1"
    }
  ]
}"#,
    )
    .unwrap();
    path
}

// ============================================================================
// Registry properties
// ============================================================================

#[test]
fn describe_returns_requested_id_for_every_outcome() {
    let deps = deps_with(Arc::new(SpyClient::default()), Config::default());
    let summaries = deps.registry().summaries();

    assert_eq!(summaries.len(), deps.registry().len());
    for summary in &summaries {
        let details = tools::describe(&deps, &summary.id).unwrap();
        assert_eq!(details["id"], summary.id.as_str());
        assert_eq!(details["readonly"], summary.read_only);
    }

    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "create-instance",
            "create-instance-from-config",
            "delete-instance",
            "get-instance-details",
            "list-instance-configs",
            "list-instances",
        ]
    );
}

#[tokio::test]
async fn write_outcomes_blocked_in_read_only_mode() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), Config::default());

    for (id, params) in [
        ("create-instance", json!({"name": "db1"})),
        ("create-instance-from-config", json!({"label": "small-dev"})),
        ("delete-instance", json!({"instance_id": "abc", "confirm": true})),
    ] {
        let err = tools::execute(&deps, id, params).await.unwrap_err();
        assert!(
            matches!(err, OutcomeError::ReadOnlyModeViolation(ref got) if got == id),
            "expected read-only violation for {}, got {:?}",
            id,
            err
        );
    }

    assert_eq!(spy.total_calls(), 0);
}

// ============================================================================
// Read outcomes
// ============================================================================

#[tokio::test]
async fn list_instances_reports_count() {
    let spy = Arc::new(SpyClient {
        instances: vec![InstanceSummary {
            id: "a1".to_string(),
            name: "Production".to_string(),
            created: Some("2025-01-01T00:00:00Z".to_string()),
            cloud_provider: "gcp".to_string(),
            tenant_id: "t1".to_string(),
        }],
        ..SpyClient::default()
    });
    let deps = deps_with(spy.clone(), Config::default());

    let result = tools::execute(&deps, "list-instances", json!({})).await.unwrap();

    assert_eq!(result["count"], 1);
    assert_eq!(result["instances"][0]["created"], "2025-01-01T00:00:00Z");
    assert!(result.get("message").is_none());
    assert_eq!(spy.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn list_instances_empty_has_message() {
    let deps = deps_with(Arc::new(SpyClient::default()), Config::default());

    let result = tools::execute(&deps, "list-instances", Value::Null).await.unwrap();

    assert_eq!(result["count"], 0);
    assert_eq!(
        result["message"],
        "No instances found or user does not have access to any instances."
    );
}

#[tokio::test]
async fn get_instance_details_requires_instance_id() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), Config::default());

    let err = tools::execute(&deps, "get-instance-details", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, OutcomeError::Validation { ref parameter, .. } if parameter == "instance_id"));
    assert!(err.to_string().contains("instance_id"));
    assert_eq!(spy.total_calls(), 0);
}

#[tokio::test]
async fn get_instance_details_not_found() {
    let deps = deps_with(Arc::new(SpyClient::default()), Config::default());

    let err = tools::execute(&deps, "get-instance-details", json!({"instance_id": "missing"}))
        .await
        .unwrap_err();

    assert!(matches!(err, OutcomeError::InstanceNotFound { ref id, .. } if id == "missing"));
    assert_eq!(err.payload()["instance_id"], "missing");
}

#[tokio::test]
async fn list_instance_configs_reads_file() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        instance_config_file: write_templates(&dir),
        ..Config::default()
    };
    let deps = deps_with(Arc::new(SpyClient::default()), config);

    let result = tools::execute(&deps, "list-instance-configs", json!({}))
        .await
        .unwrap();

    assert_eq!(result["count"], 1);
    assert_eq!(result["configurations"][0]["label"], "small-dev");
    assert_eq!(result["configurations"][0]["type"], "free-db");
}

#[tokio::test]
async fn list_instance_configs_missing_file() {
    let config = Config {
        instance_config_file: PathBuf::from("/tmp/aura-mcp-test-nonexistent/configs.json"),
        ..Config::default()
    };
    let deps = deps_with(Arc::new(SpyClient::default()), config);

    let err = tools::execute(&deps, "list-instance-configs", json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "template_error");
}

// ============================================================================
// Write outcomes
// ============================================================================

#[tokio::test]
async fn create_instance_echoes_stub() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), writable());

    let result = tools::execute(
        &deps,
        "create-instance",
        json!({
            "name": "db1",
            "cloud_provider": "aws",
            "region": "us-east-1",
            "memory": "8GB",
            "type": "professional-db",
            "tenantId": "t1"
        }),
    )
    .await
    .unwrap();

    assert_eq!(result["success"], true);
    assert_eq!(result["id"], "new-1");
    assert_eq!(result["name"], "db1");
    assert_eq!(result["type"], "professional-db");
    assert_eq!(result["password"], "generated");
    assert_eq!(spy.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_instance_invalid_type_makes_no_call() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), writable());

    let err = tools::execute(
        &deps,
        "create-instance",
        json!({
            "name": "db1",
            "cloud_provider": "aws",
            "region": "us-east-1",
            "memory": "8GB",
            "type": "free",
            "tenantId": "t1"
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OutcomeError::Validation { ref parameter, .. } if parameter == "type"));
    assert_eq!(spy.total_calls(), 0);
}

#[tokio::test]
async fn create_from_config_applies_template_and_override() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        instance_config_file: write_templates(&dir),
        ..writable()
    };
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), config);

    let result = tools::execute(
        &deps,
        "create-instance-from-config",
        json!({"label": "small-dev", "name": "renamed"}),
    )
    .await
    .unwrap();

    assert_eq!(result["success"], true);
    assert_eq!(result["name"], "renamed");
    assert_eq!(result["cloud_provider"], "aws");
    assert_eq!(result["type"], "free-db");
    assert_eq!(result["configuration"], "small-dev");
    assert_eq!(spy.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_from_config_unknown_label() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        instance_config_file: write_templates(&dir),
        ..writable()
    };
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), config);

    let err = tools::execute(
        &deps,
        "create-instance-from-config",
        json!({"label": "large-prod"}),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OutcomeError::TemplateNotFound(ref label) if label == "large-prod"));
    assert_eq!(spy.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_without_confirmation_never_deletes() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), writable());

    for params in [
        json!({"instance_id": "abc"}),
        json!({"instance_id": "abc", "confirm": false}),
        json!({"instance_id": "abc", "confirm": "true"}),
    ] {
        let err = tools::execute(&deps, "delete-instance", params)
            .await
            .unwrap_err();
        assert!(matches!(err, OutcomeError::Validation { ref parameter, .. } if parameter == "confirm"));
    }

    assert_eq!(spy.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_confirmed() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), writable());

    let result = tools::execute(
        &deps,
        "delete-instance",
        json!({"instance_id": "abc", "confirm": true}),
    )
    .await
    .unwrap();

    assert_eq!(result["success"], true);
    assert_eq!(result["deleted_id"], "abc");
    assert_eq!(result["deleted_name"], "Production");
    assert_eq!(spy.get_calls.load(Ordering::SeqCst), 1);
    assert_eq!(spy.delete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delete_missing_instance_skips_delete() {
    let spy = Arc::new(SpyClient::default());
    let deps = deps_with(spy.clone(), writable());

    let err = tools::execute(
        &deps,
        "delete-instance",
        json!({"instance_id": "missing", "confirm": true}),
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(spy.delete_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// MCP tools
// ============================================================================

/// Helper to call a tool and get text result
async fn call_tool_text(tool: &Tool, input: Value) -> String {
    let result = tool.call(input).await;
    result
        .content
        .first()
        .and_then(|c: &tower_mcp::Content| c.as_text())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn list_outcomes_tool() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::list_outcomes(deps);

    let text = call_tool_text(&tool, json!({})).await;
    let result: Value = serde_json::from_str(&text).expect("valid JSON response");

    assert_eq!(result["count"], 6);
}

#[tokio::test]
async fn get_outcome_details_tool_accepts_legacy_argument() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::get_outcome_details(deps);

    let text = call_tool_text(&tool, json!({"Outcome_id": "delete-instance"})).await;
    let result: Value = serde_json::from_str(&text).expect("valid JSON response");

    assert_eq!(result["id"], "delete-instance");
    assert_eq!(result["metadata"]["destructive"], true);
}

#[tokio::test]
async fn execute_outcome_tool_reports_structured_error() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::execute_outcome(deps);

    let result = tool
        .call(json!({"outcome_id": "delete-instance", "parameters": {"instance_id": "abc", "confirm": true}}))
        .await;

    let text = result
        .content
        .first()
        .and_then(|c: &tower_mcp::Content| c.as_text())
        .unwrap_or_default();
    assert!(text.contains("read_only_mode"));
}

#[tokio::test]
async fn execute_outcome_tool_missing_or_mistyped_id_is_validation_error() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::execute_outcome(deps);

    for input in [json!({}), json!({"outcome_id": 5}), json!({"parameters": {}})] {
        let text = call_tool_text(&tool, input.clone()).await;
        assert!(text.contains("validation_error"), "{input} -> {text}");
        assert!(text.contains("\"parameter\":\"outcome_id\""), "{input} -> {text}");
    }
}

#[tokio::test]
async fn get_outcome_details_tool_missing_or_mistyped_id_is_validation_error() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::get_outcome_details(deps);

    for input in [json!({}), json!({"outcome_id": 5}), json!({"Outcome_id": true})] {
        let text = call_tool_text(&tool, input.clone()).await;
        assert!(text.contains("validation_error"), "{input} -> {text}");
        assert!(text.contains("\"parameter\":\"outcome_id\""), "{input} -> {text}");
    }
}

#[tokio::test]
async fn get_outcome_details_tool_accepts_both_spellings() {
    let deps = Arc::new(deps_with(Arc::new(SpyClient::default()), Config::default()));
    let tool = tools::get_outcome_details(deps);

    let text = call_tool_text(
        &tool,
        json!({"outcome_id": "delete-instance", "Outcome_id": "delete-instance"}),
    )
    .await;
    let result: Value = serde_json::from_str(&text).expect("valid JSON response");

    assert_eq!(result["id"], "delete-instance");
}
