//! The three MCP tools in front of the Outcome Registry
//!
//! - `list-outcomes` - discover the available outcomes
//! - `get-outcome-details` - read one outcome's parameters and metadata
//! - `execute-outcome` - run an outcome with a parameter object
//!
//! The plain [`discover`], [`describe`] and [`execute`] functions hold the
//! logic; the tool builders only adapt them to MCP.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_mcp::extract::{Json, State};
use tower_mcp::{CallToolResult, McpRouter, Tool, ToolBuilder, ToolError};

use crate::error::OutcomeError;
use crate::params::Parameters;
use crate::state::Dependencies;

/// Convert an outcome error into the structured payload callers receive
pub fn outcome_error(err: OutcomeError) -> ToolError {
    ToolError::new(err.payload().to_string())
}

fn missing_outcome_id() -> OutcomeError {
    OutcomeError::validation(
        "outcome_id",
        "'outcome_id' parameter is required and must be a non-empty string",
    )
}

fn require_outcome_id(outcome_id: &str) -> Result<&str, OutcomeError> {
    let trimmed = outcome_id.trim();
    if trimmed.is_empty() {
        return Err(missing_outcome_id());
    }
    Ok(trimmed)
}

/// Resolve the raw `outcome_id` argument, falling back to the legacy
/// `Outcome_id` spelling when the current one is absent or null
fn outcome_id_argument<'a>(
    current: Option<&'a Value>,
    legacy: Option<&'a Value>,
) -> Result<&'a str, OutcomeError> {
    let value = current
        .filter(|v| !v.is_null())
        .or_else(|| legacy.filter(|v| !v.is_null()));
    match value.and_then(Value::as_str) {
        Some(id) => require_outcome_id(id),
        None => Err(missing_outcome_id()),
    }
}

/// `{outcomes: [...], count}` for every registered outcome
///
/// The MCP protocol requires `structuredContent` to be a JSON object, not an array.
pub fn discover(deps: &Dependencies) -> Value {
    let summaries = deps.registry().summaries();
    json!({ "outcomes": summaries, "count": summaries.len() })
}

/// Full record for one outcome, without its handler
pub fn describe(deps: &Dependencies, outcome_id: &str) -> Result<Value, OutcomeError> {
    let outcome_id = require_outcome_id(outcome_id)?;
    let outcome = deps.registry().describe(outcome_id)?;
    Ok(serde_json::to_value(outcome)?)
}

/// Dispatch one outcome; the handler's payload is returned unchanged
pub async fn execute(
    deps: &Dependencies,
    outcome_id: &str,
    parameters: Value,
) -> Result<Value, OutcomeError> {
    let outcome_id = require_outcome_id(outcome_id)?;
    let parameters = Parameters::from_value(parameters)?;
    deps.registry()
        .dispatch(outcome_id, &parameters, deps)
        .await
}

// ============================================================================
// Read operations
// ============================================================================

/// Input for listing outcomes (no parameters)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListOutcomesInput {}

/// Build the list-outcomes tool
pub fn list_outcomes(deps: Arc<Dependencies>) -> Tool {
    ToolBuilder::new("list-outcomes")
        .description(
            "List all available outcomes (operations) that can be performed on Neo4j Aura \
             resources. Returns id, name, description, type and whether each outcome is \
             read-only. Use get-outcome-details for parameters, then execute-outcome to run one.",
        )
        .read_only()
        .idempotent()
        .extractor_handler_typed::<_, _, _, ListOutcomesInput>(
            deps,
            |State(deps): State<Arc<Dependencies>>, Json(_input): Json<ListOutcomesInput>| async move {
                CallToolResult::from_serialize(&discover(&deps))
            },
        )
        .build()
}

/// Input for getting outcome details
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetOutcomeDetailsInput {
    /// The ID of the outcome to get details for (from list-outcomes)
    #[serde(default)]
    pub outcome_id: Option<Value>,
    /// Legacy spelling of `outcome_id`
    #[serde(default, rename = "Outcome_id")]
    pub legacy_outcome_id: Option<Value>,
}

impl GetOutcomeDetailsInput {
    /// The requested outcome id, or a validation error for `outcome_id`
    pub fn resolve_outcome_id(&self) -> Result<&str, OutcomeError> {
        outcome_id_argument(self.outcome_id.as_ref(), self.legacy_outcome_id.as_ref())
    }
}

/// Build the get-outcome-details tool
pub fn get_outcome_details(deps: Arc<Dependencies>) -> Tool {
    ToolBuilder::new("get-outcome-details")
        .description(
            "Get detailed information about a specific outcome including its full parameters, \
             requirements and metadata such as destructive warnings.",
        )
        .read_only()
        .idempotent()
        .extractor_handler_typed::<_, _, _, GetOutcomeDetailsInput>(
            deps,
            |State(deps): State<Arc<Dependencies>>,
             Json(input): Json<GetOutcomeDetailsInput>| async move {
                let outcome_id = input.resolve_outcome_id().map_err(outcome_error)?;
                let details = describe(&deps, outcome_id).map_err(outcome_error)?;
                CallToolResult::from_serialize(&details)
            },
        )
        .build()
}

// ============================================================================
// Write operations
// ============================================================================

/// Input for executing an outcome
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteOutcomeInput {
    /// The ID of the outcome to execute (from list-outcomes)
    #[serde(default)]
    pub outcome_id: Option<Value>,
    /// Legacy spelling of `outcome_id`
    #[serde(default, rename = "Outcome_id")]
    pub legacy_outcome_id: Option<Value>,
    /// Parameters for the outcome (see get-outcome-details for parameter specifications)
    #[serde(default)]
    pub parameters: Value,
}

impl ExecuteOutcomeInput {
    /// The requested outcome id, or a validation error for `outcome_id`
    pub fn resolve_outcome_id(&self) -> Result<&str, OutcomeError> {
        outcome_id_argument(self.outcome_id.as_ref(), self.legacy_outcome_id.as_ref())
    }
}

/// Build the execute-outcome tool
///
/// Whether a given outcome may run is decided by the registry's read-only
/// gate, so this tool is not annotated read-only.
pub fn execute_outcome(deps: Arc<Dependencies>) -> Tool {
    ToolBuilder::new("execute-outcome")
        .description(
            "Execute a specific outcome with the provided parameters. Outcomes that modify \
             resources are rejected while the server is in read-only mode.",
        )
        .extractor_handler_typed::<_, _, _, ExecuteOutcomeInput>(
            deps,
            |State(deps): State<Arc<Dependencies>>,
             Json(input): Json<ExecuteOutcomeInput>| async move {
                let outcome_id = input
                    .resolve_outcome_id()
                    .map_err(outcome_error)?
                    .to_string();
                let result = execute(&deps, &outcome_id, input.parameters)
                    .await
                    .map_err(outcome_error)?;
                CallToolResult::from_serialize(&result)
            },
        )
        .build()
}

/// Build an MCP sub-router containing the three outcome tools
pub fn router(deps: Arc<Dependencies>) -> McpRouter {
    McpRouter::new()
        .tool(list_outcomes(deps.clone()))
        .tool(get_outcome_details(deps.clone()))
        .tool(execute_outcome(deps))
}

/// Server instructions describing the outcome workflow
pub fn instructions(read_only: bool) -> String {
    let mode = if read_only {
        "The server is in READ-ONLY mode: only outcomes marked readonly can be executed. \
         Restart with READ_ONLY=false to enable create and delete."
    } else {
        "Write operations are ENABLED. delete-instance requires confirm=true and cannot be undone."
    };

    format!(
        r#"Neo4j Aura Infrastructure MCP Server

This server manages Neo4j Aura database instances through outcomes.

## Workflow
1. Call list-outcomes to see what can be done
2. Call get-outcome-details with an outcome_id to read its parameters
3. Call execute-outcome with the outcome_id and a parameters object

## Mode
{}
"#,
        mode
    )
}
