//! Tool system: registry, handler map and argument validation
//!
//! The registry ([`registry::tool_registry`]) is what callers discover; the
//! handler map inside [`ToolSystem`] is what actually runs. Construction fails
//! unless the two cover exactly the same tool names.

use crate::client::{ClientError, SearchClient};
use async_trait::async_trait;
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

pub mod builtin;
pub mod registry;

pub use registry::{find_descriptor, tool_registry, ToolDescriptor};

/// A single tool handler
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry name this handler serves
    fn name(&self) -> &str;

    /// Run the tool against the remote client
    ///
    /// Arguments have already passed schema validation. Implementations issue
    /// one remote call and return its result unchanged.
    async fn execute(&self, client: &dyn SearchClient, arguments: &Value)
        -> Result<Value, ToolError>;
}

/// Handler map keyed by tool name
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
    validators: HashMap<String, Validator>,
}

impl ToolSystem {
    /// Build the handler map with every builtin tool
    pub fn new() -> Result<Self, ToolError> {
        Self::from_tools(builtin::builtin_tools())
    }

    /// Build a handler map from explicit tools, checking registry coverage
    pub fn from_tools(tools: Vec<Box<dyn Tool>>) -> Result<Self, ToolError> {
        let mut map = HashMap::new();
        for tool in tools {
            let name = tool.name().to_string();
            if map.insert(name.clone(), tool).is_some() {
                return Err(ToolError::RegistryMismatch(format!(
                    "duplicate handler for '{name}'"
                )));
            }
        }

        check_coverage(
            map.keys().map(String::as_str),
            tool_registry().iter().map(|d| d.name.as_str()),
        )?;

        let validators = tool_registry()
            .iter()
            .map(|descriptor| Ok((descriptor.name.clone(), compile_schema(descriptor)?)))
            .collect::<Result<HashMap<_, _>, ToolError>>()?;

        Ok(Self {
            tools: map,
            validators,
        })
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// Execute tool with validated parameters
    pub async fn execute_tool(
        &self,
        client: &dyn SearchClient,
        tool_name: &str,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        self.validate_arguments(tool_name, arguments)?;

        tool.execute(client, arguments).await
    }

    /// Validate arguments against the advertised schema
    fn validate_arguments(&self, tool_name: &str, arguments: &Value) -> Result<(), ToolError> {
        let validator = self
            .validators
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        validator.validate(arguments).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::InvalidArguments(error_messages.join("; "))
        })
    }

    /// Sorted list of handler names
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

fn compile_schema(descriptor: &ToolDescriptor) -> Result<Validator, ToolError> {
    jsonschema::validator_for(&descriptor.input_schema).map_err(|e| {
        ToolError::SchemaError(format!(
            "Schema compilation error for '{}': {e}",
            descriptor.name
        ))
    })
}

/// Verify two name sets are equal, reporting both differences (pure function)
fn check_coverage<'a>(
    handlers: impl Iterator<Item = &'a str>,
    registry: impl Iterator<Item = &'a str>,
) -> Result<(), ToolError> {
    let handlers: BTreeSet<&str> = handlers.collect();
    let registry: BTreeSet<&str> = registry.collect();

    let unregistered: Vec<&str> = handlers.difference(&registry).copied().collect();
    let unhandled: Vec<&str> = registry.difference(&handlers).copied().collect();

    if unregistered.is_empty() && unhandled.is_empty() {
        return Ok(());
    }

    let mut problems = Vec::new();
    if !unregistered.is_empty() {
        problems.push(format!("handlers missing from registry: {}", unregistered.join(", ")));
    }
    if !unhandled.is_empty() {
        problems.push(format!("registered tools without handler: {}", unhandled.join(", ")));
    }
    Err(ToolError::RegistryMismatch(problems.join("; ")))
}

/// Deserialize validated arguments into a typed parameter struct
pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Tool system errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Arguments are required")]
    MissingArguments,
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Tool registry mismatch: {0}")]
    RegistryMismatch(String),
    #[error(transparent)]
    RemoteFailure(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearchClient;
    use serde_json::json;

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(
            &self,
            _client: &dyn SearchClient,
            _arguments: &Value,
        ) -> Result<Value, ToolError> {
            Ok(json!({}))
        }
    }

    #[test]
    fn test_tool_system_covers_registry() {
        let tool_system = ToolSystem::new().unwrap();
        assert_eq!(tool_system.list_tools().len(), tool_registry().len());
    }

    #[test]
    fn test_tool_system_rejects_partial_handler_map() {
        let result = ToolSystem::from_tools(vec![Box::new(NamedTool("news-search"))]);
        match result {
            Err(ToolError::RegistryMismatch(message)) => {
                assert!(message.contains("without handler"));
                assert!(message.contains("web-search"));
            }
            _ => panic!("expected registry mismatch"),
        }
    }

    #[test]
    fn test_every_schema_compiles_at_construction() {
        let tool_system = ToolSystem::new().unwrap();
        for descriptor in tool_registry() {
            assert!(
                tool_system.validators.contains_key(&descriptor.name),
                "no validator for {}",
                descriptor.name
            );
        }
    }

    #[test]
    fn test_invalid_schema_is_reported_with_tool_name() {
        let descriptor = ToolDescriptor {
            name: "broken-tool".to_string(),
            description: String::new(),
            input_schema: json!({"type": "not-a-type"}),
        };
        match compile_schema(&descriptor) {
            Err(ToolError::SchemaError(message)) => assert!(message.contains("broken-tool")),
            other => panic!("expected schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_tool_system_rejects_duplicate_handlers() {
        let mut tools = builtin::builtin_tools();
        tools.push(Box::new(NamedTool("news-search")));
        let result = ToolSystem::from_tools(tools);
        assert!(matches!(result, Err(ToolError::RegistryMismatch(_))));
    }

    #[test]
    fn test_check_coverage_reports_unregistered() {
        let result = check_coverage(
            ["a", "b", "extra"].into_iter(),
            ["a", "b"].into_iter(),
        );
        match result {
            Err(ToolError::RegistryMismatch(message)) => {
                assert!(message.contains("handlers missing from registry: extra"));
            }
            _ => panic!("expected registry mismatch"),
        }
        assert!(check_coverage(["a"].into_iter(), ["a"].into_iter()).is_ok());
    }

    #[tokio::test]
    async fn test_tool_execution_unknown_tool() {
        let tool_system = ToolSystem::new().unwrap();
        let client = MockSearchClient::new();

        let result = tool_system
            .execute_tool(&client, "unknown", &json!({"query": "x"}))
            .await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_schema_validation_rejects_wrong_type() {
        let tool_system = ToolSystem::new().unwrap();
        let client = MockSearchClient::new();

        let result = tool_system
            .execute_tool(&client, "news-search", &json!({"query": 42}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_schema_validation_rejects_missing_required() {
        let tool_system = ToolSystem::new().unwrap();
        let client = MockSearchClient::new();

        let result = tool_system
            .execute_tool(&client, "blog-search", &json!({}))
            .await;
        match result {
            Err(ToolError::InvalidArguments(message)) => assert!(message.contains("query")),
            other => panic!("expected invalid arguments, got {other:?}"),
        }
    }

    #[test]
    fn test_remote_failure_is_transparent() {
        let error: ToolError = ClientError::Provider("rate limited".to_string()).into();
        assert_eq!(error.to_string(), "rate limited");
    }
}
