//! Invocation dispatcher
//!
//! Routes a tool name plus raw arguments to its handler and folds every
//! outcome into an [`InvocationResponse`]. Nothing raised by a handler or the
//! remote client crosses this boundary.

use crate::client::SearchClient;
use crate::error::sanitize_error_message;
use crate::observability::metrics::MetricsCollector;
use crate::protocol::{InvocationRequest, InvocationResponse};
use crate::tool_span;
use crate::tools::{tool_registry, ToolDescriptor, ToolError, ToolSystem};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn, Instrument};

/// Dispatches tool invocations against one shared remote client
pub struct Dispatcher {
    tools: ToolSystem,
    client: Arc<dyn SearchClient>,
    metrics: Arc<MetricsCollector>,
}

impl Dispatcher {
    /// Build a dispatcher over every builtin tool
    ///
    /// Fails if the handler map and the registry disagree.
    pub fn new(client: Arc<dyn SearchClient>) -> Result<Self, ToolError> {
        Self::with_metrics(client, Arc::new(MetricsCollector::new()))
    }

    pub fn with_metrics(
        client: Arc<dyn SearchClient>,
        metrics: Arc<MetricsCollector>,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            tools: ToolSystem::new()?,
            client,
            metrics,
        })
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Descriptors advertised to callers, in registry order
    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        tool_registry()
    }

    pub async fn invoke_request(&self, request: InvocationRequest) -> InvocationResponse {
        self.invoke(&request.tool_name, request.arguments).await
    }

    /// Invoke `tool_name` with `arguments`
    ///
    /// Never fails: errors come back as an envelope with `is_error` set and
    /// the text `"Error: <message>"`.
    pub async fn invoke(&self, tool_name: &str, arguments: Option<Value>) -> InvocationResponse {
        let span = tool_span!(tool = %tool_name);

        async {
            self.metrics.invocation_started();
            let start = Instant::now();

            let outcome = self.run(tool_name, arguments).await;
            let duration = start.elapsed();

            self.metrics.invocation_finished(duration, outcome.is_ok());
            if self.tools.contains(tool_name) {
                self.metrics.tool_executed(tool_name, duration, outcome.is_ok());
            }

            match outcome {
                Ok(result) => {
                    debug!(duration_ms = duration.as_millis() as u64, "Tool succeeded");
                    render_result(&result)
                }
                Err(e) => {
                    warn!(error = %e, duration_ms = duration.as_millis() as u64, "Tool failed");
                    InvocationResponse::error(sanitize_error_message(&e.to_string()))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, tool_name: &str, arguments: Option<Value>) -> Result<Value, ToolError> {
        if !self.tools.contains(tool_name) {
            self.metrics.unknown_tool();
            return Err(ToolError::UnknownTool(tool_name.to_string()));
        }

        let arguments = match arguments {
            None | Some(Value::Null) => return Err(ToolError::MissingArguments),
            Some(arguments) => arguments,
        };

        self.tools
            .execute_tool(self.client.as_ref(), tool_name, &arguments)
            .await
    }
}

/// Pretty-printed JSON of a handler result as a success envelope
fn render_result(result: &Value) -> InvocationResponse {
    match serde_json::to_string_pretty(result) {
        Ok(text) => InvocationResponse::success(text),
        Err(e) => InvocationResponse::error(sanitize_error_message(&e.to_string())),
    }
}
