//! DataLab trend analysis handlers

use crate::client::request::{SearchTrendParams, ShoppingTrendKind};
use crate::client::SearchClient;
use crate::tools::{parse_arguments, Tool, ToolError};
use async_trait::async_trait;
use serde_json::Value;

/// Search keyword trends
pub struct SearchTrendTool;

#[async_trait]
impl Tool for SearchTrendTool {
    fn name(&self) -> &str {
        "datalab-search"
    }

    async fn execute(
        &self,
        client: &dyn SearchClient,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let params: SearchTrendParams = parse_arguments(arguments)?;
        params
            .period
            .validate()
            .map_err(ToolError::InvalidArguments)?;

        Ok(client.search_trend(params).await?)
    }
}

/// Shopping insight trends, one handler per breakdown
pub struct ShoppingTrendTool {
    kind: ShoppingTrendKind,
}

impl ShoppingTrendTool {
    pub fn new(kind: ShoppingTrendKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Tool for ShoppingTrendTool {
    fn name(&self) -> &str {
        self.kind.tool_name()
    }

    async fn execute(
        &self,
        client: &dyn SearchClient,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let request = self
            .kind
            .request(arguments.clone())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        request
            .period()
            .validate()
            .map_err(ToolError::InvalidArguments)?;

        Ok(client.shopping_trend(request).await?)
    }
}
