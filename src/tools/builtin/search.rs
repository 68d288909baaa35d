//! Search tool handlers
//!
//! Generic kinds go through [`SearchClient::search`]; academic and local
//! search have their own client methods because their endpoints take a
//! different parameter set.

use crate::client::request::{AcademicSearchParams, LocalSearchParams, SearchKind};
use crate::client::SearchClient;
use crate::tools::{parse_arguments, Tool, ToolError};
use async_trait::async_trait;
use serde_json::Value;

/// Handler for one generic search kind
pub struct SearchTool {
    kind: SearchKind,
}

impl SearchTool {
    pub fn new(kind: SearchKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Tool for SearchTool {
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

        Ok(client.search(request).await?)
    }
}

pub struct AcademicSearchTool;

#[async_trait]
impl Tool for AcademicSearchTool {
    fn name(&self) -> &str {
        "academic-search"
    }

    async fn execute(
        &self,
        client: &dyn SearchClient,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let params: AcademicSearchParams = parse_arguments(arguments)?;
        Ok(client.search_academic(params).await?)
    }
}

pub struct LocalSearchTool;

#[async_trait]
impl Tool for LocalSearchTool {
    fn name(&self) -> &str {
        "local-search"
    }

    async fn execute(
        &self,
        client: &dyn SearchClient,
        arguments: &Value,
    ) -> Result<Value, ToolError> {
        let params: LocalSearchParams = parse_arguments(arguments)?;
        Ok(client.search_local(params).await?)
    }
}
