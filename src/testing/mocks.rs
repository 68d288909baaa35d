//! Mock implementations for testing

use crate::client::request::{
    AcademicSearchParams, LocalSearchParams, SearchRequest, SearchTrendParams,
    ShoppingTrendRequest,
};
use crate::client::{ClientError, SearchClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// One call observed by [`MockSearchClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Search(SearchRequest),
    Academic(AcademicSearchParams),
    Local(LocalSearchParams),
    SearchTrend(SearchTrendParams),
    ShoppingTrend(ShoppingTrendRequest),
}

/// Mock search client that records calls and returns a canned result
#[derive(Debug, Clone)]
pub struct MockSearchClient {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub response: Value,
    pub failure: Option<String>,
    pub delay: Option<Duration>,
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: json!({"items": []}),
            failure: None,
            delay: None,
        }
    }
}

impl MockSearchClient {
    /// Mock returning `{"items": []}` for every call
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: Value) -> Self {
        Self {
            response,
            ..Default::default()
        }
    }

    /// Mock failing every call with a provider error carrying `message`
    pub fn with_failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Delay every response, to keep invocations in flight
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn respond(&self, call: RecordedCall) -> Result<Value, ClientError> {
        self.calls.lock().await.push(call);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(ClientError::Provider(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, request: SearchRequest) -> Result<Value, ClientError> {
        self.respond(RecordedCall::Search(request)).await
    }

    async fn search_academic(&self, params: AcademicSearchParams) -> Result<Value, ClientError> {
        self.respond(RecordedCall::Academic(params)).await
    }

    async fn search_local(&self, params: LocalSearchParams) -> Result<Value, ClientError> {
        self.respond(RecordedCall::Local(params)).await
    }

    async fn search_trend(&self, params: SearchTrendParams) -> Result<Value, ClientError> {
        self.respond(RecordedCall::SearchTrend(params)).await
    }

    async fn shopping_trend(&self, request: ShoppingTrendRequest) -> Result<Value, ClientError> {
        self.respond(RecordedCall::ShoppingTrend(request)).await
    }
}
