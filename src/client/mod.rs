//! Remote search client abstraction
//!
//! The dispatcher only ever sees the [`SearchClient`] trait. The production
//! implementation is [`NaverClient`]; tests inject
//! [`MockSearchClient`](crate::testing::MockSearchClient).

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub mod naver;
pub mod request;

pub use naver::{NaverClient, NaverConfig};
pub use request::*;

/// Client id / client secret pair issued by the Naver developer console
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Remote client trait for dependency injection and testing
///
/// Every method issues exactly one outbound call and returns the provider's
/// JSON body unchanged.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Generic search over one of the [`SearchKind`] endpoints
    async fn search(&self, request: SearchRequest) -> Result<Value, ClientError>;

    /// Academic paper search
    async fn search_academic(&self, params: AcademicSearchParams) -> Result<Value, ClientError>;

    /// Local business search
    async fn search_local(&self, params: LocalSearchParams) -> Result<Value, ClientError>;

    /// DataLab search keyword trends
    async fn search_trend(&self, params: SearchTrendParams) -> Result<Value, ClientError>;

    /// DataLab shopping insight trends
    async fn shopping_trend(&self, request: ShoppingTrendRequest) -> Result<Value, ClientError>;
}

/// Remote client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Client not configured: {0}")]
    NotConfigured(String),
    #[error("Request failed: {0}")]
    Request(String),
    /// Error reported by the provider itself; the message is passed through verbatim
    #[error("{0}")]
    Provider(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials::new("my-id", "top-secret");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("id", "secret").is_complete());
        assert!(!Credentials::new("", "secret").is_complete());
        assert!(!Credentials::new("id", "   ").is_complete());
    }

    #[test]
    fn test_provider_error_message_is_verbatim() {
        let error = ClientError::Provider("rate limited".to_string());
        assert_eq!(error.to_string(), "rate limited");
    }

    #[test]
    fn test_api_error_message_includes_status() {
        let error = ClientError::Api {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(error.to_string(), "API error (502): bad gateway");
    }
}
