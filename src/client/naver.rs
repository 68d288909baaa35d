//! Naver Open API client
//!
//! Implements [`SearchClient`] over the Naver search (`/v1/search`) and
//! DataLab (`/v1/datalab`) REST endpoints using reqwest.

use crate::client::request::{
    AcademicSearchParams, LocalSearchParams, SearchRequest, SearchTrendParams,
    ShoppingTrendRequest,
};
use crate::client::{ClientError, Credentials, SearchClient};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Naver client configuration
#[derive(Debug, Clone)]
pub struct NaverConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openapi.naver.com".to_string(),
            timeout: Duration::from_secs(30),
            credentials: Credentials::new("", ""),
        }
    }
}

/// Naver Open API client
///
/// Credentials are fixed at construction and only read afterwards.
pub struct NaverClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl NaverClient {
    /// Create a new client, failing if credentials are empty or the base URL is invalid
    pub fn new(config: NaverConfig) -> Result<Self, ClientError> {
        if !config.credentials.is_complete() {
            return Err(ClientError::NotConfigured(
                "client id and client secret are required".to_string(),
            ));
        }

        let base_url = Self::normalize_base_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            credentials: config.credentials,
        })
    }

    /// Parse the base URL, ensuring it ends with '/' so joins append (pure function)
    fn normalize_base_url(base_url: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ClientError::NotConfigured(format!("invalid base URL '{base_url}': {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Search endpoint path for a kind (pure function)
    fn search_path(endpoint: &str) -> String {
        format!("v1/search/{endpoint}.json")
    }

    /// Shopping insight endpoint path (pure function)
    fn shopping_path(endpoint: &str) -> String {
        format!("v1/datalab/shopping/{endpoint}")
    }

    /// Extract the provider error message from an error body (pure function)
    ///
    /// Naver reports failures as `{"errorMessage": "...", "errorCode": "..."}`.
    fn parse_error_body(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        let message = value.get("errorMessage").and_then(|m| m.as_str())?;
        match value.get("errorCode").and_then(|c| c.as_str()) {
            Some(code) => Some(format!("{message} ({code})")),
            None => Some(message.to_string()),
        }
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Request(format!("invalid endpoint '{path}': {e}")))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(CLIENT_ID_HEADER, &self.credentials.client_id)
            .header(CLIENT_SECRET_HEADER, &self.credentials.client_secret)
    }

    async fn get_json<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Value, ClientError> {
        let url = self.url(path)?;
        debug!(url = %url, "Sending search request");

        let response = self
            .authorize(self.client.get(url))
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let url = self.url(path)?;
        debug!(url = %url, "Sending DataLab request");

        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn read_response(response: Response) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Naver API returned an error");
            return Err(match Self::parse_error_body(&body) {
                Some(message) => ClientError::Provider(message),
                None => ClientError::Api {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchClient for NaverClient {
    async fn search(&self, request: SearchRequest) -> Result<Value, ClientError> {
        let path = Self::search_path(request.kind().endpoint());
        match &request {
            SearchRequest::Web(params)
            | SearchRequest::News(params)
            | SearchRequest::Blog(params)
            | SearchRequest::Knowledge(params)
            | SearchRequest::Book(params)
            | SearchRequest::Encyclopedia(params)
            | SearchRequest::CafeArticle(params) => self.get_json(&path, params).await,
            SearchRequest::Image(params) => self.get_json(&path, params).await,
            SearchRequest::Shopping(params) => self.get_json(&path, params).await,
        }
    }

    async fn search_academic(&self, params: AcademicSearchParams) -> Result<Value, ClientError> {
        self.get_json(&Self::search_path("doc"), &params).await
    }

    async fn search_local(&self, params: LocalSearchParams) -> Result<Value, ClientError> {
        self.get_json(&Self::search_path("local"), &params).await
    }

    async fn search_trend(&self, params: SearchTrendParams) -> Result<Value, ClientError> {
        self.post_json("v1/datalab/search", &params).await
    }

    async fn shopping_trend(&self, request: ShoppingTrendRequest) -> Result<Value, ClientError> {
        let path = Self::shopping_path(request.endpoint());
        match &request {
            ShoppingTrendRequest::Categories(params) => self.post_json(&path, params).await,
            ShoppingTrendRequest::Device(params)
            | ShoppingTrendRequest::Gender(params)
            | ShoppingTrendRequest::Age(params) => self.post_json(&path, params).await,
            ShoppingTrendRequest::Keywords(params) => self.post_json(&path, params).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NaverConfig {
        NaverConfig {
            credentials: Credentials::new("id", "secret"),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_requires_credentials() {
        let result = NaverClient::new(NaverConfig::default());
        assert!(matches!(result, Err(ClientError::NotConfigured(_))));
    }

    #[test]
    fn test_client_rejects_invalid_base_url() {
        let result = NaverClient::new(NaverConfig {
            base_url: "not a url".to_string(),
            ..config()
        });
        assert!(matches!(result, Err(ClientError::NotConfigured(_))));
    }

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = NaverClient::normalize_base_url("http://localhost:8080/proxy").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/");

        let joined = url.join(&NaverClient::search_path("news")).unwrap();
        assert_eq!(
            joined.as_str(),
            "http://localhost:8080/proxy/v1/search/news.json"
        );
    }

    #[test]
    fn test_shopping_path() {
        assert_eq!(
            NaverClient::shopping_path("category/keywords"),
            "v1/datalab/shopping/category/keywords"
        );
    }

    #[test]
    fn test_parse_error_body_with_code() {
        let body = r#"{"errorMessage": "Scope Status Invalid", "errorCode": "024"}"#;
        assert_eq!(
            NaverClient::parse_error_body(body),
            Some("Scope Status Invalid (024)".to_string())
        );
    }

    #[test]
    fn test_parse_error_body_without_code() {
        let body = r#"{"errorMessage": "rate limited"}"#;
        assert_eq!(
            NaverClient::parse_error_body(body),
            Some("rate limited".to_string())
        );
    }

    #[test]
    fn test_parse_error_body_not_json() {
        assert_eq!(NaverClient::parse_error_body("<html>oops</html>"), None);
        assert_eq!(NaverClient::parse_error_body(r#"{"message": "x"}"#), None);
    }
}
