//! Naver search MCP server
//!
//! Exposes the Naver Open API search and DataLab endpoints as MCP tools over
//! newline-delimited JSON-RPC on stdio.
//!
//! # Overview
//!
//! - [`tools`]: the static tool registry, the handler map and argument validation
//! - [`dispatcher`]: routes an invocation to its handler and always returns an envelope
//! - [`client`]: the remote client trait and its reqwest implementation
//! - [`server`]: JSON-RPC framing, concurrent request handling and the stdio loop
//!
//! # Quick Start
//!
//! ```rust
//! use naver_search_mcp::dispatcher::Dispatcher;
//! use naver_search_mcp::testing::MockSearchClient;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let dispatcher = Dispatcher::new(Arc::new(MockSearchClient::new())).unwrap();
//!
//! let response = dispatcher
//!     .invoke("news-search", Some(json!({"query": "rust"})))
//!     .await;
//! assert!(!response.is_error);
//!
//! let response = dispatcher.invoke("news-search", None).await;
//! assert_eq!(response.text(), "Error: Arguments are required");
//! # });
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod server;
pub mod testing;
pub mod tools;

pub use client::{ClientError, Credentials, NaverClient, NaverConfig, SearchClient};
pub use config::{ConfigError, ServerConfig};
pub use dispatcher::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use protocol::{InvocationRequest, InvocationResponse};
pub use server::McpServer;
pub use tools::{Tool, ToolDescriptor, ToolError, ToolSystem};
