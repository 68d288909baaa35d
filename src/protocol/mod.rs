//! Protocol message types for the Model Context Protocol stdio transport
//!
//! JSON-RPC 2.0 framing plus the MCP result shapes used by this server.

pub mod messages;

pub use messages::*;
