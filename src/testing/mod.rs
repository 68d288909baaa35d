//! Testing utilities and mock implementations
//!
//! Provides a mock [`SearchClient`](crate::client::SearchClient) so the
//! dispatcher and server can be exercised without network access.

pub mod mocks;

pub use mocks::*;
