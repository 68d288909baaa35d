//! Builtin tool handlers
//!
//! One handler per registry entry. Each handler shapes its arguments into a
//! typed request and makes a single call on the injected [`SearchClient`].
//!
//! [`SearchClient`]: crate::client::SearchClient

pub mod datalab;
pub mod search;

pub use datalab::{SearchTrendTool, ShoppingTrendTool};
pub use search::{AcademicSearchTool, LocalSearchTool, SearchTool};

use crate::client::request::{SearchKind, ShoppingTrendKind};
use crate::tools::Tool;

/// Every builtin handler, in registry order
pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    let mut tools: Vec<Box<dyn Tool>> = SearchKind::ALL
        .into_iter()
        .map(|kind| Box::new(SearchTool::new(kind)) as Box<dyn Tool>)
        .collect();

    tools.push(Box::new(AcademicSearchTool));
    tools.push(Box::new(LocalSearchTool));
    tools.push(Box::new(SearchTrendTool));
    tools.extend(
        ShoppingTrendKind::ALL
            .into_iter()
            .map(|kind| Box::new(ShoppingTrendTool::new(kind)) as Box<dyn Tool>),
    );

    tools
}
