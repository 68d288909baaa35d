//! Static tool registry advertised through `tools/list`

use crate::client::request::{
    AcademicSearchParams, CategoryBreakdownParams, ImageSearchParams, LocalSearchParams,
    SearchParams, SearchTrendParams, ShoppingCategoriesParams, ShoppingKeywordsParams,
    ShoppingSearchParams,
};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};

/// Tool descriptor: name, description and JSON schema of accepted arguments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Describe a tool whose arguments deserialize into `T`
    pub fn new<T: JsonSchema>(name: &str, description: &str) -> Self {
        let schema = schemars::schema_for!(T);
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::to_value(schema)
                .unwrap_or_else(|_| json!({"type": "object"})),
        }
    }
}

static TOOL_REGISTRY: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    vec![
        ToolDescriptor::new::<SearchParams>(
            "web-search",
            "Search web documents indexed by Naver",
        ),
        ToolDescriptor::new::<SearchParams>("news-search", "Search Naver news articles"),
        ToolDescriptor::new::<SearchParams>("blog-search", "Search Naver blog posts"),
        ToolDescriptor::new::<ImageSearchParams>(
            "image-search",
            "Search images, optionally filtered by size",
        ),
        ToolDescriptor::new::<ShoppingSearchParams>(
            "shopping-search",
            "Search Naver Shopping products with price ordering and filters",
        ),
        ToolDescriptor::new::<SearchParams>(
            "knowledge-search",
            "Search Naver Knowledge iN questions and answers",
        ),
        ToolDescriptor::new::<SearchParams>("book-search", "Search books"),
        ToolDescriptor::new::<SearchParams>(
            "encyclopedia-search",
            "Search Naver encyclopedia entries",
        ),
        ToolDescriptor::new::<SearchParams>(
            "cafe-article-search",
            "Search Naver Cafe community articles",
        ),
        ToolDescriptor::new::<AcademicSearchParams>(
            "academic-search",
            "Search academic papers and theses",
        ),
        ToolDescriptor::new::<LocalSearchParams>(
            "local-search",
            "Search local businesses and places (at most 5 results)",
        ),
        ToolDescriptor::new::<SearchTrendParams>(
            "datalab-search",
            "Compare search volume trends of keyword groups over a period",
        ),
        ToolDescriptor::new::<ShoppingCategoriesParams>(
            "datalab-shopping-categories",
            "Compare click trends of up to 3 shopping categories",
        ),
        ToolDescriptor::new::<CategoryBreakdownParams>(
            "datalab-shopping-device",
            "Click trend of a shopping category broken down by device",
        ),
        ToolDescriptor::new::<CategoryBreakdownParams>(
            "datalab-shopping-gender",
            "Click trend of a shopping category broken down by gender",
        ),
        ToolDescriptor::new::<CategoryBreakdownParams>(
            "datalab-shopping-age",
            "Click trend of a shopping category broken down by age group",
        ),
        ToolDescriptor::new::<ShoppingKeywordsParams>(
            "datalab-shopping-keywords",
            "Compare click trends of keywords within a shopping category",
        ),
    ]
});

/// Ordered, read-only list of every advertised tool
pub fn tool_registry() -> &'static [ToolDescriptor] {
    &TOOL_REGISTRY
}

/// Look up a descriptor by tool name
pub fn find_descriptor(name: &str) -> Option<&'static ToolDescriptor> {
    tool_registry().iter().find(|d| d.name == name)
}
