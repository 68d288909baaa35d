//! Typed request parameters for the Naver search and DataLab APIs
//!
//! Each tool deserializes its arguments into one of these structs, so the
//! JSON schema advertised in the tool registry (derived with schemars) and
//! the shape sent to the remote API come from the same type.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result ordering for general search kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// By accuracy
    Sim,
    /// By date, newest first
    Date,
}

/// Result ordering for shopping search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingSort {
    Sim,
    Date,
    /// Price ascending
    Asc,
    /// Price descending
    Dsc,
}

/// Result ordering for local search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocalSort {
    /// Provider relevance order
    Random,
    /// By number of reviews
    Comment,
}

/// Image size filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    All,
    Large,
    Medium,
    Small,
}

/// Shopping result filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingFilter {
    /// Only products payable with Naver Pay
    Naverpay,
}

/// Parameters shared by web, news, blog, knowledge, book, encyclopedia and cafe searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Search query
    #[schemars(length(min = 1))]
    pub query: String,
    /// Number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub display: Option<u32>,
    /// 1-based index of the first result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 1000))]
    pub start: Option<u32>,
    /// Result ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            display: None,
            start: None,
            sort: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageSearchParams {
    /// Search query
    #[schemars(length(min = 1))]
    pub query: String,
    /// Number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub display: Option<u32>,
    /// 1-based index of the first result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 1000))]
    pub start: Option<u32>,
    /// Result ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    /// Image size filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ImageFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShoppingSearchParams {
    /// Search query
    #[schemars(length(min = 1))]
    pub query: String,
    /// Number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub display: Option<u32>,
    /// 1-based index of the first result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 1000))]
    pub start: Option<u32>,
    /// Result ordering (accuracy, date, price ascending, price descending)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<ShoppingSort>,
    /// Restrict to Naver Pay products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ShoppingFilter>,
    /// Product types to exclude, colon separated (used, rental, cbshop)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

/// Academic paper search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AcademicSearchParams {
    /// Search query
    #[schemars(length(min = 1))]
    pub query: String,
    /// Number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub display: Option<u32>,
    /// 1-based index of the first result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 1000))]
    pub start: Option<u32>,
}

/// Local business search parameters
///
/// The local endpoint returns at most five results and has no paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocalSearchParams {
    /// Search query
    #[schemars(length(min = 1))]
    pub query: String,
    /// Number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 5))]
    pub display: Option<u32>,
    /// 1-based index of the first result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 1))]
    pub start: Option<u32>,
    /// Result ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<LocalSort>,
}

impl LocalSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            display: None,
            start: None,
            sort: None,
        }
    }
}

/// Generic search kinds served by `GET /v1/search/{kind}.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Web,
    News,
    Blog,
    Image,
    Shopping,
    Knowledge,
    Book,
    Encyclopedia,
    CafeArticle,
}

impl SearchKind {
    pub const ALL: [SearchKind; 9] = [
        SearchKind::Web,
        SearchKind::News,
        SearchKind::Blog,
        SearchKind::Image,
        SearchKind::Shopping,
        SearchKind::Knowledge,
        SearchKind::Book,
        SearchKind::Encyclopedia,
        SearchKind::CafeArticle,
    ];

    /// Path segment used by the remote API
    pub fn endpoint(self) -> &'static str {
        match self {
            SearchKind::Web => "webkr",
            SearchKind::News => "news",
            SearchKind::Blog => "blog",
            SearchKind::Image => "image",
            SearchKind::Shopping => "shop",
            SearchKind::Knowledge => "kin",
            SearchKind::Book => "book",
            SearchKind::Encyclopedia => "encyc",
            SearchKind::CafeArticle => "cafearticle",
        }
    }

    /// Registry name of the tool serving this kind
    pub fn tool_name(self) -> &'static str {
        match self {
            SearchKind::Web => "web-search",
            SearchKind::News => "news-search",
            SearchKind::Blog => "blog-search",
            SearchKind::Image => "image-search",
            SearchKind::Shopping => "shopping-search",
            SearchKind::Knowledge => "knowledge-search",
            SearchKind::Book => "book-search",
            SearchKind::Encyclopedia => "encyclopedia-search",
            SearchKind::CafeArticle => "cafe-article-search",
        }
    }

    /// Build the typed request for this kind from raw tool arguments
    pub fn request(self, arguments: serde_json::Value) -> Result<SearchRequest, serde_json::Error> {
        Ok(match self {
            SearchKind::Web => SearchRequest::Web(serde_json::from_value(arguments)?),
            SearchKind::News => SearchRequest::News(serde_json::from_value(arguments)?),
            SearchKind::Blog => SearchRequest::Blog(serde_json::from_value(arguments)?),
            SearchKind::Image => SearchRequest::Image(serde_json::from_value(arguments)?),
            SearchKind::Shopping => SearchRequest::Shopping(serde_json::from_value(arguments)?),
            SearchKind::Knowledge => SearchRequest::Knowledge(serde_json::from_value(arguments)?),
            SearchKind::Book => SearchRequest::Book(serde_json::from_value(arguments)?),
            SearchKind::Encyclopedia => {
                SearchRequest::Encyclopedia(serde_json::from_value(arguments)?)
            }
            SearchKind::CafeArticle => SearchRequest::CafeArticle(serde_json::from_value(arguments)?),
        })
    }
}

/// A generic search request, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SearchRequest {
    #[serde(rename = "webkr")]
    Web(SearchParams),
    #[serde(rename = "news")]
    News(SearchParams),
    #[serde(rename = "blog")]
    Blog(SearchParams),
    #[serde(rename = "image")]
    Image(ImageSearchParams),
    #[serde(rename = "shop")]
    Shopping(ShoppingSearchParams),
    #[serde(rename = "kin")]
    Knowledge(SearchParams),
    #[serde(rename = "book")]
    Book(SearchParams),
    #[serde(rename = "encyc")]
    Encyclopedia(SearchParams),
    #[serde(rename = "cafearticle")]
    CafeArticle(SearchParams),
}

impl SearchRequest {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchRequest::Web(_) => SearchKind::Web,
            SearchRequest::News(_) => SearchKind::News,
            SearchRequest::Blog(_) => SearchKind::Blog,
            SearchRequest::Image(_) => SearchKind::Image,
            SearchRequest::Shopping(_) => SearchKind::Shopping,
            SearchRequest::Knowledge(_) => SearchKind::Knowledge,
            SearchRequest::Book(_) => SearchKind::Book,
            SearchRequest::Encyclopedia(_) => SearchKind::Encyclopedia,
            SearchRequest::CafeArticle(_) => SearchKind::CafeArticle,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            SearchRequest::Web(p)
            | SearchRequest::News(p)
            | SearchRequest::Blog(p)
            | SearchRequest::Knowledge(p)
            | SearchRequest::Book(p)
            | SearchRequest::Encyclopedia(p)
            | SearchRequest::CafeArticle(p) => &p.query,
            SearchRequest::Image(p) => &p.query,
            SearchRequest::Shopping(p) => &p.query,
        }
    }
}

// ---------------------------------------------------------------------------
// DataLab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Date,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Desktop
    Pc,
    /// Mobile
    Mo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    M,
    F,
}

/// Reporting window of a trend query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPeriod {
    /// Start date, YYYY-MM-DD
    pub start_date: String,
    /// End date, YYYY-MM-DD
    pub end_date: String,
    /// Aggregation unit
    pub time_unit: TimeUnit,
}

impl TrendPeriod {
    /// Check both dates parse as `YYYY-MM-DD` and the window is not inverted
    pub fn validate(&self) -> Result<(), String> {
        let start = parse_date("startDate", &self.start_date)?;
        let end = parse_date("endDate", &self.end_date)?;
        if start > end {
            return Err(format!(
                "startDate {} is after endDate {}",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

/// Strict `YYYY-MM-DD`; chrono alone accepts unpadded or signed fields
fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    let invalid = || format!("{field} must be a date in YYYY-MM-DD format, got '{value}'");

    if value.len() != 10 {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    if date.format("%Y-%m-%d").to_string() != value {
        return Err(invalid());
    }
    Ok(date)
}

/// Optional audience filters shared by DataLab endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudienceFilter {
    /// Device filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    /// Gender filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Age bracket codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ages: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroup {
    /// Display name of the group
    pub group_name: String,
    /// Search terms aggregated into this group
    #[schemars(length(min = 1, max = 20))]
    pub keywords: Vec<String>,
}

/// Search keyword trend query (`POST /v1/datalab/search`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrendParams {
    #[serde(flatten)]
    pub period: TrendPeriod,
    /// Keyword groups to compare
    #[schemars(length(min = 1, max = 5))]
    pub keyword_groups: Vec<KeywordGroup>,
    #[serde(flatten)]
    pub audience: AudienceFilter,
}

/// Named group of shopping categories or keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParamGroup {
    /// Display name of the group
    pub name: String,
    /// Category ids or keywords
    #[schemars(length(min = 1))]
    pub param: Vec<String>,
}

/// Shopping category trend comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCategoriesParams {
    #[serde(flatten)]
    pub period: TrendPeriod,
    /// Category groups to compare
    #[schemars(length(min = 1, max = 3))]
    pub category: Vec<ParamGroup>,
    #[serde(flatten)]
    pub audience: AudienceFilter,
}

/// Trend of a single shopping category broken down by device, gender or age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownParams {
    #[serde(flatten)]
    pub period: TrendPeriod,
    /// Shopping category id
    #[schemars(length(min = 1))]
    pub category: String,
    #[serde(flatten)]
    pub audience: AudienceFilter,
}

/// Keyword trends within one shopping category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingKeywordsParams {
    #[serde(flatten)]
    pub period: TrendPeriod,
    /// Shopping category id
    #[schemars(length(min = 1))]
    pub category: String,
    /// Keyword groups to compare
    #[schemars(length(min = 1, max = 5))]
    pub keyword: Vec<ParamGroup>,
    #[serde(flatten)]
    pub audience: AudienceFilter,
}

/// Shopping insight breakdown selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShoppingTrendKind {
    Categories,
    Device,
    Gender,
    Age,
    Keywords,
}

impl ShoppingTrendKind {
    pub const ALL: [ShoppingTrendKind; 5] = [
        ShoppingTrendKind::Categories,
        ShoppingTrendKind::Device,
        ShoppingTrendKind::Gender,
        ShoppingTrendKind::Age,
        ShoppingTrendKind::Keywords,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            ShoppingTrendKind::Categories => "datalab-shopping-categories",
            ShoppingTrendKind::Device => "datalab-shopping-device",
            ShoppingTrendKind::Gender => "datalab-shopping-gender",
            ShoppingTrendKind::Age => "datalab-shopping-age",
            ShoppingTrendKind::Keywords => "datalab-shopping-keywords",
        }
    }

    pub fn request(
        self,
        arguments: serde_json::Value,
    ) -> Result<ShoppingTrendRequest, serde_json::Error> {
        Ok(match self {
            ShoppingTrendKind::Categories => {
                ShoppingTrendRequest::Categories(serde_json::from_value(arguments)?)
            }
            ShoppingTrendKind::Device => ShoppingTrendRequest::Device(serde_json::from_value(arguments)?),
            ShoppingTrendKind::Gender => ShoppingTrendRequest::Gender(serde_json::from_value(arguments)?),
            ShoppingTrendKind::Age => ShoppingTrendRequest::Age(serde_json::from_value(arguments)?),
            ShoppingTrendKind::Keywords => {
                ShoppingTrendRequest::Keywords(serde_json::from_value(arguments)?)
            }
        })
    }
}

/// A shopping insight request, tagged by breakdown
#[derive(Debug, Clone, PartialEq)]
pub enum ShoppingTrendRequest {
    Categories(ShoppingCategoriesParams),
    Device(CategoryBreakdownParams),
    Gender(CategoryBreakdownParams),
    Age(CategoryBreakdownParams),
    Keywords(ShoppingKeywordsParams),
}

impl ShoppingTrendRequest {
    pub fn kind(&self) -> ShoppingTrendKind {
        match self {
            ShoppingTrendRequest::Categories(_) => ShoppingTrendKind::Categories,
            ShoppingTrendRequest::Device(_) => ShoppingTrendKind::Device,
            ShoppingTrendRequest::Gender(_) => ShoppingTrendKind::Gender,
            ShoppingTrendRequest::Age(_) => ShoppingTrendKind::Age,
            ShoppingTrendRequest::Keywords(_) => ShoppingTrendKind::Keywords,
        }
    }

    /// Path below `/v1/datalab/shopping/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            ShoppingTrendRequest::Categories(_) => "categories",
            ShoppingTrendRequest::Device(_) => "category/device",
            ShoppingTrendRequest::Gender(_) => "category/gender",
            ShoppingTrendRequest::Age(_) => "category/age",
            ShoppingTrendRequest::Keywords(_) => "category/keywords",
        }
    }

    pub fn period(&self) -> &TrendPeriod {
        match self {
            ShoppingTrendRequest::Categories(p) => &p.period,
            ShoppingTrendRequest::Device(p)
            | ShoppingTrendRequest::Gender(p)
            | ShoppingTrendRequest::Age(p) => &p.period,
            ShoppingTrendRequest::Keywords(p) => &p.period,
        }
    }
}
