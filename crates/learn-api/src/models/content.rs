use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CMS article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
    pub content: Value,
}

/// Changed fields of an article; never carries the `id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchedArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Filters for `GET /api/v1/articles/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Learner or partner quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub attestant_name: String,
    pub quote: String,
    #[serde(default)]
    pub channels: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /api/v0/testimonials/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialListParams {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub channels: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub offerors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One configured widget in a channel sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    #[serde(default)]
    pub id: Option<i64>,
    pub widget_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub configuration: Map<String, Value>,
}

/// Ordered widget configuration for a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetList {
    pub id: i64,
    #[serde(default)]
    pub widgets: Vec<WidgetInstance>,
}

/// Body for replacing the widgets of a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetListRequest {
    pub widgets: Vec<WidgetInstance>,
}

/// Letter issued for a completed program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramLetter {
    pub id: String,
    #[serde(default)]
    pub certificate: Map<String, Value>,
    #[serde(default)]
    pub template_fields: Map<String, Value>,
}
