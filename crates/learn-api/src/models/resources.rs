use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Course,
    Program,
    LearningPath,
    Podcast,
    PodcastEpisode,
    Video,
    VideoPlaylist,
    #[serde(other)]
    Other,
}

/// Membership stub embedded in `learning_path_parents`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicroLearningPathRelationship {
    pub id: i64,
    pub parent: i64,
    pub child: i64,
}

/// Membership stub embedded in `user_list_parents`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicroUserListRelationship {
    pub id: i64,
    pub parent: i64,
    pub child: i64,
}

/// A course, program, video, learning path, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub learning_path_parents: Vec<MicroLearningPathRelationship>,
    #[serde(default)]
    pub user_list_parents: Vec<MicroUserListRelationship>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Topic taxonomy entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub channel_url: Option<String>,
}

/// Filters for `GET /api/v1/learning_resources/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResourcesListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource_type: Vec<ResourceType>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub platform: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub topic: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortby: Option<String>,
}

/// Filters for `GET /api/v1/featured/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource_type: Vec<ResourceType>,
}

/// Filters for `GET /api/v1/topics/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_toplevel: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub id: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_topic_id: Option<i64>,
}

/// Body for `PATCH /api/v1/learning_resources/{id}/learning_paths/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLearningPathsRequest {
    pub learning_path_id: Vec<i64>,
}

/// Body for `PATCH /api/v1/learning_resources/{id}/userlists/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetUserListsRequest {
    pub userlist_id: Vec<i64>,
}
