use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resources::LearningResource;

/// Staff-curated ordered collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub item_count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Learner-curated ordered collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy_level: Option<String>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Membership of a resource in a learning path, with the child embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPathRelationship {
    pub id: i64,
    pub parent: i64,
    pub child: i64,
    #[serde(default)]
    pub position: i32,
    pub resource: LearningResource,
}

/// Membership of a resource in a user list, with the child embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListRelationship {
    pub id: i64,
    pub parent: i64,
    pub child: i64,
    #[serde(default)]
    pub position: i32,
    pub resource: LearningResource,
}

/// Body for creating a learning path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPathRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub topics: Vec<i64>,
}

/// Changed fields of a learning path; never carries the `id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedLearningPathRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<i64>>,
}

/// Body for creating a user list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<String>,
}

/// Changed fields of a user list; never carries the `id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedUserListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<String>,
}

/// Body for adding a resource to a learning path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPathRelationshipRequest {
    pub parent: i64,
    pub child: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Body for adding a resource to a user list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListRelationshipRequest {
    pub parent: i64,
    pub child: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Body for moving a learning path item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedLearningPathRelationshipRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Body for moving a user list item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedUserListRelationshipRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Paging for list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Paging for `.../items/` endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_patched_request_omits_unchanged_fields() {
        let patch = PatchedLearningPathRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "Renamed"}));
    }

    #[test]
    fn test_relationship_embeds_resource() {
        let rel: LearningPathRelationship = serde_json::from_value(json!({
            "id": 99,
            "parent": 7,
            "child": 42,
            "position": 1,
            "resource": {
                "id": 42,
                "resource_type": "course",
                "learning_path_parents": [{"id": 99, "parent": 7, "child": 42}]
            }
        }))
        .unwrap();
        assert_eq!(rel.resource.id, rel.child);
        assert_eq!(rel.resource.learning_path_parents[0].id, 99);
    }

    #[test]
    fn test_relationship_request_skips_position() {
        let body = LearningPathRelationshipRequest {
            parent: 7,
            child: 42,
            position: None,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"parent": 7, "child": 42})
        );
    }
}
