use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signed-in user, or an anonymous placeholder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_learning_path_editor: bool,
    #[serde(default)]
    pub is_article_editor: bool,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl CurrentUser {
    /// What the API's 403 on `users/me/` means: nobody is signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Learner profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed_onboarding: bool,
    #[serde(default)]
    pub topic_interests: Vec<i64>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Changed profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_onboarding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_interests: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

/// A saved search the learner is subscribed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercolateQuery {
    pub id: i64,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub original_query: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for listing subscriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

/// Search parameters identifying one subscription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCheckParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub topic: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub department: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub offered_by: Vec<String>,
}

/// Body for subscribing to a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercolateQuerySubscriptionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_anonymous_user() {
        let user = CurrentUser::anonymous();
        assert!(!user.is_authenticated);
        assert!(user.id.is_none());
        assert!(user.profile.is_none());
    }

    #[test]
    fn test_current_user_parses_profile() {
        let user: CurrentUser = serde_json::from_value(json!({
            "id": 1,
            "username": "learner",
            "is_authenticated": true,
            "profile": {"name": "Ada", "completed_onboarding": true}
        }))
        .unwrap();
        assert!(user.is_authenticated);
        assert!(user.profile.unwrap().completed_onboarding);
    }
}
