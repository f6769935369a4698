//! Request and response bodies
//!
//! Only the fields the client reasons about are typed. Everything else the
//! server sends is kept in a flattened `extra` map so a resource can be
//! patched in a cache and serialized back without losing data.

mod channels;
mod content;
mod lists;
mod resources;
mod users;

use serde::{Deserialize, Serialize};

pub use channels::{Channel, ChannelCount, ChannelListParams, ChannelType, PatchedChannelRequest};
pub use content::{
    Article, ArticleListParams, ArticleRequest, PatchedArticleRequest, ProgramLetter, Testimonial,
    TestimonialListParams, WidgetInstance, WidgetList, WidgetListRequest,
};
pub use lists::{
    LearningPath, LearningPathRelationship, LearningPathRelationshipRequest, LearningPathRequest,
    ListItemsParams, ListParams, PatchedLearningPathRelationshipRequest,
    PatchedLearningPathRequest, PatchedUserListRelationshipRequest, PatchedUserListRequest,
    UserList, UserListRelationship, UserListRelationshipRequest, UserListRequest,
};
pub use resources::{
    FeaturedListParams, LearningResource, LearningResourcesListParams,
    MicroLearningPathRelationship, MicroUserListRelationship, ResourceType,
    SetLearningPathsRequest, SetUserListsRequest, Topic, TopicsListParams,
};
pub use users::{
    CurrentUser, PatchedProfileRequest, PercolateQuery, PercolateQuerySubscriptionRequest,
    Profile, SubscriptionCheckParams, SubscriptionListParams,
};

/// One page of a list endpoint
///
/// `next`/`previous` are absolute URLs supplied by the server; `None` on the
/// last (first) page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}
