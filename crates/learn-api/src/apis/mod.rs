//! One API struct per resource group, each method mapping to one endpoint

mod articles;
mod channels;
mod learning_paths;
mod learning_resources;
mod profiles;
mod program_letters;
mod subscriptions;
mod testimonials;
mod user_lists;
mod users;
mod widget_lists;

use std::sync::Arc;

use url::Url;

pub use articles::ArticlesApi;
pub use channels::ChannelsApi;
pub use learning_paths::LearningPathsApi;
pub use learning_resources::LearningResourcesApi;
pub use profiles::ProfilesApi;
pub use program_letters::ProgramLettersApi;
pub use subscriptions::SearchSubscriptionApi;
pub use testimonials::TestimonialsApi;
pub use user_lists::UserListsApi;
pub use users::UsersApi;
pub use widget_lists::WidgetListsApi;

use crate::client::ApiClient;
use crate::transport::Transport;

/// Every resource group, sharing one [`ApiClient`]
#[derive(Debug, Clone)]
pub struct LearnApi {
    client: ApiClient,
    pub learning_resources: LearningResourcesApi,
    pub learning_paths: LearningPathsApi,
    pub user_lists: UserListsApi,
    pub channels: ChannelsApi,
    pub articles: ArticlesApi,
    pub testimonials: TestimonialsApi,
    pub widget_lists: WidgetListsApi,
    pub subscriptions: SearchSubscriptionApi,
    pub program_letters: ProgramLettersApi,
    pub profiles: ProfilesApi,
    pub users: UsersApi,
}

impl LearnApi {
    pub fn new(base_url: Url, transport: Arc<dyn Transport>) -> Self {
        Self::from_client(ApiClient::new(base_url, transport))
    }

    pub fn from_client(client: ApiClient) -> Self {
        Self {
            learning_resources: LearningResourcesApi::new(client.clone()),
            learning_paths: LearningPathsApi::new(client.clone()),
            user_lists: UserListsApi::new(client.clone()),
            channels: ChannelsApi::new(client.clone()),
            articles: ArticlesApi::new(client.clone()),
            testimonials: TestimonialsApi::new(client.clone()),
            widget_lists: WidgetListsApi::new(client.clone()),
            subscriptions: SearchSubscriptionApi::new(client.clone()),
            program_letters: ProgramLettersApi::new(client.clone()),
            profiles: ProfilesApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            client,
        }
    }

    /// Underlying client, for following pagination cursors
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }
}
