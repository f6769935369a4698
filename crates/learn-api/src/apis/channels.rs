use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{
    Channel, ChannelCount, ChannelListParams, ChannelType, Paginated, PatchedChannelRequest,
};

/// `/api/v0/channels/`
#[derive(Debug, Clone)]
pub struct ChannelsApi {
    client: ApiClient,
}

impl ChannelsApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, id: i64) -> Result<Channel> {
        self.client.get(&format!("v0/channels/{id}/"), &()).await
    }

    pub async fn retrieve_by_name(&self, channel_type: ChannelType, name: &str) -> Result<Channel> {
        self.client
            .get(&format!("v0/channels/type/{channel_type}/{name}/"), &())
            .await
    }

    pub async fn list(&self, params: &ChannelListParams) -> Result<Paginated<Channel>> {
        self.client.get("v0/channels/", params).await
    }

    pub async fn counts(&self, channel_type: ChannelType) -> Result<Vec<ChannelCount>> {
        self.client
            .get(&format!("v0/channels/counts/{channel_type}/"), &())
            .await
    }

    pub async fn partial_update(&self, id: i64, patch: &PatchedChannelRequest) -> Result<Channel> {
        self.client.patch(&format!("v0/channels/{id}/"), patch).await
    }
}
