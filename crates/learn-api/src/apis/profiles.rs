use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{PatchedProfileRequest, Profile};

/// `/api/v0/profiles/`
#[derive(Debug, Clone)]
pub struct ProfilesApi {
    client: ApiClient,
}

impl ProfilesApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<Profile> {
        self.client.get("v0/profiles/me/", &()).await
    }

    pub async fn retrieve(&self, username: &str) -> Result<Profile> {
        self.client
            .get(&format!("v0/profiles/{username}/"), &())
            .await
    }

    pub async fn partial_update_me(&self, patch: &PatchedProfileRequest) -> Result<Profile> {
        self.client.patch("v0/profiles/me/", patch).await
    }
}
