use crate::client::ApiClient;
use crate::error::Result;
use crate::models::CurrentUser;

/// `/api/v0/users/`
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Raw `users/me/` call; a signed-out session answers 403
    pub async fn me(&self) -> Result<CurrentUser> {
        self.client.get("v0/users/me/", &()).await
    }
}
