use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{WidgetList, WidgetListRequest};

/// `/api/v0/widget_lists/`
#[derive(Debug, Clone)]
pub struct WidgetListsApi {
    client: ApiClient,
}

impl WidgetListsApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, id: i64) -> Result<WidgetList> {
        self.client.get(&format!("v0/widget_lists/{id}/"), &()).await
    }

    pub async fn update(&self, id: i64, request: &WidgetListRequest) -> Result<WidgetList> {
        self.client
            .patch(&format!("v0/widget_lists/{id}/"), request)
            .await
    }
}
