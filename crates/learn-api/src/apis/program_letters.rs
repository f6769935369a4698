use crate::client::ApiClient;
use crate::error::Result;
use crate::models::ProgramLetter;

/// `/api/v1/program_letters/`
#[derive(Debug, Clone)]
pub struct ProgramLettersApi {
    client: ApiClient,
}

impl ProgramLettersApi {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, id: &str) -> Result<ProgramLetter> {
        self.client
            .get(&format!("v1/program_letters/{id}/"), &())
            .await
    }
}
