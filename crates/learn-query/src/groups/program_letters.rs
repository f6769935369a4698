//! `programLetters`: congratulation letters keyed by an opaque id

use learn_api::LearnApi;
use learn_api::models::ProgramLetter;

use super::api_query;
use crate::client::QueryDef;

pub mod keys {
    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "programLetters";

    #[must_use]
    pub fn detail(id: &str) -> QueryKey {
        QueryKey::new(NAMESPACE).with("detail").with(id)
    }
}

#[must_use]
pub fn detail(api: &LearnApi, id: &str) -> QueryDef<ProgramLetter> {
    let api = api.clone();
    let owned = id.to_string();
    api_query(keys::detail(id), move || {
        let api = api.clone();
        let id = owned.clone();
        async move { api.program_letters.retrieve(&id).await }
    })
}
