//! `profiles`: learner profiles, including the signed-in learner's own

use learn_api::LearnApi;
use learn_api::models::{PatchedProfileRequest, Profile};

use super::{api_query, users};
use crate::client::{QueryClient, QueryDef, QueryFilter};
use crate::mutation::Mutation;

pub mod keys {
    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "profiles";

    #[must_use]
    pub fn root() -> QueryKey {
        QueryKey::new(NAMESPACE)
    }

    #[must_use]
    pub fn me() -> QueryKey {
        root().with("me")
    }

    #[must_use]
    pub fn detail(username: &str) -> QueryKey {
        root().with("detail").with(username)
    }
}

#[must_use]
pub fn me(api: &LearnApi) -> QueryDef<Profile> {
    let api = api.clone();
    api_query(keys::me(), move || {
        let api = api.clone();
        async move { api.profiles.me().await }
    })
}

#[must_use]
pub fn detail(api: &LearnApi, username: &str) -> QueryDef<Profile> {
    let api = api.clone();
    let owned = username.to_string();
    api_query(keys::detail(username), move || {
        let api = api.clone();
        let username = owned.clone();
        async move { api.profiles.retrieve(&username).await }
    })
}

/// Update the signed-in learner's profile.
///
/// The response replaces the cached own profile; the current user embeds
/// the profile, so it is refetched.
#[must_use]
pub fn update_me(api: &LearnApi, client: &QueryClient) -> Mutation<PatchedProfileRequest, Profile> {
    let api = api.clone();
    Mutation::new("profiles.update_me", client, move |patch: PatchedProfileRequest| {
        let api = api.clone();
        async move { Ok(api.profiles.partial_update_me(&patch).await?) }
    })
    .on_success(|cache, _, profile| match serde_json::to_value(profile) {
        Ok(value) => cache.set_query_data(&keys::me(), value),
        Err(err) => tracing::warn!(error = %err, "cannot cache updated profile"),
    })
    .on_settled(|cache, _, _| {
        cache.invalidate_queries(&QueryFilter::exact(users::keys::me()));
    })
}
