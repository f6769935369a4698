//! `users`: the current session's user

use learn_api::LearnApi;
use learn_api::models::CurrentUser;

use crate::client::QueryDef;

pub mod keys {
    use crate::key::QueryKey;

    pub const NAMESPACE: &str = "users";

    #[must_use]
    pub fn me() -> QueryKey {
        QueryKey::new(NAMESPACE).with("me")
    }
}

/// The signed-in user.
///
/// The endpoint answers 403 to a signed-out session; that is read as an
/// anonymous user, not an error. Every other failure propagates.
#[must_use]
pub fn me(api: &LearnApi) -> QueryDef<CurrentUser> {
    let api = api.clone();
    QueryDef::new(keys::me(), move || {
        let api = api.clone();
        async move {
            match api.users.me().await {
                Ok(user) => Ok(user),
                Err(err) if err.is_forbidden() => {
                    tracing::debug!("current user is not authenticated");
                    Ok(CurrentUser::anonymous())
                }
                Err(err) => Err(err.into()),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use learn_api::{MockTransport, Method};
    use serde_json::json;

    use super::*;

    fn api(mock: &MockTransport) -> LearnApi {
        LearnApi::new(
            "http://learn.test/api/".parse().unwrap(),
            Arc::new(mock.clone()),
        )
    }

    #[tokio::test]
    async fn test_forbidden_means_anonymous() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/v0/users/me/", 403, json!({"detail": "forbidden"}));

        let value = me(&api(&mock)).fetch_uncached().await.unwrap();
        let user: CurrentUser = serde_json::from_value(value).unwrap();
        assert!(!user.is_authenticated);
        assert_eq!(user, CurrentUser::anonymous());
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/v0/users/me/", 500, json!({}));

        let err = me(&api(&mock)).fetch_uncached().await.unwrap_err();
        assert_eq!(err.api_error().and_then(learn_api::ApiError::status_code), Some(500));
    }

    #[tokio::test]
    async fn test_authenticated_user() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/api/v0/users/me/",
            200,
            json!({"id": 1, "username": "ada", "is_authenticated": true}),
        );

        let value = me(&api(&mock)).fetch_uncached().await.unwrap();
        assert_eq!(value["username"], "ada");
        assert_eq!(value["is_authenticated"], true);
    }
}
