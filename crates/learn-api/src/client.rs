//! Shared request plumbing for the per-group API structs

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, Result};
use crate::transport::{ApiRequest, Method, Transport};

/// Base URL plus transport
///
/// Cheap to clone; every resource-group API holds one.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("transport", &self.transport)
            .finish()
    }
}

impl ApiClient {
    /// The base URL must end in `/` or it is treated as a directory anyway.
    pub fn new(mut base_url: Url, transport: Arc<dyn Transport>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            transport,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (leading `/` optional) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Resolve a path and append `params` as a query string.
    pub fn url_with_query<P: Serialize + ?Sized>(&self, path: &str, params: &P) -> Result<Url> {
        let mut url = self.url(path)?;
        append_query(&mut url, params)?;
        Ok(url)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>> {
        let url = request.url.to_string();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(ApiError::status(response.status, url, response.body))
        }
    }

    fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T> {
        Ok(serde_json::from_value(body.unwrap_or(Value::Null))?)
    }

    /// `GET path?params`
    pub async fn get<P, T>(&self, path: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url_with_query(path, params)?;
        Self::decode(self.execute(ApiRequest::new(Method::Get, url)).await?)
    }

    /// `GET` an absolute URL exactly as the server supplied it.
    ///
    /// Used for pagination cursors: the `next` link is followed verbatim
    /// rather than rebuilt from parameters.
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let url = Url::parse(url)?;
        Self::decode(self.execute(ApiRequest::new(Method::Get, url)).await?)
    }

    /// `POST path` with a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let request = ApiRequest::new(Method::Post, url).with_body(serde_json::to_value(body)?);
        Self::decode(self.execute(request).await?)
    }

    /// `POST path?params` with a JSON body
    pub async fn post_with_query<P, B, T>(&self, path: &str, params: &P, body: &B) -> Result<T>
    where
        P: Serialize + ?Sized + Sync,
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url_with_query(path, params)?;
        let request = ApiRequest::new(Method::Post, url).with_body(serde_json::to_value(body)?);
        Self::decode(self.execute(request).await?)
    }

    /// `POST path` that answers with no content
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        let request = ApiRequest::new(Method::Post, url).with_body(serde_json::to_value(body)?);
        self.execute(request).await.map(|_| ())
    }

    /// `PATCH path` with a JSON body
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let request = ApiRequest::new(Method::Patch, url).with_body(serde_json::to_value(body)?);
        Self::decode(self.execute(request).await?)
    }

    /// `DELETE path`; the server returns no body
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        self.execute(ApiRequest::new(Method::Delete, url))
            .await
            .map(|_| ())
    }
}

/// Append serialized params to `url`.
///
/// Params must serialize to an object (or unit/null for none). `null`
/// fields are skipped, arrays become repeated keys.
pub fn append_query<P: Serialize + ?Sized>(url: &mut Url, params: &P) -> Result<()> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        other => {
            return Err(ApiError::invalid_url(format!(
                "query params must be an object, got {other}"
            )));
        }
    };

    if map.values().all(Value::is_null) {
        return Ok(());
    }

    let mut pairs = url.query_pairs_mut();
    for (key, value) in &map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.append_pair(key, &scalar_to_string(item));
                }
            }
            other => {
                pairs.append_pair(key, &scalar_to_string(other));
            }
        }
    }
    drop(pairs);
    Ok(())
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
