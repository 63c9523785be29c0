// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend API client with a default `Authorization` slot.
//!
//! The bearer token attached to outgoing requests can only be changed by the
//! session manager; everything else gets read access.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Backend API client.
///
/// Cloning is cheap and every clone shares the same default-header slot.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client for the backend configured in `config`.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// Current default `Authorization` header value, if any.
    pub async fn default_authorization(&self) -> Option<String> {
        self.bearer
            .read()
            .await
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }

    pub(crate) async fn set_bearer(&self, token: &str) {
        *self.bearer.write().await = Some(token.to_string());
    }

    pub(crate) async fn clear_bearer(&self) {
        *self.bearer.write().await = None;
    }

    /// Start a GET request to `path` with the default header attached.
    pub async fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(self.url(path));
        self.authorize(request).await
    }

    /// Start a POST request to `path` with the default header attached.
    pub async fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.post(self.url(path));
        self.authorize(request).await
    }

    /// POST a JSON body and decode a JSON response.
    ///
    /// Non-2xx responses are returned as [`ApiError::Status`] with the body
    /// text for diagnostics.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .post(path)
            .await
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        response.json().await.map_err(ApiError::Transport)
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&Config::default()).expect("client should build")
    }

    #[tokio::test]
    async fn test_default_authorization_follows_bearer() {
        let client = client();
        assert_eq!(client.default_authorization().await, None);

        client.set_bearer("abc").await;
        assert_eq!(
            client.default_authorization().await.as_deref(),
            Some("Bearer abc")
        );

        client.clear_bearer().await;
        assert_eq!(client.default_authorization().await, None);
    }

    #[tokio::test]
    async fn test_clones_share_header_slot() {
        let client = client();
        let other = client.clone();
        client.set_bearer("shared").await;
        assert_eq!(
            other.default_authorization().await.as_deref(),
            Some("Bearer shared")
        );
    }

    #[test]
    fn test_url_joins_paths() {
        let client = client();
        assert_eq!(
            client.url("/auth/login"),
            "http://localhost:3000/api/auth/login"
        );
        assert_eq!(
            client.url("auth/register"),
            "http://localhost:3000/api/auth/register"
        );
    }
}
