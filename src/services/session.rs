// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager - authentication state machine.
//!
//! Handles:
//! - Restoring a persisted token on cold start
//! - Register / login against the backend
//! - Logout and credential removal
//! - Propagating the bearer token to the shared [`ApiClient`]
//!
//! Every mutation either fully succeeds (persisted, published, header
//! installed) or leaves the session untouched.

use crate::error::{AuthFailure, Result, SessionError};
use crate::models::{AuthStatus, Session};
use crate::services::api_client::{ApiClient, ApiError};
use crate::services::credential_store::CredentialStore;
use crate::services::token;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use validator::Validate;

/// Store key holding the session token.
pub const TOKEN_KEY: &str = "my-jwt";

/// Credentials sent to the auth endpoints.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Success body of the auth endpoints. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Clone, Copy)]
enum AuthEndpoint {
    Register,
    Login,
}

impl AuthEndpoint {
    fn path(self) -> &'static str {
        match self {
            AuthEndpoint::Register => "/auth/register",
            AuthEndpoint::Login => "/auth/login",
        }
    }

    fn name(self) -> &'static str {
        match self {
            AuthEndpoint::Register => "register",
            AuthEndpoint::Login => "login",
        }
    }

    fn failure(self) -> SessionError {
        match self {
            AuthEndpoint::Register => SessionError::RegistrationFailed,
            AuthEndpoint::Login => SessionError::LoginFailed,
        }
    }
}

/// Owns the session and everything that must change with it.
pub struct SessionManager {
    client: ApiClient,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    /// Serializes restore/register/login/logout.
    mutation: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Pending` state. Call [`Self::restore`] next.
    pub fn new(client: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            client,
            store,
            state,
            mutation: Mutex::new(()),
        }
    }

    /// The shared client carrying the session's default header.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Observe every published change to the session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    // ─── Restoration ─────────────────────────────────────────────────────────

    /// Restore a persisted session. Runs once; later calls return the current
    /// snapshot unchanged.
    ///
    /// Never fails: a storage read error is logged and treated as "no token".
    /// The stored token is trusted without asking the backend.
    pub async fn restore(&self) -> Session {
        let _guard = self.mutation.lock().await;

        let current = self.snapshot();
        if current.authenticated != AuthStatus::Pending {
            tracing::debug!("Session already restored");
            return current;
        }

        let stored = match self.store.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token, starting signed out");
                None
            }
        };

        match stored.filter(|t| !t.is_empty()) {
            Some(token) => {
                if token::is_expired_at(&token, Utc::now()) {
                    tracing::warn!(
                        "Restored token is past its expiry; it stays active until the backend rejects it"
                    );
                }
                self.client.set_bearer(&token).await;
                self.state.send_modify(|s| *s = s.signed_in(token));
                tracing::info!("Session restored from storage");
            }
            None => {
                self.state.send_modify(|s| *s = s.signed_out());
                tracing::info!("No stored session");
            }
        }

        self.snapshot()
    }

    // ─── Register / Login ────────────────────────────────────────────────────

    /// Create an account and sign in with it.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session> {
        self.authenticate(AuthEndpoint::Register, email, password)
            .await
    }

    /// Sign in with existing credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        self.authenticate(AuthEndpoint::Login, email, password)
            .await
    }

    async fn authenticate(
        &self,
        endpoint: AuthEndpoint,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let _guard = self.mutation.lock().await;

        match self.try_authenticate(endpoint, &credentials).await {
            Ok(session) => {
                tracing::info!(endpoint = endpoint.name(), "Signed in");
                Ok(session)
            }
            Err(failure) => {
                log_auth_failure(endpoint, &failure);
                Err(endpoint.failure())
            }
        }
    }

    /// The fallible part of register/login. Nothing is published until the
    /// token has been persisted.
    async fn try_authenticate(
        &self,
        endpoint: AuthEndpoint,
        credentials: &Credentials,
    ) -> std::result::Result<Session, AuthFailure> {
        credentials
            .validate()
            .map_err(|e| AuthFailure::InvalidRequest(e.to_string()))?;

        let response: TokenResponse = self
            .client
            .post_json(endpoint.path(), credentials)
            .await
            .map_err(|e| match e {
                ApiError::Transport(err) => AuthFailure::from_reqwest(err),
                ApiError::Status { status, body } => AuthFailure::Rejected { status, body },
            })?;

        if response.token.is_empty() {
            return Err(AuthFailure::MalformedResponse(
                "response carried an empty token".to_string(),
            ));
        }

        self.store.set(TOKEN_KEY, &response.token).await?;

        self.client.set_bearer(&response.token).await;
        self.state.send_modify(|s| *s = s.signed_in(response.token));
        Ok(self.snapshot())
    }

    // ─── Logout ──────────────────────────────────────────────────────────────

    /// Sign out. Idempotent.
    ///
    /// If the stored token cannot be deleted the session is left as it was and
    /// the storage error is returned so the caller can retry.
    pub async fn logout(&self) -> Result<Session> {
        let _guard = self.mutation.lock().await;

        if let Err(e) = self.store.delete(TOKEN_KEY).await {
            tracing::error!(error = %e, "Failed to delete stored token");
            return Err(e.into());
        }

        self.client.clear_bearer().await;
        self.state.send_modify(|s| *s = s.signed_out());
        tracing::info!("Signed out");
        Ok(self.snapshot())
    }

    // ─── Preferences ─────────────────────────────────────────────────────────

    /// Change the theme color. In-memory only; not persisted across restarts.
    pub fn set_theme_color(&self, color: impl Into<String>) {
        let color = color.into();
        tracing::debug!(color = %color, "Theme color updated");
        self.state.send_modify(|s| s.theme_color = color);
    }
}

/// Log why an auth call failed. Callers only ever see the opaque error.
fn log_auth_failure(endpoint: AuthEndpoint, failure: &AuthFailure) {
    let endpoint = endpoint.name();
    match failure {
        AuthFailure::Connectivity(msg) => {
            tracing::error!(endpoint, error = %msg, "No response received from server");
        }
        AuthFailure::Rejected { status, body } => {
            tracing::warn!(endpoint, status, "Server rejected credentials");
            tracing::debug!(endpoint, body = %body, "Rejection body");
        }
        AuthFailure::MalformedResponse(msg) => {
            tracing::error!(endpoint, error = %msg, "Malformed auth response");
        }
        AuthFailure::InvalidRequest(msg) => {
            tracing::warn!(endpoint, error = %msg, "Could not build auth request");
        }
        AuthFailure::Storage(e) => {
            tracing::error!(endpoint, error = %e, "Failed to persist token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::credential_store::MemoryCredentialStore;

    fn manager(store: MemoryCredentialStore) -> SessionManager {
        let client = ApiClient::new(&Config::default()).unwrap();
        SessionManager::new(client, Arc::new(store))
    }

    #[test]
    fn test_credentials_validation() {
        let ok = Credentials {
            email: "traveler@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = Credentials {
            email: "not-an-email".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = Credentials {
            email: "traveler@example.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[tokio::test]
    async fn test_invalid_credentials_fail_without_state_change() {
        let manager = manager(MemoryCredentialStore::new());
        manager.restore().await;
        let before = manager.snapshot();

        let err = manager.login("nope", "").await.unwrap_err();
        assert!(matches!(err, SessionError::LoginFailed));
        assert_eq!(manager.snapshot(), before);

        let err = manager.register("nope", "pw").await.unwrap_err();
        assert!(matches!(err, SessionError::RegistrationFailed));
        assert_eq!(manager.snapshot(), before);
    }

    #[tokio::test]
    async fn test_empty_stored_token_restores_signed_out() {
        let store = MemoryCredentialStore::new();
        store.set(TOKEN_KEY, "").await.unwrap();
        let manager = manager(store);

        let session = manager.restore().await;
        assert_eq!(session.authenticated, AuthStatus::Unauthenticated);
        assert_eq!(manager.client().default_authorization().await, None);
    }

    #[tokio::test]
    async fn test_restore_runs_once() {
        let store = MemoryCredentialStore::new();
        let manager = manager(store.clone());
        assert_eq!(manager.restore().await.authenticated, AuthStatus::Unauthenticated);

        // A token written after startup is not picked up by a second restore
        store.set(TOKEN_KEY, "late").await.unwrap();
        assert_eq!(manager.restore().await.authenticated, AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_theme_color_is_independent_of_auth() {
        let manager = manager(MemoryCredentialStore::new());
        manager.set_theme_color("#FF0000");

        let session = manager.restore().await;
        assert_eq!(session.theme_color, "#FF0000");
        assert_eq!(session.authenticated, AuthStatus::Unauthenticated);
    }
}
