// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared across the client core.

/// Errors surfaced to callers of the session manager.
///
/// `RegistrationFailed` and `LoginFailed` deliberately carry no detail; the
/// underlying [`AuthFailure`] is logged instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Registration failed")]
    RegistrationFailed,

    #[error("Login failed")]
    LoginFailed,

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::RegistrationFailed => "Registration failed. Please try again.",
            SessionError::LoginFailed => "Please check your email and password.",
            SessionError::Storage(_) => "Could not update saved credentials. Please try again.",
        }
    }
}

/// Why an auth round-trip failed. Log-only; never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("no response received from server: {0}")]
    Connectivity(String),

    #[error("server rejected request with status {status}")]
    Rejected { status: u16, body: String },

    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    #[error("could not build request: {0}")]
    InvalidRequest(String),

    #[error("could not persist token: {0}")]
    Storage(#[from] StorageError),
}

impl AuthFailure {
    /// Classify a reqwest error the way the request lifecycle saw it.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            AuthFailure::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            AuthFailure::MalformedResponse(err.to_string())
        } else {
            AuthFailure::Connectivity(err.to_string())
        }
    }
}

/// Credential store failures, kept distinct from "key absent".
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read credential {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write credential {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Failed to delete credential {key}: {reason}")]
    Delete { key: String, reason: String },

    #[error("Failed to seal or open credential: {0}")]
    Seal(String),
}

/// Boundary resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("No place matched the query")]
    NotFound,

    #[error("Geocoding service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed geocoding response: {0}")]
    MalformedResponse(String),
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
