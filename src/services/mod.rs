// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client core logic.

pub mod api_client;
pub mod credential_store;
pub mod geocoding;
pub mod session;
pub mod token;

pub use api_client::{ApiClient, ApiError};
pub use credential_store::{CredentialStore, MemoryCredentialStore, SealedFileStore};
pub use geocoding::BoundaryResolver;
pub use session::{SessionManager, TOKEN_KEY};
