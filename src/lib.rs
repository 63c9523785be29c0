// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Gezgin: client core for a city-exploring travel app
//!
//! This crate owns the session lifecycle (login, secure token storage,
//! restoration and header propagation) and resolves city names to map
//! boundaries through a geocoding service.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use error::StorageError;
use services::{ApiClient, BoundaryResolver, SealedFileStore, SessionManager};
use std::sync::Arc;

/// Shared client state.
pub struct AppState {
    pub config: Config,
    pub session: SessionManager,
    pub resolver: BoundaryResolver,
}

impl AppState {
    /// Wire up the client from `config` using the sealed on-disk store.
    ///
    /// The session starts `Pending`; call `session.restore()` before selecting
    /// a screen.
    pub fn new(config: Config) -> Result<Self, InitError> {
        let client = ApiClient::new(&config)?;
        let resolver = BoundaryResolver::new(&config)?;
        let store = SealedFileStore::new(&config.data_dir, &config.device_secret)?;

        Ok(Self {
            session: SessionManager::new(client, Arc::new(store)),
            resolver,
            config,
        })
    }
}

/// Errors while wiring up [`AppState`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
