// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use gezgin_client::config::Config;
use gezgin_client::error::StorageError;
use gezgin_client::services::{
    ApiClient, BoundaryResolver, CredentialStore, MemoryCredentialStore, SessionManager,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Config pointing both backend and geocoder at a mock server.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        api_base_url: format!("{}/api", server.uri()),
        geocoder_base_url: server.uri(),
        request_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

/// Session manager backed by an in-memory store.
#[allow(dead_code)]
pub fn test_session(server: &MockServer, store: MemoryCredentialStore) -> SessionManager {
    let client = ApiClient::new(&test_config(server)).expect("client should build");
    SessionManager::new(client, Arc::new(store))
}

/// Boundary resolver talking to the mock geocoder.
#[allow(dead_code)]
pub fn test_resolver(server: &MockServer) -> BoundaryResolver {
    BoundaryResolver::new(&test_config(server)).expect("resolver should build")
}

/// Store whose operations can be made to fail on demand.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryCredentialStore,
    pub fail_reads: Arc<AtomicBool>,
    pub fail_writes: Arc<AtomicBool>,
    pub fail_deletes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "simulated read failure".to_string(),
            });
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "simulated write failure".to_string(),
            });
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Delete {
                key: key.to_string(),
                reason: "simulated delete failure".to_string(),
            });
        }
        self.inner.delete(key).await
    }
}

/// Session manager backed by a [`FlakyStore`].
#[allow(dead_code)]
pub fn test_session_with_flaky_store(server: &MockServer, store: FlakyStore) -> SessionManager {
    let client = ApiClient::new(&test_config(server)).expect("client should build");
    SessionManager::new(client, Arc::new(store))
}
