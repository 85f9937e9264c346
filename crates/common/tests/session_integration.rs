//! Integration tests for the session store and credential storage
//!
//! Exercises the full lifecycle through the public API: hydration from
//! durable storage, token replacement, logout, and storage failure
//! handling.

use std::sync::Arc;

use ramble_common::testing::MemoryCredentialStorage;
use ramble_common::{CredentialStorage, SessionError, TokenPair, TokenStore};

/// A restarted process hydrates the refresh token from storage but
/// never an access token; the first request must earn one via refresh.
#[tokio::test]
async fn test_hydrate_restores_refresh_token_only() {
    let storage = Arc::new(MemoryCredentialStorage::default());
    storage.store_refresh_token("persisted").await.unwrap();

    let store = TokenStore::new(storage);
    store.hydrate().await.unwrap();

    assert_eq!(store.snapshot().await, TokenPair { access_token: None, refresh_token: Some("persisted".to_string()) });
    assert!(!store.is_authenticated().await);
    assert!(store.can_refresh().await);
}

/// An empty persisted value marks a logged-out session and is not
/// hydrated as a usable refresh token.
#[tokio::test]
async fn test_hydrate_ignores_empty_persisted_value() {
    let storage = Arc::new(MemoryCredentialStorage::default());
    storage.store_refresh_token("").await.unwrap();

    let store = TokenStore::new(storage);
    store.hydrate().await.unwrap();

    assert!(!store.can_refresh().await);
}

/// Replace updates memory and durably persists the refresh token;
/// clear persists the empty logged-out marker.
#[tokio::test]
async fn test_replace_and_clear_persist_through_storage() {
    let storage = Arc::new(MemoryCredentialStorage::default());
    let store = TokenStore::new(storage.clone());

    store.replace(TokenPair::new("access", "refresh-1")).await.unwrap();
    assert_eq!(storage.persisted().await.as_deref(), Some("refresh-1"));
    assert!(store.is_authenticated().await);

    store.clear().await.unwrap();
    assert_eq!(storage.persisted().await.as_deref(), Some(""));
    assert_eq!(store.snapshot().await, TokenPair::cleared());
}

/// A storage write failure surfaces as a storage error, but the
/// in-memory session keeps the new tokens so the process stays usable.
#[tokio::test]
async fn test_storage_failure_keeps_memory_state() {
    let storage = Arc::new(MemoryCredentialStorage::default());
    storage.fail_writes();
    let store = TokenStore::new(storage);

    let result = store.replace(TokenPair::new("access", "refresh")).await;

    assert!(matches!(result, Err(SessionError::Storage(_))));
    assert_eq!(store.access_token().await.as_deref(), Some("access"));
}
