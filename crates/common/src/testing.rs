//! Testing utilities shared with dependent crates
//!
//! In-memory doubles for the [`crate::auth`] seams so pipeline tests
//! run deterministically without platform storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::traits::{CredentialStorage, SessionHooks};
use crate::error::SessionError;

/// In-memory [`CredentialStorage`] with optional failure injection.
#[derive(Default)]
pub struct MemoryCredentialStorage {
    value: Mutex<Option<String>>,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryCredentialStorage {
    /// Make every subsequent write fail with a storage error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// The last persisted value, if any write happened.
    pub async fn persisted(&self) -> Option<String> {
        self.value.lock().await.clone()
    }
}

#[async_trait]
impl CredentialStorage for MemoryCredentialStorage {
    async fn store_refresh_token(&self, token: &str) -> Result<(), SessionError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SessionError::Storage("injected write failure".to_string()));
        }
        *self.value.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn load_refresh_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.value.lock().await.clone())
    }
}

/// [`SessionHooks`] double that counts notifications.
#[derive(Default)]
pub struct RecordingHooks {
    replaced: AtomicUsize,
    logged_out: AtomicUsize,
}

impl RecordingHooks {
    /// Shared instance for handing to a pipeline under test.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of `tokens_replaced` notifications observed.
    pub fn replaced_count(&self) -> usize {
        self.replaced.load(Ordering::SeqCst)
    }

    /// Number of `logged_out` notifications observed.
    pub fn logged_out_count(&self) -> usize {
        self.logged_out.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHooks for RecordingHooks {
    async fn tokens_replaced(&self) {
        self.replaced.fetch_add(1, Ordering::SeqCst);
    }

    async fn logged_out(&self) {
        self.logged_out.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the testing doubles themselves.
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryCredentialStorage::default();

        assert_eq!(storage.load_refresh_token().await.unwrap(), None);

        storage.store_refresh_token("r1").await.unwrap();
        assert_eq!(storage.load_refresh_token().await.unwrap().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_memory_storage_failure_injection() {
        let storage = MemoryCredentialStorage::default();
        storage.fail_writes();

        let result = storage.store_refresh_token("r1").await;
        assert!(matches!(result, Err(SessionError::Storage(_))));
    }

    #[tokio::test]
    async fn test_recording_hooks_count() {
        let hooks = RecordingHooks::default();

        hooks.tokens_replaced().await;
        hooks.tokens_replaced().await;
        hooks.logged_out().await;

        assert_eq!(hooks.replaced_count(), 2);
        assert_eq!(hooks.logged_out_count(), 1);
    }
}
