//! Layer 1: Core Effect Trait Definitions
//!
//! Pure trait definitions for the side effects the recovery engine needs.
//! This module defines **what** effects can be performed; handlers in
//! `recovery-effects` define **how**.
//!
//! - `PhysicalTimeEffects`: wall-clock time for expiry checks and clock seeding
//! - `StorageEffects`: opaque key-value persistence for durable dismissals
//!
//! All code that touches time or storage is parameterized by these traits so
//! tests can swap in simulated time and in-memory storage.

use crate::types::TimestampMs;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// The time source returned an unusable value
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Underlying failure
        reason: String,
    },
}

/// Wall-clock time source.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current Unix time in milliseconds.
    async fn physical_time_ms(&self) -> Result<TimestampMs, TimeError>;
}

#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    async fn physical_time_ms(&self) -> Result<TimestampMs, TimeError> {
        (**self).physical_time_ms().await
    }
}

/// Error type for storage operations.
///
/// Callers of the durable dismissal registry log these and fail open.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Key is empty or not usable by the backend
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Reading an existing value failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Writing a value failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Removing a value failed
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

/// Opaque key-value storage.
///
/// Values are raw bytes; callers own the encoding.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Retrieve the value under `key`, or `None` if absent.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove `key`. Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

#[async_trait]
impl<T: StorageEffects + ?Sized> StorageEffects for Arc<T> {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        (**self).store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).retrieve(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key).await
    }
}
