//! Recovery Core - Delay-Modifier Recovery Foundation
//!
//! This crate provides the pure types and effect interfaces for tracking
//! queued social-recovery transactions on delay-gated recovery modules.
//! It contains no runtime: time and storage enter only through effect
//! traits, and every derived value is a pure function of its inputs.
//!
//! # Contents
//!
//! ## Domain Types
//! - `DelayModifier`: one deployed recovery module with its on-chain nonce and queue
//! - `RecoveryTransaction`: one guardian-queued recovery proposal
//! - `RecoveryState`: the snapshot supplied by the data layer, plus the `PendingSet`
//!
//! ## Derivations
//! - [`classify`]: next / executable / expired / pending / remaining time for one transaction
//! - [`aggregate`]: the head of every module's queue, flattened into the recovery queue
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `PhysicalTimeEffects`: wall-clock milliseconds
//! - `StorageEffects`: opaque key-value persistence
//!
//! ## Snapshot Publication
//! - `Dynamic<T>` / `Subscription<T>`: the data layer publishes, each session polls

#![forbid(unsafe_code)]

/// Recovery transaction classification
pub mod classify;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Recovery queue aggregation
pub mod queue;

/// Snapshot publication to advisory sessions
pub mod snapshot;


/// Delay modifier and recovery transaction types
pub mod types;

pub use classify::{
    classify, Countdown, EvaluationTime, RecoveryTxClassification, RecoveryTxStatus,
};
pub use effects::{PhysicalTimeEffects, StorageEffects, StorageError, TimeError};
pub use errors::{RecoveryError, Result};
pub use queue::{aggregate, classify_queue, ClassifiedTransaction};
pub use snapshot::{Dynamic, Subscription};
pub use types::{
    Address, Bytes, DelayModifier, PendingSet, RecoveryState, RecoveryTransaction,
    RecoveryTxArgs, TimestampMs, TxHash, U256,
};
