//! Layer 3: Recovery Effect Handlers
//!
//! Stateless implementations of the effect traits declared in
//! `recovery-core`, plus the polling [`Clock`] that drives countdown
//! recomputation.
//!
//! - `time`: real and simulated wall-clock handlers
//! - `clock`: fixed-interval ticking timestamp with scoped teardown
//! - `storage`: in-memory and filesystem key-value handlers

#![forbid(unsafe_code)]

pub mod clock;
pub mod storage;
pub mod time;

pub use clock::{Clock, DEFAULT_CLOCK_INTERVAL};
pub use storage::{FilesystemStorageHandler, MemoryStorageHandler};
pub use time::{RealTimeHandler, SimulatedTimeHandler};
