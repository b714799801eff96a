//! Time effect handlers
//!
//! Implementations of `PhysicalTimeEffects` from `recovery-core`.

pub mod real;
pub mod simulated;

pub use real::RealTimeHandler;
pub use simulated::SimulatedTimeHandler;
