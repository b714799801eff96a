//! Simulated time effect handler for testing

use async_trait::async_trait;
use parking_lot::Mutex;
use recovery_core::effects::{PhysicalTimeEffects, TimeError};
use recovery_core::TimestampMs;
use std::sync::Arc;

/// Manually advanced wall clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct SimulatedTimeHandler {
    current_time: Arc<Mutex<TimestampMs>>,
}

impl SimulatedTimeHandler {
    /// Create a simulated time handler starting at the given time
    pub fn new(start_time_ms: TimestampMs) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start_time_ms)),
        }
    }

    /// Advance simulated time by the given duration
    pub fn advance_time(&self, duration_ms: u64) {
        let mut time = self.current_time.lock();
        *time = time.saturating_add(duration_ms);
    }

    /// Set the absolute simulated time
    pub fn set_time(&self, time_ms: TimestampMs) {
        *self.current_time.lock() = time_ms;
    }

    /// Current simulated time
    pub fn get_time(&self) -> TimestampMs {
        *self.current_time.lock()
    }
}

impl Default for SimulatedTimeHandler {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl PhysicalTimeEffects for SimulatedTimeHandler {
    async fn physical_time_ms(&self) -> Result<TimestampMs, TimeError> {
        Ok(self.get_time())
    }
}
