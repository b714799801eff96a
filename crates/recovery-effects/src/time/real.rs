//! Real time effect handler for production use

use async_trait::async_trait;
use recovery_core::effects::{PhysicalTimeEffects, TimeError};
use recovery_core::TimestampMs;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock handler backed by the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Handler reading `SystemTime`
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn physical_time_ms(&self) -> Result<TimestampMs, TimeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::OperationFailed {
                reason: format!("System clock before Unix epoch: {e}"),
            })?;
        u64::try_from(elapsed.as_millis()).map_err(|_| TimeError::OperationFailed {
            reason: "Timestamp exceeds u64 milliseconds".to_string(),
        })
    }
}
