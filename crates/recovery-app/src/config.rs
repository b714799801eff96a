//! Advisory configuration
//!
//! Loaded from TOML or JSON, then overridden from `RECOVERY_*` environment
//! variables, then validated.

use recovery_core::RecoveryError;
use recovery_effects::FilesystemStorageHandler;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default clock interval; sub-minute precision is never displayed.
pub const DEFAULT_CLOCK_INTERVAL_MS: u64 = 60_000;

/// Durable key for proposal dismissals, kept apart from other app settings.
pub const DEFAULT_PROPOSAL_DISMISSALS_KEY: &str = "recovery.dismissed_proposals";

const APP_DIR_NAME: &str = "recovery-advisor";

/// Configuration for the advisory session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Clock tick interval in milliseconds
    pub clock_interval_ms: u64,
    /// Directory for durable dismissal storage
    pub storage_dir: PathBuf,
    /// Storage key for proposal dismissals
    pub proposal_dismissals_key: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: DEFAULT_CLOCK_INTERVAL_MS,
            storage_dir: default_storage_dir(),
            proposal_dismissals_key: DEFAULT_PROPOSAL_DISMISSALS_KEY.to_string(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./storage"))
}

impl AdvisoryConfig {
    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> Result<Self, RecoveryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecoveryError::internal(format!("Failed to read config file: {e}"))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| RecoveryError::invalid(format!("Invalid TOML: {e}"))),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RecoveryError::invalid(format!("Invalid JSON: {e}"))),
            _ => Err(RecoveryError::invalid("Unsupported file format")),
        }
    }

    /// Apply `RECOVERY_*` environment overrides
    pub fn merge_with_env(&mut self) -> Result<(), RecoveryError> {
        self.merge_with_vars(std::env::vars())
    }

    fn merge_with_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), RecoveryError> {
        for (key, value) in vars {
            match key.as_str() {
                "RECOVERY_CLOCK_INTERVAL_MS" => {
                    self.clock_interval_ms = value.parse().map_err(|_| {
                        RecoveryError::invalid("Invalid interval in RECOVERY_CLOCK_INTERVAL_MS")
                    })?;
                }
                "RECOVERY_STORAGE_DIR" => self.storage_dir = PathBuf::from(value),
                "RECOVERY_PROPOSAL_DISMISSALS_KEY" => self.proposal_dismissals_key = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Reject a zero interval or an empty dismissal key
    pub fn validate(&self) -> Result<(), RecoveryError> {
        if self.clock_interval_ms == 0 {
            return Err(RecoveryError::invalid(
                "Field 'clock_interval_ms' must be at least 1",
            ));
        }
        if self.proposal_dismissals_key.trim().is_empty() {
            return Err(RecoveryError::invalid(
                "Field 'proposal_dismissals_key' is required but missing",
            ));
        }
        Ok(())
    }

    /// Clock tick interval
    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    /// Filesystem storage rooted at `storage_dir`
    pub fn storage_handler(&self) -> FilesystemStorageHandler {
        FilesystemStorageHandler::new(&self.storage_dir)
    }
}
