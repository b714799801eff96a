//! Pending set maintenance
//!
//! Locally submitted recovery transactions are marked pending as soon as
//! they are processing and cleared once the submission resolves, so the
//! classifier reports them as in flight before the on-chain snapshot
//! catches up.

use recovery_core::{Dynamic, PendingSet, RecoveryState, TxHash};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Local submission lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PendingEvent {
    /// Submitted and awaiting inclusion
    Processing { tx_hash: TxHash },
    /// Included on-chain
    Processed { tx_hash: TxHash },
    /// Submission failed before inclusion
    Failed { tx_hash: TxHash },
    /// Included but reverted
    Reverted { tx_hash: TxHash },
}

impl PendingEvent {
    /// Inner recovery call hash the event refers to
    pub fn tx_hash(&self) -> &TxHash {
        match self {
            Self::Processing { tx_hash }
            | Self::Processed { tx_hash }
            | Self::Failed { tx_hash }
            | Self::Reverted { tx_hash } => tx_hash,
        }
    }

    /// Apply to `pending`. Returns whether the set changed.
    pub fn apply(&self, pending: &mut PendingSet) -> bool {
        match self {
            Self::Processing { tx_hash } => {
                let changed = !pending.is_pending(tx_hash);
                pending.insert(*tx_hash, true);
                changed
            }
            Self::Processed { tx_hash } | Self::Failed { tx_hash } | Self::Reverted { tx_hash } => {
                pending.remove(tx_hash)
            }
        }
    }
}

/// Applies submission events to the published recovery snapshot
#[derive(Debug, Clone)]
pub struct PendingTracker {
    source: Dynamic<RecoveryState>,
}

impl PendingTracker {
    /// Tracker publishing into `source`
    pub fn new(source: Dynamic<RecoveryState>) -> Self {
        Self { source }
    }

    /// Apply `event`, publishing a new snapshot only if the set changed.
    pub fn apply(&self, event: PendingEvent) -> bool {
        let mut state = self.source.get();
        if !event.apply(&mut state.pending) {
            return false;
        }
        debug!(tx_hash = %event.tx_hash(), ?event, pending = state.pending.len(), "pending set updated");
        self.source.set(state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_then_resolution() {
        let hash = TxHash::with_last_byte(1);
        let mut pending = PendingSet::new();

        assert!(PendingEvent::Processing { tx_hash: hash }.apply(&mut pending));
        assert!(!PendingEvent::Processing { tx_hash: hash }.apply(&mut pending));
        assert!(pending.is_pending(&hash));

        assert!(PendingEvent::Reverted { tx_hash: hash }.apply(&mut pending));
        assert!(!pending.is_pending(&hash));
        assert!(!PendingEvent::Failed { tx_hash: hash }.apply(&mut pending));
    }

    #[test]
    fn test_tracker_publishes_only_on_change() {
        let source = Dynamic::new(RecoveryState::default());
        let mut sub = source.subscribe();
        let tracker = PendingTracker::new(source.clone());
        let hash = TxHash::with_last_byte(7);

        assert!(!tracker.apply(PendingEvent::Processed { tx_hash: hash }));
        assert!(sub.poll().is_none());

        assert!(tracker.apply(PendingEvent::Processing { tx_hash: hash }));
        let published = sub.poll().unwrap();
        assert!(published.pending.is_pending(&hash));

        assert!(tracker.apply(PendingEvent::Processed { tx_hash: hash }));
        assert!(sub.poll().unwrap().pending.is_empty());
    }
}
