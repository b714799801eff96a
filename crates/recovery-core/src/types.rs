//! # Recovery Queue Types
//!
//! Snapshot types supplied by the data layer. The engine never mutates them;
//! it only derives classification values from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use alloy_primitives::{Address, Bytes, U256};

/// Transaction identifier (module-level or inner recovery call hash)
pub type TxHash = alloy_primitives::B256;

/// Unix time in milliseconds
pub type TimestampMs = u64;

/// Arguments of the module's `TransactionAdded` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryTxArgs {
    /// Position in the module's execution order
    pub queue_nonce: U256,
    /// Hash used to correlate with the pending set
    pub tx_hash: TxHash,
    /// Target of the recovery call
    #[serde(default)]
    pub to: Address,
    /// Native value sent with the recovery call
    #[serde(default)]
    pub value: U256,
    /// Recovery calldata
    #[serde(default)]
    pub data: Bytes,
}

/// A guardian-queued recovery transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryTransaction {
    /// Address of the owning delay modifier
    pub address: Address,
    /// Hash of the transaction that queued this recovery
    pub transaction_hash: TxHash,
    /// Review window end (ms since epoch)
    #[serde(default)]
    pub valid_from: Option<TimestampMs>,
    /// Validity window end (ms since epoch); `None` never expires
    #[serde(default)]
    pub expires_at: Option<TimestampMs>,
    /// Queue arguments
    pub args: RecoveryTxArgs,
}

/// One deployed delay modifier on the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayModifier {
    /// Module contract address
    pub address: Address,
    /// Current on-chain execution nonce
    pub tx_nonce: U256,
    /// Queued transactions, oldest first
    #[serde(default)]
    pub queue: Vec<RecoveryTransaction>,
    /// Guardians enabled on this module
    #[serde(default)]
    pub guardians: Vec<Address>,
    /// Review window in seconds
    #[serde(default)]
    pub tx_cooldown_secs: u64,
    /// Validity window in seconds (0 = never expires)
    #[serde(default)]
    pub tx_expiration_secs: u64,
}

impl DelayModifier {
    /// Head of the queue, if any
    pub fn head(&self) -> Option<&RecoveryTransaction> {
        self.queue.first()
    }

    /// Whether `wallet` is enabled as a guardian on this module
    pub fn has_guardian(&self, wallet: &Address) -> bool {
        self.guardians.contains(wallet)
    }
}

/// Transaction hashes submitted locally but not yet reflected on-chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingSet(HashMap<TxHash, bool>);

impl PendingSet {
    /// Create an empty pending set
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `hash` is present with a `true` marker
    pub fn is_pending(&self, hash: &TxHash) -> bool {
        self.0.get(hash).copied().unwrap_or(false)
    }

    /// Mark `hash` with `pending`
    pub fn insert(&mut self, hash: TxHash, pending: bool) {
        self.0.insert(hash, pending);
    }

    /// Forget `hash`. Returns whether it was present.
    pub fn remove(&mut self, hash: &TxHash) -> bool {
        self.0.remove(hash).is_some()
    }

    /// Number of tracked hashes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No hashes tracked
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TxHash> for PendingSet {
    fn from_iter<I: IntoIterator<Item = TxHash>>(iter: I) -> Self {
        Self(iter.into_iter().map(|hash| (hash, true)).collect())
    }
}

/// Recovery snapshot supplied by the data layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryState {
    /// Delay modifiers on the account; `None` while not yet loaded
    #[serde(default)]
    pub state: Option<Vec<DelayModifier>>,
    /// Locally submitted transactions
    #[serde(default)]
    pub pending: PendingSet,
}

impl RecoveryState {
    /// Loaded modules, empty while the snapshot is not loaded
    pub fn modules(&self) -> &[DelayModifier] {
        self.state.as_deref().unwrap_or(&[])
    }

    /// Module with the given address
    pub fn module(&self, address: &Address) -> Option<&DelayModifier> {
        self.modules().iter().find(|m| &m.address == address)
    }

    /// Modules on which `wallet` is a guardian
    pub fn guardian_modules<'a>(
        &'a self,
        wallet: &'a Address,
    ) -> impl Iterator<Item = &'a DelayModifier> + 'a {
        self.modules().iter().filter(move |m| m.has_guardian(wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    const MODULE: Address = address!("00000000000000000000000000000000000000aa");
    const GUARDIAN: Address = address!("00000000000000000000000000000000000000bb");

    #[test]
    fn test_pending_set_requires_true_marker() {
        let hash = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        let mut pending = PendingSet::new();
        assert!(!pending.is_pending(&hash));

        pending.insert(hash, false);
        assert!(!pending.is_pending(&hash));

        pending.insert(hash, true);
        assert!(pending.is_pending(&hash));

        assert!(pending.remove(&hash));
        assert!(!pending.remove(&hash));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_from_data_layer_shape() {
        let json = r#"{
            "state": [{
                "address": "0x00000000000000000000000000000000000000aa",
                "txNonce": "0x2",
                "guardians": ["0x00000000000000000000000000000000000000bb"],
                "txCooldownSecs": 86400,
                "queue": [{
                    "address": "0x00000000000000000000000000000000000000aa",
                    "transactionHash": "0x0000000000000000000000000000000000000000000000000000000000000010",
                    "validFrom": 1000,
                    "expiresAt": null,
                    "args": {
                        "queueNonce": "0x2",
                        "txHash": "0x0000000000000000000000000000000000000000000000000000000000000020"
                    }
                }]
            }],
            "pending": {
                "0x0000000000000000000000000000000000000000000000000000000000000020": true
            }
        }"#;

        let state: RecoveryState = serde_json::from_str(json).unwrap();
        let module = state.module(&MODULE).unwrap();
        assert_eq!(module.tx_nonce, U256::from(2));
        assert_eq!(module.tx_cooldown_secs, 86_400);
        assert_eq!(module.tx_expiration_secs, 0);

        let head = module.head().unwrap();
        assert_eq!(head.valid_from, Some(1000));
        assert_eq!(head.expires_at, None);
        assert!(state.pending.is_pending(&head.args.tx_hash));
        assert_eq!(state.guardian_modules(&GUARDIAN).count(), 1);
    }

    #[test]
    fn test_unloaded_snapshot_has_no_modules() {
        let state = RecoveryState::default();
        assert!(state.modules().is_empty());
        assert!(state.module(&MODULE).is_none());
    }
}
