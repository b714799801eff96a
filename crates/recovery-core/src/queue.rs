//! # Recovery Queue
//!
//! Flattens every module's queue head into the single recovery queue that
//! advisories are computed from. Only a head can ever be next for its
//! module, so the rest of each queue is never aggregated.

use crate::classify::{classify, EvaluationTime, RecoveryTxClassification, RecoveryTxStatus};
use crate::types::{RecoveryState, RecoveryTransaction};
use serde::{Deserialize, Serialize};

/// Head transaction of every module, in module order.
///
/// Modules with an empty queue contribute nothing.
pub fn aggregate(state: &RecoveryState) -> Vec<RecoveryTransaction> {
    state
        .modules()
        .iter()
        .filter_map(|module| module.head().cloned())
        .collect()
}

/// A queue entry with its derived state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    /// Queue head
    pub tx: RecoveryTransaction,
    /// Derived state at the evaluation time
    pub classification: RecoveryTxClassification,
    /// Display status derived from `classification`
    pub status: RecoveryTxStatus,
}

/// Classify every aggregated head against its own module.
///
/// The module is looked up by the transaction's address; a transaction whose
/// module is missing from the snapshot is classified without module state.
pub fn classify_queue(state: &RecoveryState, now: EvaluationTime) -> Vec<ClassifiedTransaction> {
    aggregate(state)
        .into_iter()
        .map(|tx| {
            let classification = classify(&tx, state.module(&tx.address), &state.pending, now);
            let status = RecoveryTxStatus::from(&classification);
            ClassifiedTransaction {
                tx,
                classification,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Bytes, DelayModifier, PendingSet, RecoveryTxArgs, TxHash, U256};

    fn module(byte: u8, nonce: u64, queue_nonces: &[u64]) -> DelayModifier {
        let address = Address::with_last_byte(byte);
        DelayModifier {
            address,
            tx_nonce: U256::from(nonce),
            queue: queue_nonces
                .iter()
                .map(|n| RecoveryTransaction {
                    address,
                    transaction_hash: TxHash::with_last_byte(byte),
                    valid_from: Some(0),
                    expires_at: None,
                    args: RecoveryTxArgs {
                        queue_nonce: U256::from(*n),
                        tx_hash: TxHash::left_padding_from(&[byte, *n as u8]),
                        to: Address::ZERO,
                        value: U256::ZERO,
                        data: Bytes::new(),
                    },
                })
                .collect(),
            guardians: Vec::new(),
            tx_cooldown_secs: 0,
            tx_expiration_secs: 0,
        }
    }

    #[test]
    fn test_aggregate_takes_head_of_each_module_in_order() {
        let state = RecoveryState {
            state: Some(vec![module(1, 0, &[0, 1, 2]), module(2, 5, &[5, 6])]),
            pending: PendingSet::new(),
        };

        let queue = aggregate(&state);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].address, Address::with_last_byte(1));
        assert_eq!(queue[0].args.queue_nonce, U256::ZERO);
        assert_eq!(queue[1].address, Address::with_last_byte(2));
        assert_eq!(queue[1].args.queue_nonce, U256::from(5));
    }

    #[test]
    fn test_empty_queues_contribute_nothing() {
        let state = RecoveryState {
            state: Some(vec![module(1, 0, &[]), module(2, 0, &[0]), module(3, 0, &[])]),
            pending: PendingSet::new(),
        };
        let queue = aggregate(&state);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].address, Address::with_last_byte(2));

        let all_empty = RecoveryState {
            state: Some(vec![module(1, 0, &[]), module(2, 0, &[])]),
            pending: PendingSet::new(),
        };
        assert!(aggregate(&all_empty).is_empty());
        assert!(aggregate(&RecoveryState::default()).is_empty());
    }

    #[test]
    fn test_classify_queue_uses_each_transactions_own_module() {
        // Module 1 head is next; module 2's head is one behind its nonce.
        let state = RecoveryState {
            state: Some(vec![module(1, 0, &[0]), module(2, 4, &[3])]),
            pending: PendingSet::new(),
        };

        let classified = classify_queue(&state, EvaluationTime::at(1));
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].status, RecoveryTxStatus::Executable);
        assert!(!classified[1].classification.is_next);
        assert_eq!(classified[1].status, RecoveryTxStatus::Blocked);
    }
}
