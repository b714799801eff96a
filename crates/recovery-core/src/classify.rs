//! # Recovery Transaction Classification
//!
//! Pure derivation of a queued transaction's state: whether it is the
//! module's next transaction, whether its review window has elapsed, whether
//! it has expired, whether it is locally pending, and how long remains.
//!
//! Validity and the countdown follow the polled clock value and move once per
//! tick. Expiry follows wall-clock time and must not wait for a tick.

use crate::types::{DelayModifier, PendingSet, RecoveryTransaction, TimestampMs};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Time inputs for a classification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationTime {
    /// Polled clock value; drives validity and the countdown
    pub clock_ms: TimestampMs,
    /// Wall-clock value at evaluation; drives expiry
    pub wall_ms: TimestampMs,
}

impl EvaluationTime {
    /// Both sources at the same instant
    pub const fn at(now_ms: TimestampMs) -> Self {
        Self {
            clock_ms: now_ms,
            wall_ms: now_ms,
        }
    }

    /// Polled clock and wall clock read separately
    pub const fn new(clock_ms: TimestampMs, wall_ms: TimestampMs) -> Self {
        Self { clock_ms, wall_ms }
    }
}

/// Derived state of one recovery transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RecoveryTxClassification {
    /// Queue nonce matches the module's current nonce
    pub is_next: bool,
    /// Next, past its review window, and not expired
    pub is_executable: bool,
    /// Validity window has closed
    pub is_expired: bool,
    /// Submitted locally and not yet reflected on-chain
    pub is_pending: bool,
    /// Seconds until the review window elapses, rounded up
    pub remaining_seconds: u64,
}

/// Classify `tx` against its module's state.
///
/// A missing `module_state` classifies the transaction as next; callers must
/// not tighten this into a strict lookup.
pub fn classify(
    tx: &RecoveryTransaction,
    module_state: Option<&DelayModifier>,
    pending: &PendingSet,
    now: EvaluationTime,
) -> RecoveryTxClassification {
    let is_valid = tx.valid_from.map_or(true, |from| from <= now.clock_ms);
    let is_expired = tx.expires_at.is_some_and(|at| at <= now.wall_ms);
    let is_next = module_state.map_or(true, |module| {
        module.address == tx.address && module.tx_nonce == tx.args.queue_nonce
    });

    let remaining_seconds = if is_valid {
        0
    } else {
        let remaining_ms = tx
            .valid_from
            .unwrap_or_default()
            .saturating_sub(now.clock_ms);
        remaining_ms.div_ceil(MS_PER_SECOND)
    };

    RecoveryTxClassification {
        is_next,
        is_executable: is_next && is_valid && !is_expired,
        is_expired,
        is_pending: pending.is_pending(&tx.args.tx_hash),
        remaining_seconds,
    }
}

/// Single display status for a classified transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryTxStatus {
    /// Submitted locally, awaiting on-chain confirmation
    Pending,
    /// Validity window closed
    Expired,
    /// Can be executed now
    Executable,
    /// Next in line, review window still running
    Queued,
    /// Another transaction must execute first
    Blocked,
}

impl RecoveryTxStatus {
    /// Short label for this status
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Processing",
            Self::Expired => "Expired",
            Self::Executable => "Executable",
            Self::Queued => "In review",
            Self::Blocked => "Waiting",
        }
    }
}

impl From<&RecoveryTxClassification> for RecoveryTxStatus {
    fn from(c: &RecoveryTxClassification) -> Self {
        if c.is_pending {
            Self::Pending
        } else if c.is_expired {
            Self::Expired
        } else if c.is_executable {
            Self::Executable
        } else if c.is_next {
            Self::Queued
        } else {
            Self::Blocked
        }
    }
}

impl std::fmt::Display for RecoveryTxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Remaining review time split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Countdown {
    /// Whole days
    pub days: u64,
    /// Hours past the last whole day
    pub hours: u64,
    /// Minutes past the last whole hour, rounded up
    pub minutes: u64,
}

impl Countdown {
    /// Split `seconds` into days, hours and minutes.
    ///
    /// Sub-minute remainders round up to the next minute.
    pub fn from_seconds(seconds: u64) -> Self {
        let minutes_total = seconds.div_ceil(SECONDS_PER_MINUTE);
        let seconds = minutes_total * SECONDS_PER_MINUTE;
        Self {
            days: seconds / SECONDS_PER_DAY,
            hours: (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
        }
    }

    /// Nothing left to wait
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Bytes, RecoveryTxArgs, TxHash, U256};
    use alloy_primitives::address;

    const MODULE: Address = address!("00000000000000000000000000000000000000aa");

    fn module(nonce: u64) -> DelayModifier {
        DelayModifier {
            address: MODULE,
            tx_nonce: U256::from(nonce),
            queue: Vec::new(),
            guardians: Vec::new(),
            tx_cooldown_secs: 0,
            tx_expiration_secs: 0,
        }
    }

    fn tx(nonce: u64, valid_from: Option<u64>, expires_at: Option<u64>) -> RecoveryTransaction {
        RecoveryTransaction {
            address: MODULE,
            transaction_hash: TxHash::with_last_byte(0x10),
            valid_from,
            expires_at,
            args: RecoveryTxArgs {
                queue_nonce: U256::from(nonce),
                tx_hash: TxHash::with_last_byte(0x20),
                to: Address::ZERO,
                value: U256::ZERO,
                data: Bytes::new(),
            },
        }
    }

    #[test]
    fn test_review_window_running() {
        let c = classify(
            &tx(0, Some(1000), Some(1000)),
            Some(&module(0)),
            &PendingSet::new(),
            EvaluationTime::at(0),
        );
        assert!(c.is_next);
        assert!(!c.is_executable);
        assert!(!c.is_expired);
        assert!(!c.is_pending);
        assert_eq!(c.remaining_seconds, 1);
    }

    #[test]
    fn test_executable_inside_validity_window() {
        let c = classify(
            &tx(0, Some(0), Some(2000)),
            Some(&module(0)),
            &PendingSet::new(),
            EvaluationTime::at(1000),
        );
        assert!(c.is_next);
        assert!(c.is_executable);
        assert!(!c.is_expired);
        assert_eq!(c.remaining_seconds, 0);
    }

    #[test]
    fn test_expired_is_not_executable() {
        let c = classify(
            &tx(0, Some(0), Some(0)),
            Some(&module(0)),
            &PendingSet::new(),
            EvaluationTime::at(1000),
        );
        assert!(c.is_next);
        assert!(c.is_expired);
        assert!(!c.is_executable);
        assert_eq!(c.remaining_seconds, 0);
    }

    #[test]
    fn test_pending_flag_leaves_other_fields_unchanged() {
        let t = tx(0, Some(0), Some(2000));
        let plain = classify(&t, Some(&module(0)), &PendingSet::new(), EvaluationTime::at(1000));

        let mut pending = PendingSet::new();
        pending.insert(t.args.tx_hash, true);
        let flagged = classify(&t, Some(&module(0)), &pending, EvaluationTime::at(1000));

        assert!(flagged.is_pending);
        assert_eq!(
            RecoveryTxClassification {
                is_pending: false,
                ..flagged
            },
            plain
        );
    }

    #[test]
    fn test_nonce_ahead_is_not_next() {
        let c = classify(
            &tx(1, Some(0), None),
            Some(&module(0)),
            &PendingSet::new(),
            EvaluationTime::at(1000),
        );
        assert!(!c.is_next);
        assert!(!c.is_executable);
    }

    #[test]
    fn test_nonce_behind_is_not_next() {
        let c = classify(
            &tx(1, None, None),
            Some(&module(2)),
            &PendingSet::new(),
            EvaluationTime::at(0),
        );
        assert!(!c.is_next);
    }

    #[test]
    fn test_large_nonces_compare_exactly() {
        let big = U256::from(u128::MAX) + U256::from(1);
        let mut m = module(0);
        m.tx_nonce = big;
        let mut t = tx(0, None, None);
        t.args.queue_nonce = big;
        assert!(classify(&t, Some(&m), &PendingSet::new(), EvaluationTime::at(0)).is_next);

        t.args.queue_nonce = big + U256::from(1);
        assert!(!classify(&t, Some(&m), &PendingSet::new(), EvaluationTime::at(0)).is_next);
    }

    #[test]
    fn test_missing_module_state_counts_as_next() {
        let c = classify(
            &tx(7, Some(0), None),
            None,
            &PendingSet::new(),
            EvaluationTime::at(10),
        );
        assert!(c.is_next);
        assert!(c.is_executable);
    }

    #[test]
    fn test_module_address_mismatch_is_not_next() {
        let mut m = module(0);
        m.address = address!("00000000000000000000000000000000000000cc");
        let c = classify(&tx(0, None, None), Some(&m), &PendingSet::new(), EvaluationTime::at(0));
        assert!(!c.is_next);
    }

    #[test]
    fn test_absent_valid_from_is_valid() {
        let c = classify(&tx(0, None, None), Some(&module(0)), &PendingSet::new(), EvaluationTime::at(0));
        assert!(c.is_executable);
        assert_eq!(c.remaining_seconds, 0);
    }

    #[test]
    fn test_remaining_seconds_rounds_up() {
        let c = classify(
            &tx(0, Some(10_001), None),
            Some(&module(0)),
            &PendingSet::new(),
            EvaluationTime::at(0),
        );
        assert_eq!(c.remaining_seconds, 11);
    }

    #[test]
    fn test_expiry_uses_wall_clock_not_polled_clock() {
        // Polled clock lags one tick behind wall time at the expiry boundary.
        let now = EvaluationTime::new(1_000, 61_000);
        let c = classify(&tx(0, Some(0), Some(60_000)), Some(&module(0)), &PendingSet::new(), now);
        assert!(c.is_expired);
        assert!(!c.is_executable);

        // Validity still follows the polled clock.
        let now = EvaluationTime::new(1_000, 61_000);
        let c = classify(&tx(0, Some(30_000), None), Some(&module(0)), &PendingSet::new(), now);
        assert_eq!(c.remaining_seconds, 29);
        assert!(!c.is_executable);
    }

    #[test]
    fn test_status_precedence() {
        let base = RecoveryTxClassification::default();
        assert_eq!(RecoveryTxStatus::from(&base), RecoveryTxStatus::Blocked);

        let queued = RecoveryTxClassification {
            is_next: true,
            remaining_seconds: 5,
            ..base
        };
        assert_eq!(RecoveryTxStatus::from(&queued), RecoveryTxStatus::Queued);

        let executable = RecoveryTxClassification {
            is_next: true,
            is_executable: true,
            ..base
        };
        assert_eq!(RecoveryTxStatus::from(&executable), RecoveryTxStatus::Executable);

        let expired = RecoveryTxClassification {
            is_next: true,
            is_expired: true,
            ..base
        };
        assert_eq!(RecoveryTxStatus::from(&expired), RecoveryTxStatus::Expired);

        let pending = RecoveryTxClassification {
            is_pending: true,
            ..expired
        };
        assert_eq!(RecoveryTxStatus::from(&pending), RecoveryTxStatus::Pending);
        assert_eq!(RecoveryTxStatus::Pending.to_string(), "Processing");
    }

    #[test]
    fn test_countdown_split() {
        assert!(Countdown::from_seconds(0).is_zero());
        assert_eq!(
            Countdown::from_seconds(1),
            Countdown {
                days: 0,
                hours: 0,
                minutes: 1
            }
        );
        assert_eq!(
            Countdown::from_seconds(2 * SECONDS_PER_DAY + 3 * SECONDS_PER_HOUR + 4 * 60),
            Countdown {
                days: 2,
                hours: 3,
                minutes: 4
            }
        );
        // 23h59m01s rounds up to a full day
        assert_eq!(
            Countdown::from_seconds(SECONDS_PER_DAY - 59),
            Countdown {
                days: 1,
                hours: 0,
                minutes: 0
            }
        );
    }
}
