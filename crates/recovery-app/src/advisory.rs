//! # Recovery Advisory Controller
//!
//! Chooses which advisory dialog, if any, is active:
//!
//! | route     | queue     | guardian | advisory      |
//! |-----------|-----------|----------|---------------|
//! | other     | any       | any      | `Hidden`      |
//! | sidebar   | non-empty | any      | `InProgress`  |
//! | sidebar   | empty     | yes      | `Proposal`    |
//! | sidebar   | empty     | no       | `Hidden`      |
//!
//! The controller only computes eligibility. Whether the connected wallet
//! should see the advisory at all, and whether it was already dismissed, is
//! applied on top by [`AdvisoryController::presentable`].

use crate::dismissals::DismissalLedger;
use recovery_core::effects::StorageEffects;
use recovery_core::{Address, RecoveryTransaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which advisory is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisoryKind {
    /// Nothing shown
    #[default]
    Hidden,
    /// Recovery underway
    InProgress,
    /// Suggest setting up recovery
    Proposal,
}

/// Active advisory. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "item", rename_all = "kebab-case")]
pub enum Advisory {
    /// No advisory is active
    #[default]
    Hidden,
    /// A recovery is queued; carries the first queue entry
    InProgress(RecoveryTransaction),
    /// No recovery is queued and the account has a guardian
    Proposal,
}

impl Advisory {
    /// Kind without the payload
    pub fn kind(&self) -> AdvisoryKind {
        match self {
            Self::Hidden => AdvisoryKind::Hidden,
            Self::InProgress(_) => AdvisoryKind::InProgress,
            Self::Proposal => AdvisoryKind::Proposal,
        }
    }

    /// Queue head shown by an in-progress advisory
    pub fn item(&self) -> Option<&RecoveryTransaction> {
        match self {
            Self::InProgress(item) => Some(item),
            Self::Hidden | Self::Proposal => None,
        }
    }

    /// No advisory is active
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// Inputs the advisory is computed from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvisoryInputs {
    /// Aggregated recovery queue for the current account
    pub queue: Vec<RecoveryTransaction>,
    /// Connected wallet owns the Safe
    pub is_owner: bool,
    /// Connected wallet guards at least one module
    pub is_guardian: bool,
    /// True on views where interrupting advisories are allowed
    pub is_sidebar_route: bool,
}

/// Transition rule, independent of controller history.
pub fn select_advisory(inputs: &AdvisoryInputs) -> Advisory {
    if !inputs.is_sidebar_route {
        return Advisory::Hidden;
    }
    match inputs.queue.first() {
        Some(head) => Advisory::InProgress(head.clone()),
        None if inputs.is_guardian => Advisory::Proposal,
        None => Advisory::Hidden,
    }
}

/// Advisory state machine
#[derive(Debug, Default)]
pub struct AdvisoryController {
    current: Advisory,
    last_inputs: Option<AdvisoryInputs>,
}

impl AdvisoryController {
    /// Controller with nothing shown
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisory as of the last transition
    pub fn current(&self) -> &Advisory {
        &self.current
    }

    /// Re-evaluate the advisory if any input changed.
    ///
    /// Unchanged inputs keep the current state, so an advisory closed or
    /// hidden by navigation stays hidden until the inputs move.
    pub fn recompute(&mut self, inputs: &AdvisoryInputs) -> &Advisory {
        if self.last_inputs.as_ref() == Some(inputs) {
            return &self.current;
        }
        let next = select_advisory(inputs);
        self.transition(next, "inputs changed");
        self.last_inputs = Some(inputs.clone());
        &self.current
    }

    /// Route change completed; advisories are per-page.
    pub fn on_route_change_complete(&mut self) {
        self.transition(Advisory::Hidden, "route changed");
    }

    /// Close the active advisory and record the dismissal for `guardian`.
    ///
    /// Closing a proposal is remembered durably; closing an in-progress
    /// advisory only for this session. Without a connected wallet the
    /// advisory is hidden and nothing is recorded.
    pub async fn close<S: StorageEffects>(
        &mut self,
        guardian: Option<&Address>,
        ledger: &DismissalLedger<S>,
    ) {
        if let Some(guardian) = guardian {
            match self.current.kind() {
                AdvisoryKind::Proposal => ledger.dismiss_proposal(guardian).await,
                AdvisoryKind::InProgress => ledger.dismiss_in_progress(guardian).await,
                AdvisoryKind::Hidden => {}
            }
        }
        self.transition(Advisory::Hidden, "closed");
    }

    /// The advisory as the connected wallet should see it.
    ///
    /// Only owners and guardians see advisories, and a kind the wallet
    /// already dismissed is suppressed.
    pub async fn presentable<S: StorageEffects>(
        &self,
        wallet: Option<&Address>,
        is_owner: bool,
        is_guardian: bool,
        ledger: &DismissalLedger<S>,
    ) -> Advisory {
        let Some(wallet) = wallet else {
            return Advisory::Hidden;
        };
        if !(is_owner || is_guardian) {
            return Advisory::Hidden;
        }

        let dismissed = match self.current.kind() {
            AdvisoryKind::Hidden => return Advisory::Hidden,
            AdvisoryKind::Proposal => ledger.was_proposal_dismissed(wallet).await,
            AdvisoryKind::InProgress => ledger.was_in_progress_dismissed(wallet).await,
        };
        if dismissed {
            Advisory::Hidden
        } else {
            self.current.clone()
        }
    }

    fn transition(&mut self, next: Advisory, reason: &'static str) {
        if self.current != next {
            debug!(from = ?self.current.kind(), to = ?next.kind(), reason, "advisory transition");
        }
        self.current = next;
    }
}
