//! Owner and guardian predicates for the connected wallet

use recovery_core::{Address, RecoveryState};
use serde::{Deserialize, Serialize};

/// Connected wallet and the Safe's current owners
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeRoles {
    /// Connected wallet, if any
    pub wallet: Option<Address>,
    /// Current owners of the Safe
    pub owners: Vec<Address>,
}

impl SafeRoles {
    /// Roles for `wallet` against the Safe owner list
    pub fn new(wallet: Option<Address>, owners: Vec<Address>) -> Self {
        Self { wallet, owners }
    }

    /// Connected wallet is an owner
    pub fn is_owner(&self) -> bool {
        self.wallet
            .as_ref()
            .is_some_and(|wallet| self.owners.contains(wallet))
    }

    /// Connected wallet is a guardian on any module in `state`
    pub fn is_guardian(&self, state: &RecoveryState) -> bool {
        self.wallet
            .as_ref()
            .is_some_and(|wallet| state.guardian_modules(wallet).next().is_some())
    }
}
