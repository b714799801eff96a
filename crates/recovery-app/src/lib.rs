//! # Recovery App - Headless Advisory Core
//!
//! Portable logic that turns a recovery snapshot into at most one advisory
//! dialog for a presentation layer:
//!
//! - [`advisory`]: the controller choosing between hidden, in-progress and proposal
//! - [`dismissals`]: per-guardian dismissal memory (durable proposals, session-only in-progress)
//! - [`session`]: wires the clock, snapshot source, route signal and ledger together
//! - [`pending`]: keeps the pending set in step with local submission events
//! - [`roles`]: owner and guardian predicates for the connected wallet
//! - [`config`]: advisory configuration
//!
//! ```text
//! snapshot + pending ──► classify ──► aggregate ──► AdvisoryController ──► Advisory
//!                          ▲                                  │
//!                        Clock                        DismissalLedger
//! ```

#![forbid(unsafe_code)]

pub mod advisory;
pub mod config;
pub mod dismissals;
pub mod pending;
pub mod roles;
pub mod session;

pub use advisory::{select_advisory, Advisory, AdvisoryController, AdvisoryInputs, AdvisoryKind};
pub use config::AdvisoryConfig;
pub use dismissals::{DismissalLedger, DismissalRegistry, InProgressDismissals, ProposalDismissals};
pub use pending::{PendingEvent, PendingTracker};
pub use roles::SafeRoles;
pub use session::{AdvisorySession, Route};

pub use recovery_core::{RecoveryError, Result};
