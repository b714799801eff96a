//! Advisory session
//!
//! Owns everything one mounted advisory host needs: the polling clock, a
//! subscription to the recovery snapshot, the connected wallet's roles, the
//! current route, the dismissal ledger and the controller. Each refresh is
//! a synchronous pass over the latest snapshot; the only suspension points
//! are the clock tick and the effect calls.

use crate::advisory::{Advisory, AdvisoryController, AdvisoryInputs};
use crate::config::AdvisoryConfig;
use crate::dismissals::DismissalLedger;
use crate::roles::SafeRoles;
use recovery_core::effects::{PhysicalTimeEffects, StorageEffects};
use recovery_core::{
    classify_queue, ClassifiedTransaction, Dynamic, EvaluationTime, RecoveryError, RecoveryState,
    Subscription,
};
use recovery_effects::Clock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Current view of the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route path as reported by the router
    pub path: String,
    /// Inside the main application shell, where advisories may interrupt
    pub is_sidebar: bool,
}

impl Route {
    /// Route inside the application shell
    pub fn sidebar(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_sidebar: true,
        }
    }

    /// Route outside the application shell (welcome, onboarding)
    pub fn outside_shell(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_sidebar: false,
        }
    }
}

/// Advisory state for one mounted host
pub struct AdvisorySession<T, S> {
    time: T,
    clock: Clock,
    snapshot: Subscription<RecoveryState>,
    state: RecoveryState,
    roles: SafeRoles,
    route: Route,
    ledger: DismissalLedger<S>,
    controller: AdvisoryController,
    queue: Vec<ClassifiedTransaction>,
    evaluated_at: EvaluationTime,
}

impl<T, S> AdvisorySession<T, S>
where
    T: PhysicalTimeEffects,
    S: StorageEffects,
{
    /// Start the clock, subscribe to `source` and compute the first advisory.
    pub async fn start(
        config: &AdvisoryConfig,
        time: T,
        storage: S,
        source: &Dynamic<RecoveryState>,
        roles: SafeRoles,
        route: Route,
    ) -> Result<Self, RecoveryError> {
        config.validate()?;
        let clock = Clock::start(&time, config.clock_interval()).await?;
        let snapshot = source.subscribe();
        let state = snapshot.get();
        let evaluated_at = EvaluationTime::at(clock.now());

        info!(
            interval_ms = config.clock_interval_ms,
            modules = state.modules().len(),
            route = %route.path,
            "advisory session started"
        );

        let mut session = Self {
            time,
            clock,
            snapshot,
            state,
            roles,
            route,
            ledger: DismissalLedger::new(storage, config.proposal_dismissals_key.clone()),
            controller: AdvisoryController::new(),
            queue: Vec::new(),
            evaluated_at,
        };
        session.refresh().await;
        Ok(session)
    }

    /// Reclassify the queue and recompute the advisory.
    pub async fn refresh(&mut self) -> &Advisory {
        if let Some(state) = self.snapshot.poll() {
            self.state = state;
        }

        let clock_ms = self.clock.now();
        let wall_ms = match self.time.physical_time_ms().await {
            Ok(ms) => ms,
            Err(e) => {
                warn!(error = %e, "wall clock unavailable, judging expiry by polled clock");
                clock_ms
            }
        };
        self.evaluated_at = EvaluationTime::new(clock_ms, wall_ms);
        self.queue = classify_queue(&self.state, self.evaluated_at);

        let inputs = AdvisoryInputs {
            queue: self.queue.iter().map(|entry| entry.tx.clone()).collect(),
            is_owner: self.roles.is_owner(),
            is_guardian: self.roles.is_guardian(&self.state),
            is_sidebar_route: self.route.is_sidebar,
        };
        self.controller.recompute(&inputs)
    }

    /// Wait for the next clock tick, then refresh.
    ///
    /// Returns `None` once the clock has stopped.
    pub async fn next_tick(&mut self) -> Option<&Advisory> {
        self.clock.tick().await?;
        Some(self.refresh().await)
    }

    /// Route change completed.
    pub async fn route_changed(&mut self, route: Route) -> &Advisory {
        self.route = route;
        self.controller.on_route_change_complete();
        self.refresh().await
    }

    /// Connected wallet or owner set changed.
    pub async fn set_roles(&mut self, roles: SafeRoles) -> &Advisory {
        self.roles = roles;
        self.refresh().await
    }

    /// Close the active advisory for the connected wallet.
    pub async fn close(&mut self) {
        self.controller
            .close(self.roles.wallet.as_ref(), &self.ledger)
            .await;
    }

    /// The advisory the connected wallet should see now.
    pub async fn visible(&self) -> Advisory {
        self.controller
            .presentable(
                self.roles.wallet.as_ref(),
                self.roles.is_owner(),
                self.roles.is_guardian(&self.state),
                &self.ledger,
            )
            .await
    }

    /// Eligible advisory, before identity and dismissal filtering
    pub fn advisory(&self) -> &Advisory {
        self.controller.current()
    }

    /// Classified queue heads from the last refresh
    pub fn queue(&self) -> &[ClassifiedTransaction] {
        &self.queue
    }

    /// Time inputs of the last refresh
    pub fn evaluated_at(&self) -> EvaluationTime {
        self.evaluated_at
    }

    /// Dismissal ledger for this session
    pub fn ledger(&self) -> &DismissalLedger<S> {
        &self.ledger
    }

    /// Polling clock driving the countdown
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
