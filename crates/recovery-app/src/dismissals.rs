//! # Dismissal Ledger
//!
//! Remembers, per guardian address, which advisories the user already
//! dismissed. The two registries share one interface but never share state:
//!
//! - [`ProposalDismissals`] is durable. It is read from storage once per
//!   instance and cached; every dismissal is written through.
//! - [`InProgressDismissals`] lives in memory only, so a fresh session
//!   starts with nothing dismissed.
//!
//! Storage failures fail open: the registry behaves as if nothing had been
//! dismissed and the prompt keeps showing.

use async_lock::Mutex;
use async_trait::async_trait;
use parking_lot::RwLock;
use recovery_core::effects::StorageEffects;
use recovery_core::Address;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Per-guardian dismissal memory
#[async_trait]
pub trait DismissalRegistry: Send + Sync {
    /// Whether `guardian` dismissed this advisory
    async fn was_dismissed(&self, guardian: &Address) -> bool;

    /// Record a dismissal. Idempotent.
    async fn dismiss(&self, guardian: &Address);
}

type DismissalMap = BTreeMap<Address, bool>;

/// Durable registry for proposal dismissals
pub struct ProposalDismissals<S> {
    storage: S,
    key: String,
    /// `None` until the first access loads the persisted map.
    cache: Mutex<Option<DismissalMap>>,
}

impl<S: StorageEffects> ProposalDismissals<S> {
    /// Registry persisted under `key`. Nothing is read until first use.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cache: Mutex::new(None),
        }
    }

    /// Storage key of the persisted map
    pub fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> DismissalMap {
        let bytes = match self.storage.retrieve(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return DismissalMap::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read proposal dismissals");
                return DismissalMap::new();
            }
        };

        let raw: BTreeMap<String, bool> = match serde_json::from_slice(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding malformed proposal dismissals");
                return DismissalMap::new();
            }
        };

        raw.into_iter()
            .filter_map(|(address, dismissed)| match address.parse::<Address>() {
                Ok(address) => Some((address, dismissed)),
                Err(e) => {
                    warn!(%address, error = %e, "skipping unparsable guardian address");
                    None
                }
            })
            .collect()
    }

    async fn persist(&self, entries: &DismissalMap) {
        let raw: BTreeMap<String, bool> = entries
            .iter()
            .map(|(address, dismissed)| (address.to_checksum(None), *dismissed))
            .collect();

        let bytes = match serde_json::to_vec(&raw) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to encode proposal dismissals");
                return;
            }
        };

        if let Err(e) = self.storage.store(&self.key, bytes).await {
            warn!(key = %self.key, error = %e, "failed to persist proposal dismissals");
        }
    }

    async fn ensure_loaded<'a>(&self, cache: &'a mut Option<DismissalMap>) -> &'a mut DismissalMap {
        if cache.is_none() {
            let loaded = self.load().await;
            debug!(key = %self.key, entries = loaded.len(), "loaded proposal dismissals");
            *cache = Some(loaded);
        }
        cache.get_or_insert_with(DismissalMap::new)
    }
}

#[async_trait]
impl<S: StorageEffects> DismissalRegistry for ProposalDismissals<S> {
    async fn was_dismissed(&self, guardian: &Address) -> bool {
        let mut cache = self.cache.lock().await;
        let entries = self.ensure_loaded(&mut cache).await;
        entries.get(guardian).copied().unwrap_or(false)
    }

    async fn dismiss(&self, guardian: &Address) {
        let mut cache = self.cache.lock().await;
        let entries = self.ensure_loaded(&mut cache).await;
        if entries.get(guardian).copied().unwrap_or(false) {
            return;
        }
        entries.insert(*guardian, true);
        debug!(guardian = %guardian, "proposal dismissed");
        self.persist(entries).await;
    }
}

/// Session-only registry for in-progress dismissals
#[derive(Debug, Default)]
pub struct InProgressDismissals {
    dismissed: RwLock<HashSet<Address>>,
}

impl InProgressDismissals {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DismissalRegistry for InProgressDismissals {
    async fn was_dismissed(&self, guardian: &Address) -> bool {
        self.dismissed.read().contains(guardian)
    }

    async fn dismiss(&self, guardian: &Address) {
        if self.dismissed.write().insert(*guardian) {
            debug!(guardian = %guardian, "in-progress advisory dismissed");
        }
    }
}

/// Both dismissal registries behind one façade
pub struct DismissalLedger<S> {
    proposals: ProposalDismissals<S>,
    in_progress: InProgressDismissals,
}

impl<S: StorageEffects> DismissalLedger<S> {
    /// Ledger whose proposal registry persists under `proposal_key`
    pub fn new(storage: S, proposal_key: impl Into<String>) -> Self {
        Self {
            proposals: ProposalDismissals::new(storage, proposal_key),
            in_progress: InProgressDismissals::new(),
        }
    }

    /// Whether `guardian` dismissed the proposal advisory
    pub async fn was_proposal_dismissed(&self, guardian: &Address) -> bool {
        self.proposals.was_dismissed(guardian).await
    }

    /// Durably record a proposal dismissal
    pub async fn dismiss_proposal(&self, guardian: &Address) {
        self.proposals.dismiss(guardian).await;
    }

    /// Whether `guardian` dismissed the in-progress advisory this session
    pub async fn was_in_progress_dismissed(&self, guardian: &Address) -> bool {
        self.in_progress.was_dismissed(guardian).await
    }

    /// Record an in-progress dismissal for this session
    pub async fn dismiss_in_progress(&self, guardian: &Address) {
        self.in_progress.dismiss(guardian).await;
    }

    /// Durable proposal registry
    pub fn proposals(&self) -> &ProposalDismissals<S> {
        &self.proposals
    }

    /// Session-only in-progress registry
    pub fn in_progress(&self) -> &InProgressDismissals {
        &self.in_progress
    }
}
