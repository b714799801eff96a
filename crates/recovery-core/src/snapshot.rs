//! Snapshot publication
//!
//! The data layer publishes each new recovery snapshot into a [`Dynamic`].
//! Every advisory session holds its own [`Subscription`] and picks up the
//! latest snapshot on its next refresh; snapshots published in between are
//! skipped.
//!
//! ```rust
//! use recovery_core::{Dynamic, RecoveryState};
//!
//! let source = Dynamic::new(RecoveryState::default());
//! let mut subscription = source.subscribe();
//! assert!(subscription.poll().is_none());
//!
//! source.set(RecoveryState { state: Some(Vec::new()), ..RecoveryState::default() });
//! assert!(subscription.poll().is_some());
//! ```

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

struct Published<T> {
    value: T,
    revision: u64,
}

/// Shared, publishable value. Clones publish to the same subscribers.
#[derive(Clone)]
pub struct Dynamic<T> {
    shared: Arc<RwLock<Published<T>>>,
}

impl<T: Clone> Dynamic<T> {
    /// Start publishing with `value` as the current snapshot.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Published { value, revision: 0 })),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> T {
        self.shared.read().value.clone()
    }

    /// Replace the snapshot. Every subscription sees it on its next poll.
    pub fn set(&self, value: T) {
        let mut published = self.shared.write();
        published.value = value;
        published.revision += 1;
    }

    /// Subscribe from the current snapshot onward.
    ///
    /// The current snapshot counts as already seen.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            seen: self.shared.read().revision,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let published = self.shared.read();
        f.debug_struct("Dynamic")
            .field("value", &published.value)
            .field("revision", &published.revision)
            .finish()
    }
}

/// One consumer's view of a [`Dynamic`]
pub struct Subscription<T> {
    shared: Arc<RwLock<Published<T>>>,
    seen: u64,
}

impl<T: Clone> Subscription<T> {
    /// The latest snapshot, if one was published since the last poll.
    pub fn poll(&mut self) -> Option<T> {
        let published = self.shared.read();
        if published.revision == self.seen {
            return None;
        }
        self.seen = published.revision;
        Some(published.value.clone())
    }

    /// Current snapshot, without marking it seen
    pub fn get(&self) -> T {
        self.shared.read().value.clone()
    }
}
