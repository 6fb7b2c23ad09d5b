//! Identity-driven resolution stream.
//!
//! `AccessWatch` follows the identity hub: each auth-state change kicks off
//! a fresh tier resolution and publishes the result. Resolutions race the
//! identity stream, so each one takes a generation ticket when it starts
//! and commits only if no newer resolution began in the meantime; a result
//! computed for a stale identity is discarded instead of clobbering a newer
//! one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use loanmitra_core::Email;

use crate::identity::{Identity, IdentityHub};
use crate::resolver::{AccessResolver, TierResolution};

/// What route guards observe while resolution is in flight or done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// A resolution is in flight; guards must not decide yet.
    Loading,
    Ready {
        identity: Option<Identity>,
        resolution: TierResolution,
    },
}

impl GuardState {
    /// Email of the resolved identity, if any.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        match self {
            Self::Loading => None,
            Self::Ready { identity, .. } => identity.as_ref().map(|i| &i.verified_email),
        }
    }
}

/// Hands out generation tickets and discards stale commits.
struct ResolutionSequence {
    next: AtomicU64,
    committed: AtomicU64,
}

impl ResolutionSequence {
    const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            committed: AtomicU64::new(0),
        }
    }

    fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// True if `generation` is newer than everything committed so far.
    fn commit(&self, generation: u64) -> bool {
        self.committed
            .fetch_max(generation, Ordering::SeqCst)
            < generation
    }
}

/// Live guard-state stream over an identity hub and a resolver.
pub struct AccessWatch {
    rx: watch::Receiver<GuardState>,
    task: JoinHandle<()>,
}

impl AccessWatch {
    /// Spawn the follower task. The stream starts in [`GuardState::Loading`]
    /// and moves to [`GuardState::Ready`] once the first resolution lands.
    #[must_use]
    pub fn spawn(hub: &IdentityHub, resolver: Arc<AccessResolver>) -> Self {
        let (tx, rx) = watch::channel(GuardState::Loading);
        let mut identities = hub.subscribe();
        let sequence = Arc::new(ResolutionSequence::new());

        let task = tokio::spawn(async move {
            loop {
                let identity = identities.borrow_and_update().clone();
                let generation = sequence.begin();
                let resolution = resolver.resolve(identity.as_ref()).await;
                if sequence.commit(generation) {
                    let ready = GuardState::Ready {
                        identity,
                        resolution,
                    };
                    if tx.send(ready).is_err() {
                        break;
                    }
                } else {
                    tracing::debug!(generation, "discarding stale tier resolution");
                }
                if identities.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { rx, task }
    }

    /// Subscribe to guard-state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.rx.clone()
    }

    /// The current guard state.
    #[must_use]
    pub fn current(&self) -> GuardState {
        self.rx.borrow().clone()
    }
}

impl Drop for AccessWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
