//! Single-flight access token refresh.
//!
//! The first request to need a new token becomes the leader and runs the
//! refresh; everyone arriving while it is in flight parks on a oneshot
//! channel and receives the leader's outcome.
//!
//! ```text
//!   Idle ──run()──▶ Refreshing { waiters } ──settled / dropped──▶ Idle
//!                        ▲      │
//!                 run() ─┘      └─ waiters notified with the same result
//! ```
//!
//! The state mutex is never held across an `.await`.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Why a refresh did not produce a token.
///
/// `Clone` so a single outcome can fan out to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No refresh token was stored.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The backend refused the refresh token.
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The refresh request did not complete.
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The new tokens could not be stored.
    #[error("could not store refreshed tokens: {0}")]
    Storage(String),

    /// The session was ended while the request was in flight.
    #[error("session ended")]
    SessionEnded,

    /// The refreshing task was dropped before it settled.
    #[error("refresh abandoned before completion")]
    Abandoned,
}

type Waiter = oneshot::Sender<Result<SecretString, RefreshFailure>>;

#[derive(Default)]
enum RefreshState {
    #[default]
    Idle,
    Refreshing {
        waiters: Vec<Waiter>,
    },
}

/// Coalesces concurrent refreshes into one.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

enum Role {
    Leader,
    Follower(oneshot::Receiver<Result<SecretString, RefreshFailure>>),
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.lock(), RefreshState::Refreshing { .. })
    }

    /// Get a fresh access token, running `refresh` only if no other caller
    /// is already doing so.
    ///
    /// # Errors
    ///
    /// Returns the leader's `RefreshFailure`, or `Abandoned` if the leader
    /// was dropped before finishing.
    pub async fn run<F, Fut>(&self, refresh: F) -> Result<SecretString, RefreshFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SecretString, RefreshFailure>>,
    {
        match self.join() {
            Role::Follower(rx) => {
                debug!("Waiting for in-flight token refresh");
                rx.await.unwrap_or(Err(RefreshFailure::Abandoned))
            }
            Role::Leader => {
                let mut guard = InFlight {
                    coordinator: self,
                    settled: false,
                };
                let result = refresh().await;
                guard.settle(&result);
                result
            }
        }
    }

    fn join(&self) -> Role {
        let mut state = self.lock();
        match &mut *state {
            RefreshState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Role::Follower(rx)
            }
            RefreshState::Idle => {
                *state = RefreshState::Refreshing {
                    waiters: Vec::new(),
                };
                Role::Leader
            }
        }
    }

    fn finish(&self, result: &Result<SecretString, RefreshFailure>) {
        let waiters = match std::mem::take(&mut *self.lock()) {
            RefreshState::Refreshing { waiters } => waiters,
            RefreshState::Idle => Vec::new(),
        };
        debug!(waiters = waiters.len(), ok = result.is_ok(), "Token refresh settled");
        for waiter in waiters {
            // A waiter whose request was dropped has nobody to tell.
            let _ = waiter.send(result.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

/// Returns the coordinator to `Idle` even if the leader's future is dropped.
struct InFlight<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(&mut self, result: &Result<SecretString, RefreshFailure>) {
        self.settled = true;
        self.coordinator.finish(result);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.finish(&Err(RefreshFailure::Abandoned));
        }
    }
}
