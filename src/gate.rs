//! Connection gate
//!
//! Resolves and caches the one shared database handle. Callers arriving
//! before the handle exists are queued; at most one establishment attempt
//! is in flight at a time, and all queued callers are resumed in arrival
//! order with the same outcome. A failed attempt is not cached: the gate
//! resets so a later call may retry.

use crate::backend::Database;
use crate::config::StoreConfig;
use crate::error::StoreError;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Waiter = oneshot::Sender<Result<Database, StoreError>>;

enum GateState {
    /// No handle, no attempt in flight.
    Idle,
    /// An attempt is in flight; continuations queued in arrival order.
    Establishing(Vec<Waiter>),
    /// The shared handle, returned immediately to every caller.
    Ready(Database),
}

/// Singleton gate around the shared database handle.
pub struct ConnectionGate {
    config: StoreConfig,
    state: Mutex<GateState>,
}

impl ConnectionGate {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Resolve the shared handle, establishing it on first use.
    ///
    /// Establishment runs on its own task, so it is not cancelled when the
    /// initiating caller goes away; queued callers simply wait for the
    /// attempt to settle.
    pub async fn acquire(self: &Arc<Self>) -> Result<Database, StoreError> {
        let (receiver, initiate) = {
            let mut state = self.state.lock();
            match &mut *state {
                GateState::Ready(database) => return Ok(database.clone()),
                GateState::Establishing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    (rx, false)
                }
                GateState::Idle => {
                    let (tx, rx) = oneshot::channel();
                    *state = GateState::Establishing(vec![tx]);
                    (rx, true)
                }
            }
        };

        if initiate {
            debug!(database = %self.config.database, "establishing database connection");
            let gate = Arc::clone(self);
            tokio::spawn(async move {
                let outcome = Database::connect(&gate.config).await;
                gate.settle(outcome);
            });
        }

        receiver
            .await
            .map_err(|_| StoreError::Connection("connection attempt abandoned".to_string()))?
    }

    /// Record the attempt's outcome and resume every queued caller with it.
    fn settle(&self, outcome: Result<Database, StoreError>) {
        let waiters = {
            let mut state = self.state.lock();
            let waiters = match std::mem::replace(&mut *state, GateState::Idle) {
                GateState::Establishing(waiters) => waiters,
                other => {
                    *state = other;
                    Vec::new()
                }
            };
            match &outcome {
                Ok(database) => *state = GateState::Ready(database.clone()),
                // Leave Idle so the next acquire may retry.
                Err(error) => warn!(error = %error, "database connection failed"),
            }
            waiters
        };

        for waiter in waiters {
            let message = match &outcome {
                Ok(database) => Ok(database.clone()),
                Err(StoreError::Connection(reason)) => {
                    Err(StoreError::Connection(reason.clone()))
                }
                Err(error) => Err(StoreError::Connection(error.to_string())),
            };
            let _ = waiter.send(message);
        }
    }
}
