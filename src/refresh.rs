//! Single-flight coordination for access-token refresh
//!
//! When several in-flight requests hit an expired token in the same window,
//! exactly one of them may call the refresh endpoint; the rest wait for that
//! call's outcome. [`RefreshGate`] owns the in-flight flag and the waiter
//! queue so the mutual-exclusion invariant lives in one place instead of in
//! free-floating state.

use tokio::sync::{oneshot, Mutex};

use crate::error::AppError;

/// Outcome shared with every waiter: the new access token, or the refresh
/// call's own error
pub type RefreshOutcome = std::result::Result<String, AppError>;

enum GateState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

/// What [`RefreshGate::acquire`] handed the caller
pub enum Acquired {
    /// No refresh was in flight; the caller must perform it and [`settle`]
    ///
    /// [`settle`]: RefreshGate::settle
    Leader,
    /// A refresh is already in flight; await the shared outcome
    Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Mutual-exclusion gate guaranteeing at most one refresh call in flight
pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Join the refresh protocol
    ///
    /// Returns `Leader` exactly once per refresh storm; every other caller
    /// becomes a `Follower` queued in arrival order.
    pub async fn acquire(&self) -> Acquired {
        let mut state = self.state.lock().await;
        match &mut *state {
            GateState::Idle => {
                *state = GateState::Refreshing {
                    waiters: Vec::new(),
                };
                Acquired::Leader
            }
            GateState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Acquired::Follower(rx)
            }
        }
    }

    /// Settle the in-flight refresh and drain waiters in enqueue order
    ///
    /// Transitions back to `Idle`. Draining is only meaningful from the
    /// `Refreshing` state; a settle against an idle gate is a no-op.
    pub async fn settle(&self, outcome: RefreshOutcome) {
        let mut state = self.state.lock().await;
        if let GateState::Refreshing { waiters } = std::mem::replace(&mut *state, GateState::Idle) {
            for waiter in waiters {
                // A waiter that gave up awaiting is fine to skip
                let _ = waiter.send(outcome.clone());
            }
        }
    }

    pub async fn is_refreshing(&self) -> bool {
        matches!(*self.state.lock().await, GateState::Refreshing { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_single_leader_per_storm() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.acquire().await, Acquired::Leader));
        assert!(gate.is_refreshing().await);

        // Everyone else queues behind the leader
        assert!(matches!(gate.acquire().await, Acquired::Follower(_)));
        assert!(matches!(gate.acquire().await, Acquired::Follower(_)));

        gate.settle(Ok("tok".to_string())).await;
        assert!(!gate.is_refreshing().await);

        // A new storm elects a new leader
        assert!(matches!(gate.acquire().await, Acquired::Leader));
    }

    #[tokio::test]
    async fn test_followers_share_the_outcome() {
        let gate = Arc::new(RefreshGate::new());

        assert!(matches!(gate.acquire().await, Acquired::Leader));

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match gate.acquire().await {
                Acquired::Follower(rx) => receivers.push(rx),
                Acquired::Leader => panic!("second leader during one refresh"),
            }
        }

        gate.settle(Ok("fresh-token".to_string())).await;

        for rx in receivers {
            assert_eq!(rx.await.unwrap().unwrap(), "fresh-token");
        }
    }

    #[tokio::test]
    async fn test_failure_rejects_every_waiter() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.acquire().await, Acquired::Leader));
        let rx1 = match gate.acquire().await {
            Acquired::Follower(rx) => rx,
            _ => unreachable!(),
        };
        let rx2 = match gate.acquire().await {
            Acquired::Follower(rx) => rx,
            _ => unreachable!(),
        };

        gate.settle(Err(AppError::from_status(401, "refresh rejected"))).await;

        assert!(rx1.await.unwrap().is_err());
        assert!(rx2.await.unwrap().is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_waiters_drain_in_enqueue_order() {
        let gate = Arc::new(RefreshGate::new());
        assert!(matches!(gate.acquire().await, Acquired::Leader));

        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for i in 0..4 {
            let rx = match gate.acquire().await {
                Acquired::Follower(rx) => rx,
                _ => unreachable!(),
            };
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                rx.await.unwrap().unwrap();
                order.lock().unwrap().push(i);
            }));
        }

        gate.settle(Ok("tok".to_string())).await;
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_settle_when_idle_is_noop() {
        let gate = RefreshGate::new();
        gate.settle(Ok("tok".to_string())).await;
        assert!(!gate.is_refreshing().await);
        assert!(matches!(gate.acquire().await, Acquired::Leader));
    }
}
