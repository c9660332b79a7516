//! Registry of in-flight calls awaiting their correlated responses.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::ClientError;

/// What a waiting caller eventually receives.
pub type CallOutcome = Result<Value, ClientError>;

struct Slot {
    method: String,
    opened_at: Instant,
    tx: oneshot::Sender<CallOutcome>,
}

/// Maps outstanding request ids to their waiting callers.
///
/// The single source of truth for call lifetime: a call exists from
/// [`register`](PendingCalls::register) until exactly one of resolve,
/// cancel, or abandon removes it. Registration happens on caller tasks,
/// resolution on the receive loop; the map mutex serializes them.
#[derive(Default)]
pub struct PendingCalls {
    slots: Mutex<HashMap<u64, Slot>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call slot before its request hits the wire, so a fast
    /// response can never arrive unclaimed.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered. Ids are allocated from a
    /// monotonic counter and never reused while outstanding, so a duplicate
    /// is a caller bug, not a runtime condition.
    pub fn register(&self, id: u64, method: &str) -> oneshot::Receiver<CallOutcome> {
        let (tx, rx) = oneshot::channel();
        let slot = Slot {
            method: method.to_string(),
            opened_at: Instant::now(),
            tx,
        };
        let mut slots = self.slots.lock().expect("pending-call map lock poisoned");
        assert!(
            slots.insert(id, slot).is_none(),
            "request id {id} registered twice"
        );
        rx
    }

    /// Complete a call with the peer's outcome.
    ///
    /// An unknown or already-resolved id is a protocol anomaly from an
    /// untrusted peer (duplicate reply, reply after timeout): logged and
    /// dropped without disturbing other calls.
    pub fn resolve(&self, id: u64, outcome: Result<Value, armrpc_wire::ErrorObject>) {
        let slot = self
            .slots
            .lock()
            .expect("pending-call map lock poisoned")
            .remove(&id);

        let Some(slot) = slot else {
            tracing::warn!(id, "response for unknown or already-resolved id dropped");
            return;
        };

        let outcome = outcome.map_err(|err| ClientError::Rpc {
            code: err.code,
            message: err.message,
            method: slot.method.clone(),
            id,
        });
        tracing::trace!(
            id,
            method = %slot.method,
            elapsed = ?slot.opened_at.elapsed(),
            ok = outcome.is_ok(),
            "call resolved"
        );
        if slot.tx.send(outcome).is_err() {
            tracing::debug!(id, method = %slot.method, "caller gone before resolution");
        }
    }

    /// Remove a slot without resolving it (timeout or explicit cancel).
    /// A late response for the id will then hit the anomaly path above.
    pub fn cancel(&self, id: u64) {
        if self
            .slots
            .lock()
            .expect("pending-call map lock poisoned")
            .remove(&id)
            .is_some()
        {
            tracing::debug!(id, "pending call cancelled");
        }
    }

    /// Fail every in-flight call with the given error and clear the map.
    /// Called when the connection drops or the client shuts down.
    pub fn abandon_all(&self, error: ClientError) {
        let drained: Vec<(u64, Slot)> = self
            .slots
            .lock()
            .expect("pending-call map lock poisoned")
            .drain()
            .collect();
        if drained.is_empty() {
            return;
        }
        tracing::debug!(count = drained.len(), %error, "abandoning pending calls");
        for (id, slot) in drained {
            if slot.tx.send(Err(error.clone())).is_err() {
                tracing::trace!(id, "caller gone before abandon");
            }
        }
    }

    /// Number of calls currently in flight.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .expect("pending-call map lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use armrpc_wire::ErrorObject;
    use serde_json::json;

    use super::*;

    #[test]
    fn resolve_delivers_result_to_registered_caller() {
        let pending = PendingCalls::new();
        let mut rx = pending.register(1, "get_status");

        pending.resolve(1, Ok(json!({"status": "idle"})));

        let outcome = rx.try_recv().expect("slot should be resolved");
        assert_eq!(outcome.unwrap(), json!({"status": "idle"}));
        assert!(pending.is_empty());
    }

    #[test]
    fn resolve_maps_error_object_to_rpc_error() {
        let pending = PendingCalls::new();
        let mut rx = pending.register(7, "get_joint_angles");

        pending.resolve(
            7,
            Err(ErrorObject {
                code: -32000,
                message: "arm not calibrated".into(),
            }),
        );

        let err = rx.try_recv().unwrap().unwrap_err();
        match err {
            ClientError::Rpc {
                code,
                message,
                method,
                id,
            } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "arm not calibrated");
                assert_eq!(method, "get_joint_angles");
                assert_eq!(id, 7);
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn resolve_unknown_id_is_noop() {
        let pending = PendingCalls::new();
        let mut rx = pending.register(1, "get_status");

        pending.resolve(999, Ok(json!(null)));

        assert_eq!(pending.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resolve_twice_second_is_noop() {
        let pending = PendingCalls::new();
        let mut rx = pending.register(3, "open_tool");

        pending.resolve(3, Ok(json!(null)));
        pending.resolve(3, Ok(json!("late duplicate")));

        assert_eq!(rx.try_recv().unwrap().unwrap(), json!(null));
    }

    #[test]
    fn abandon_all_fails_every_call_and_clears() {
        let pending = PendingCalls::new();
        let mut receivers: Vec<_> = (1..=4)
            .map(|id| pending.register(id, "set_speed"))
            .collect();

        pending.abandon_all(ClientError::Disconnected);

        assert!(pending.is_empty());
        for rx in &mut receivers {
            let outcome = rx.try_recv().expect("slot should be failed");
            assert!(matches!(outcome, Err(ClientError::Disconnected)));
        }
    }

    #[test]
    fn cancel_then_resolve_is_noop() {
        let pending = PendingCalls::new();
        let mut rx = pending.register(5, "verify_scene");

        pending.cancel(5);
        pending.resolve(5, Ok(json!(true)));

        assert!(pending.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_registration_panics() {
        let pending = PendingCalls::new();
        let _rx = pending.register(1, "a");
        let _rx2 = pending.register(1, "b");
    }
}
