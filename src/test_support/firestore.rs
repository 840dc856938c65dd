//! An in-memory fake of the backing client SDK.
//!
//! Records every reference-building call as a readable string, tracks open
//! subscriptions, and lets tests deliver snapshots or transport errors by
//! hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::actions::{Action, Dispatch};
use crate::error::{internal_error, ReduxFirestoreResult};
use crate::sdk::{
    FirestoreDatabase, FirestoreReference, SnapshotErrorHandler, SnapshotHandler, Unsubscribe,
};
use crate::snapshot::ListenerSnapshot;

/// Dispatch function that records every action it receives.
pub fn recording_dispatch() -> (Dispatch, Arc<Mutex<Vec<Action>>>) {
    let actions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&actions);
    let dispatch: Dispatch = Arc::new(move |action| sink.lock().unwrap().push(action));
    (dispatch, actions)
}

#[derive(Clone, Default)]
pub struct MockFirestore {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<String>>,
    subscriptions: Mutex<HashMap<u64, Subscription>>,
    next_subscription_id: AtomicU64,
    total_subscriptions: AtomicUsize,
    unsubscribes: AtomicUsize,
    get_result: Mutex<Option<ListenerSnapshot>>,
    write_failure: Mutex<Option<String>>,
}

#[derive(Clone)]
struct Subscription {
    on_next: SnapshotHandler,
    on_error: Option<SnapshotErrorHandler>,
}

impl MockState {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MockFirestore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(&self) -> Arc<dyn FirestoreDatabase> {
        Arc::new(self.clone())
    }

    /// Every reference-building call so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Number of `on_snapshot` calls ever made.
    pub fn subscription_count(&self) -> usize {
        self.state.total_subscriptions.load(Ordering::SeqCst)
    }

    /// Number of subscriptions that have not been unsubscribed.
    pub fn active_subscriptions(&self) -> usize {
        self.state.subscriptions.lock().unwrap().len()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.state.unsubscribes.load(Ordering::SeqCst)
    }

    /// Delivers a snapshot to every active subscription, in creation order.
    pub fn deliver(&self, snapshot: &ListenerSnapshot) {
        let subscriptions = {
            let guard = self.state.subscriptions.lock().unwrap();
            let mut entries: Vec<(u64, Subscription)> =
                guard.iter().map(|(id, sub)| (*id, sub.clone())).collect();
            entries.sort_by_key(|(id, _)| *id);
            entries
        };
        for (_, subscription) in subscriptions {
            (subscription.on_next)(snapshot);
        }
    }

    /// Routes a transport error to every active subscription's error handler.
    pub fn fail_subscriptions(&self, message: &str) {
        let subscriptions = {
            let guard = self.state.subscriptions.lock().unwrap();
            guard.values().cloned().collect::<Vec<_>>()
        };
        let err = internal_error(message);
        for subscription in subscriptions {
            if let Some(on_error) = &subscription.on_error {
                on_error(&err);
            }
        }
    }

    /// Makes subsequent write operations (`add`/`set`/`update`/`delete`)
    /// fail with the given message.
    pub fn fail_writes(&self, message: &str) {
        *self.state.write_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Canned result returned by one-shot `get` calls.
    pub fn set_get_result(&self, snapshot: ListenerSnapshot) {
        *self.state.get_result.lock().unwrap() = Some(snapshot);
    }
}

impl FirestoreDatabase for MockFirestore {
    fn collection(&self, path: &str) -> Arc<dyn FirestoreReference> {
        self.state.record(format!("collection({path})"));
        Arc::new(MockReference {
            state: Arc::clone(&self.state),
        })
    }
}

struct MockReference {
    state: Arc<MockState>,
}

impl MockReference {
    fn chained(&self) -> Arc<dyn FirestoreReference> {
        Arc::new(MockReference {
            state: Arc::clone(&self.state),
        })
    }

    fn write_result(&self, data: Value) -> ReduxFirestoreResult<Value> {
        match self.state.write_failure.lock().unwrap().as_ref() {
            Some(message) => Err(internal_error(message.clone())),
            None => Ok(data),
        }
    }
}

impl FirestoreReference for MockReference {
    fn collection(&self, path: &str) -> Arc<dyn FirestoreReference> {
        self.state.record(format!("collection({path})"));
        self.chained()
    }

    fn doc(&self, id: &str) -> Arc<dyn FirestoreReference> {
        self.state.record(format!("doc({id})"));
        self.chained()
    }

    fn where_field(
        &self,
        field: &str,
        op: Option<&str>,
        value: Option<&Value>,
    ) -> Arc<dyn FirestoreReference> {
        let mut call = format!("where({field}");
        if let Some(op) = op {
            call.push(' ');
            call.push_str(op);
        }
        if let Some(value) = value {
            call.push(' ');
            call.push_str(&value.to_string());
        }
        call.push(')');
        self.state.record(call);
        self.chained()
    }

    fn order_by(&self, field: &str, direction: Option<&str>) -> Arc<dyn FirestoreReference> {
        match direction {
            Some(direction) => self.state.record(format!("orderBy({field} {direction})")),
            None => self.state.record(format!("orderBy({field})")),
        }
        self.chained()
    }

    fn limit(&self, count: u32) -> Arc<dyn FirestoreReference> {
        self.state.record(format!("limit({count})"));
        self.chained()
    }

    fn on_snapshot(
        &self,
        on_next: SnapshotHandler,
        on_error: Option<SnapshotErrorHandler>,
    ) -> Unsubscribe {
        let id = self.state.next_subscription_id.fetch_add(1, Ordering::SeqCst);
        self.state.total_subscriptions.fetch_add(1, Ordering::SeqCst);
        self.state
            .subscriptions
            .lock()
            .unwrap()
            .insert(id, Subscription { on_next, on_error });

        let state = Arc::clone(&self.state);
        Box::new(move || {
            state.subscriptions.lock().unwrap().remove(&id);
            state.unsubscribes.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn get(&self) -> ReduxFirestoreResult<ListenerSnapshot> {
        self.state
            .get_result
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| internal_error("no get result configured"))
    }

    fn add(&self, data: Value) -> ReduxFirestoreResult<Value> {
        self.state.record("add".to_string());
        self.write_result(data)
    }

    fn set(&self, data: Value) -> ReduxFirestoreResult<Value> {
        self.state.record("set".to_string());
        self.write_result(data)
    }

    fn update(&self, data: Value) -> ReduxFirestoreResult<Value> {
        self.state.record("update".to_string());
        self.write_result(data)
    }

    fn delete(&self) -> ReduxFirestoreResult<Value> {
        self.state.record("delete".to_string());
        self.write_result(Value::Null)
    }
}
