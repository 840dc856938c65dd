//! Boundary traits for the backing Firestore client SDK.
//!
//! This crate never talks to the network itself; it chains calls on these
//! traits to build query references and opens real-time subscriptions via
//! `on_snapshot`. Any client exposing collection/doc/where/orderBy/limit
//! primitives can be plugged in.

use std::error::Error;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{internal_error, ReduxFirestoreResult};
use crate::snapshot::ListenerSnapshot;

pub type SnapshotHandler = Arc<dyn Fn(&ListenerSnapshot) + Send + Sync + 'static>;
pub type SnapshotErrorHandler = Arc<dyn Fn(&dyn Error) + Send + Sync + 'static>;

/// Cancellation handle returned by `on_snapshot`. Invoking it tears down the
/// underlying real-time subscription; it must be called at most once.
pub type Unsubscribe = Box<dyn FnOnce() + Send + 'static>;

/// Optional per-listener callbacks supplied by the caller of
/// `attach_listener`/`set_listener`, invoked in addition to the dispatched
/// Redux actions.
#[derive(Clone, Default)]
pub struct SnapshotObserver {
    pub next: Option<SnapshotHandler>,
    pub error: Option<SnapshotErrorHandler>,
}

impl SnapshotObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ListenerSnapshot) + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(callback));
        self
    }

    pub fn with_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn Error) + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(callback));
        self
    }
}

/// Root handle of the backing client, able to address top-level collections.
pub trait FirestoreDatabase: Send + Sync {
    fn collection(&self, path: &str) -> Arc<dyn FirestoreReference>;
}

/// A chainable collection/document/query reference.
///
/// Path steps (`collection`, `doc`) and query modifiers (`where_field`,
/// `order_by`, `limit`) each return a new reference, mirroring the fluent
/// JS API. Terminal references support `on_snapshot` and the one-shot
/// operations; the one-shot defaults report an internal error so backends
/// and test doubles only implement what they actually serve.
pub trait FirestoreReference: Send + Sync {
    fn collection(&self, path: &str) -> Arc<dyn FirestoreReference>;

    fn doc(&self, id: &str) -> Arc<dyn FirestoreReference>;

    fn where_field(
        &self,
        field: &str,
        op: Option<&str>,
        value: Option<&Value>,
    ) -> Arc<dyn FirestoreReference>;

    fn order_by(&self, field: &str, direction: Option<&str>) -> Arc<dyn FirestoreReference>;

    fn limit(&self, count: u32) -> Arc<dyn FirestoreReference>;

    /// Opens a real-time subscription. Snapshots are handed to `on_next` in
    /// delivery order; transport errors go to `on_error` when provided.
    fn on_snapshot(
        &self,
        on_next: SnapshotHandler,
        on_error: Option<SnapshotErrorHandler>,
    ) -> Unsubscribe;

    fn get(&self) -> ReduxFirestoreResult<ListenerSnapshot> {
        Err(internal_error("get is not supported by this reference"))
    }

    fn add(&self, _data: Value) -> ReduxFirestoreResult<Value> {
        Err(internal_error("add is not supported by this reference"))
    }

    fn set(&self, _data: Value) -> ReduxFirestoreResult<Value> {
        Err(internal_error("set is not supported by this reference"))
    }

    fn update(&self, _data: Value) -> ReduxFirestoreResult<Value> {
        Err(internal_error("update is not supported by this reference"))
    }

    fn delete(&self) -> ReduxFirestoreResult<Value> {
        Err(internal_error("delete is not supported by this reference"))
    }
}
