//! Redux bindings for Cloud Firestore.
//!
//! This crate is a thin orchestration layer between a Redux-style store and
//! a Firestore client SDK: it normalizes loosely-shaped query descriptors
//! into canonical configurations, derives deterministic query names used to
//! deduplicate real-time listeners, builds chained query references against
//! the client, and dispatches normalized actions when listeners are
//! attached, detached, or receive snapshots.
//!
//! The backing client is abstracted behind the [`sdk::FirestoreDatabase`]
//! and [`sdk::FirestoreReference`] traits; the crate itself performs no
//! networking, persistence, or retries.
//!
//! ```no_run
//! use std::sync::Arc;
//! use redux_firestore::{create_firestore_instance, InstanceConfig, SnapshotObserver};
//! use serde_json::json;
//!
//! # fn connect() -> Arc<dyn redux_firestore::FirestoreDatabase> { unimplemented!() }
//! let firestore = connect();
//! let dispatch: redux_firestore::Dispatch =
//!     Arc::new(|action| println!("{}", serde_json::to_string(&action).unwrap()));
//!
//! let instance = create_firestore_instance(Some(firestore), InstanceConfig::default(), dispatch);
//! instance.set_listeners(&json!([
//!     "todos",
//!     { "collection": "users", "where": ["online", "==", true] },
//! ]))?;
//! # Ok::<(), redux_firestore::ReduxFirestoreError>(())
//! ```

pub mod actions;
pub mod constants;
pub mod error;
pub mod instance;
pub mod listener;
pub mod query;
pub mod reference;
pub mod sdk;
pub mod snapshot;

pub use actions::{wrap_in_dispatch, Action, Dispatch};
pub use error::{ReduxFirestoreError, ReduxFirestoreErrorCode, ReduxFirestoreResult};
pub use instance::{
    create_firestore_instance, FirebaseHandle, FirestoreInstance, InstanceConfig,
    InstanceInternals,
};
pub use listener::{attach_listener, detach_listener, set_listeners, unset_listeners};
pub use query::{
    get_query_configs, query_name, OrderBy, OrderByClause, QueryConfig, WhereClause, WhereFilter,
};
pub use reference::firestore_ref;
pub use sdk::{FirestoreDatabase, FirestoreReference, SnapshotObserver, Unsubscribe};
pub use snapshot::{data_by_id_snapshot, ordered_from_snap, DocSnapshot, ListenerSnapshot};

#[cfg(test)]
pub mod test_support;
