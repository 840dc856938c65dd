//! Listener lifecycle: attach, detach, and the batch variants.
//!
//! Listeners are deduplicated by query name. Attaching a name that is
//! already registered re-dispatches `SET_LISTENER` but keeps the existing
//! subscription; detaching removes the registry entry and invokes its
//! unsubscribe callback exactly once.

use std::sync::Arc;

use log::{debug, error};
use serde_json::{json, Value};

use crate::actions::{Action, Dispatch};
use crate::constants::action_types;
use crate::error::{configuration_error, validation_error, ReduxFirestoreResult};
use crate::instance::FirebaseHandle;
use crate::query::{get_query_configs, query_name, QueryConfig};
use crate::reference::firestore_ref;
use crate::sdk::{SnapshotErrorHandler, SnapshotHandler, SnapshotObserver};
use crate::snapshot::{data_by_id_snapshot, ordered_from_snap};

const LISTENERS_NOT_ARRAY: &str =
    "Listeners must be an Array of listener configs (Strings/Objects).";
const ENHANCER_MISSING_ATTACH: &str = "Internal Firebase object required to attach listener. \
     Confirm that reduxFirestore enhancer was added when you were creating your store";
const ENHANCER_MISSING_DETACH: &str = "Internal Firebase object required to detach listener. \
     Confirm that reduxFirestore enhancer was added when you were creating your store";

/// Attaches a real-time listener for `meta` and returns its query name.
///
/// `SET_LISTENER` is dispatched on every call, also when the name is
/// already registered; the subscription itself is opened at most once per
/// name. Each delivered snapshot dispatches `LISTENER_RESPONSE` carrying
/// `{data, ordered}` and is forwarded to `observer.next` when present.
/// Delivery errors go to `observer.error` (and the log facade when the
/// instance is configured to log them); they are never rethrown.
pub fn attach_listener(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: Option<&QueryConfig>,
    observer: SnapshotObserver,
) -> ReduxFirestoreResult<String> {
    let meta =
        meta.ok_or_else(|| configuration_error("Meta data is required to attach listener."))?;
    let internals = firebase
        .internals()
        .ok_or_else(|| configuration_error(ENHANCER_MISSING_ATTACH))?;
    let name = query_name(meta)?;

    let dispatch = Arc::clone(dispatch);
    dispatch(Action::new(
        action_types::SET_LISTENER,
        Some(meta.clone()),
        Some(json!({ "name": name })),
    ));

    if internals.is_registered(&name) {
        debug!("Listener already exists for {name}");
        return Ok(name);
    }

    let reference = firestore_ref(firebase, meta)?;

    let on_next: SnapshotHandler = {
        let dispatch = Arc::clone(&dispatch);
        let meta = meta.clone();
        let success = observer.next.clone();
        Arc::new(move |snapshot| {
            dispatch(Action::new(
                action_types::LISTENER_RESPONSE,
                Some(meta.clone()),
                Some(json!({
                    "data": data_by_id_snapshot(snapshot),
                    "ordered": ordered_from_snap(snapshot),
                })),
            ));
            if let Some(callback) = &success {
                callback(snapshot);
            }
        })
    };

    let on_error: SnapshotErrorHandler = {
        let log_errors = internals.config().log_listener_error;
        let error_callback = observer.error.clone();
        let name = name.clone();
        Arc::new(move |err| {
            if log_errors {
                error!("Error in listener for {name}: {err}");
            }
            if let Some(callback) = &error_callback {
                callback(err);
            }
        })
    };

    let unsubscribe = reference.on_snapshot(on_next, Some(on_error));
    internals.register(name.clone(), unsubscribe);
    Ok(name)
}

/// Detaches the listener registered under the name derived from `meta`.
///
/// `UNSET_LISTENER` is dispatched unconditionally; the unsubscribe callback
/// is invoked only when an entry existed (detaching an unregistered name is
/// a no-op beyond the action).
pub fn detach_listener(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
) -> ReduxFirestoreResult<()> {
    let internals = firebase
        .internals()
        .ok_or_else(|| configuration_error(ENHANCER_MISSING_DETACH))?;
    let name = query_name(meta)?;

    if let Some(unsubscribe) = internals.take(&name) {
        debug!("Detaching listener for {name}");
        unsubscribe();
    }

    let dispatch = Arc::clone(dispatch);
    dispatch(Action::new(
        action_types::UNSET_LISTENER,
        Some(meta.clone()),
        Some(json!({ "name": name })),
    ));
    Ok(())
}

/// Normalizes an array of query descriptors and attaches a listener for
/// each, in input order.
pub fn set_listeners(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    descriptors: &Value,
) -> ReduxFirestoreResult<()> {
    let configs = listener_configs(descriptors)?;
    for config in &configs {
        attach_listener(firebase, dispatch, Some(config), SnapshotObserver::new())?;
    }
    Ok(())
}

/// Normalizes an array of query descriptors and detaches each, in order.
pub fn unset_listeners(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    descriptors: &Value,
) -> ReduxFirestoreResult<()> {
    let configs = listener_configs(descriptors)?;
    for config in &configs {
        detach_listener(firebase, dispatch, config)?;
    }
    Ok(())
}

fn listener_configs(descriptors: &Value) -> ReduxFirestoreResult<Vec<QueryConfig>> {
    if !descriptors.is_array() {
        return Err(validation_error(LISTENERS_NOT_ARRAY));
    }
    get_query_configs(descriptors)
}
