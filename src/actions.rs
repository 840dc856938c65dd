//! Redux action plumbing and one-shot read/write action creators.
//!
//! Every operation follows the same shape as the JS library: a request
//! action is dispatched up front, the SDK call runs, and a success or
//! failure action follows, with the query config carried in `meta`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::action_types;
use crate::error::{validation_error, ReduxFirestoreResult};
use crate::instance::FirebaseHandle;
use crate::query::QueryConfig;
use crate::reference::firestore_ref;
use crate::snapshot::{data_by_id_snapshot, ordered_from_snap};

/// A Redux action: `{type, meta, payload}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<QueryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    pub fn new(action_type: &'static str, meta: Option<QueryConfig>, payload: Option<Value>) -> Self {
        Self {
            action_type,
            meta,
            payload,
        }
    }
}

/// The Redux store's dispatch function.
pub type Dispatch = Arc<dyn Fn(Action) + Send + Sync + 'static>;

/// Runs `operation` between a request action and a success/failure action.
///
/// The operation's `Result` is propagated unchanged; a failure payload
/// carries the error rendered as a string.
pub fn wrap_in_dispatch<F>(
    dispatch: &Dispatch,
    meta: &QueryConfig,
    types: [&'static str; 3],
    operation: F,
) -> ReduxFirestoreResult<Value>
where
    F: FnOnce() -> ReduxFirestoreResult<Value>,
{
    let dispatch = Arc::clone(dispatch);
    let [request, success, failure] = types;
    dispatch(Action::new(request, Some(meta.clone()), None));
    match operation() {
        Ok(result) => {
            dispatch(Action::new(
                success,
                Some(meta.clone()),
                Some(result.clone()),
            ));
            Ok(result)
        }
        Err(err) => {
            dispatch(Action::new(
                failure,
                Some(meta.clone()),
                Some(Value::String(err.to_string())),
            ));
            Err(err)
        }
    }
}

/// Adds a document to the collection addressed by `meta`.
pub fn add(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
    data: Value,
) -> ReduxFirestoreResult<Value> {
    let reference = firestore_ref(firebase, meta)?;
    wrap_in_dispatch(
        dispatch,
        meta,
        [
            action_types::ADD_REQUEST,
            action_types::ADD_SUCCESS,
            action_types::ADD_FAILURE,
        ],
        move || reference.add(data),
    )
}

/// Writes a document at the location addressed by `meta`.
pub fn set(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
    data: Value,
) -> ReduxFirestoreResult<Value> {
    let reference = firestore_ref(firebase, meta)?;
    wrap_in_dispatch(
        dispatch,
        meta,
        [
            action_types::SET_REQUEST,
            action_types::SET_SUCCESS,
            action_types::SET_FAILURE,
        ],
        move || reference.set(data),
    )
}

/// Updates fields of the document addressed by `meta`.
pub fn update(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
    data: Value,
) -> ReduxFirestoreResult<Value> {
    let reference = firestore_ref(firebase, meta)?;
    wrap_in_dispatch(
        dispatch,
        meta,
        [
            action_types::UPDATE_REQUEST,
            action_types::UPDATE_SUCCESS,
            action_types::UPDATE_FAILURE,
        ],
        move || reference.update(data),
    )
}

/// Deletes the document addressed by `meta`. Collections cannot be deleted.
pub fn delete_ref(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
) -> ReduxFirestoreResult<Value> {
    if meta.doc.is_none() {
        return Err(validation_error("Only docs can be deleted."));
    }
    let reference = firestore_ref(firebase, meta)?;
    wrap_in_dispatch(
        dispatch,
        meta,
        [
            action_types::DELETE_REQUEST,
            action_types::DELETE_SUCCESS,
            action_types::DELETE_FAILURE,
        ],
        move || reference.delete(),
    )
}

/// Reads the current state of the reference addressed by `meta` once.
///
/// The success payload carries the same `{data, ordered}` shape as
/// `LISTENER_RESPONSE`.
pub fn get(
    firebase: &FirebaseHandle,
    dispatch: &Dispatch,
    meta: &QueryConfig,
) -> ReduxFirestoreResult<Value> {
    let reference = firestore_ref(firebase, meta)?;
    wrap_in_dispatch(
        dispatch,
        meta,
        [
            action_types::GET_REQUEST,
            action_types::GET_SUCCESS,
            action_types::GET_FAILURE,
        ],
        move || {
            let snapshot = reference.get()?;
            Ok(json!({
                "data": data_by_id_snapshot(&snapshot),
                "ordered": ordered_from_snap(&snapshot),
            }))
        },
    )
}
