//! Host handle and the per-instance listener side-channel.
//!
//! The JS library stored its listener registry on a `_` property added to
//! the Firebase instance by the store enhancer. Here the registry is an
//! explicitly-owned [`InstanceInternals`] value carried by
//! [`FirebaseHandle`]; a handle built without it reproduces the
//! "enhancer was not added" misconfiguration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::debug;
use serde_json::Value;

use crate::actions::{self, Dispatch};
use crate::error::ReduxFirestoreResult;
use crate::listener::{attach_listener, detach_listener, set_listeners, unset_listeners};
use crate::query::{query_config_from_entry, QueryConfig};
use crate::sdk::{FirestoreDatabase, SnapshotObserver, Unsubscribe};

/// Instance-level settings, mirroring the JS `defaultConfig`.
#[derive(Clone, Copy, Debug)]
pub struct InstanceConfig {
    /// Log listener delivery errors through the `log` facade.
    pub log_listener_error: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            log_listener_error: true,
        }
    }
}

/// The listener registry: query name to unsubscribe callback.
///
/// Created empty together with the handle. Dropping it invokes every
/// remaining unsubscribe callback so no external subscription outlives the
/// instance.
pub struct InstanceInternals {
    listeners: Mutex<HashMap<String, Unsubscribe>>,
    config: InstanceConfig,
}

impl InstanceInternals {
    pub fn new(config: InstanceConfig) -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Whether a subscription is currently registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.listeners.lock().unwrap().contains_key(name)
    }

    /// Names of all active listeners, in no particular order.
    pub fn listener_names(&self) -> Vec<String> {
        self.listeners.lock().unwrap().keys().cloned().collect()
    }

    pub(crate) fn register(&self, name: String, unsubscribe: Unsubscribe) {
        debug!("Registering listener for {name}");
        let displaced = self.listeners.lock().unwrap().insert(name, unsubscribe);
        if let Some(previous) = displaced {
            // A registration that raced past the is_registered check must
            // not leak the subscription it displaces.
            previous();
        }
    }

    pub(crate) fn take(&self, name: &str) -> Option<Unsubscribe> {
        self.listeners.lock().unwrap().remove(name)
    }
}

impl fmt::Debug for InstanceInternals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceInternals")
            .field("listeners", &self.listener_names())
            .field("config", &self.config)
            .finish()
    }
}

impl Drop for InstanceInternals {
    fn drop(&mut self) {
        let listeners = self
            .listeners
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (name, unsubscribe) in listeners.drain() {
            debug!("Tearing down listener for {name}");
            unsubscribe();
        }
    }
}

/// Handle to the backing Firestore client plus the listener side-channel.
///
/// Both parts are optional so the integration misconfigurations the crate
/// reports (uninitialized Firestore, missing enhancer) stay representable.
#[derive(Clone)]
pub struct FirebaseHandle {
    firestore: Option<Arc<dyn FirestoreDatabase>>,
    internals: Option<Arc<InstanceInternals>>,
}

impl FirebaseHandle {
    /// Fully-wired handle with a fresh, empty listener registry.
    pub fn new(firestore: Option<Arc<dyn FirestoreDatabase>>, config: InstanceConfig) -> Self {
        Self {
            firestore,
            internals: Some(Arc::new(InstanceInternals::new(config))),
        }
    }

    /// Handle without the listener side-channel, as produced by a store
    /// created without the reduxFirestore enhancer. Listener operations on
    /// it fail with a configuration error.
    pub fn detached() -> Self {
        Self {
            firestore: None,
            internals: None,
        }
    }

    pub fn firestore(&self) -> Option<&Arc<dyn FirestoreDatabase>> {
        self.firestore.as_ref()
    }

    pub fn internals(&self) -> Option<&Arc<InstanceInternals>> {
        self.internals.as_ref()
    }
}

impl fmt::Debug for FirebaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseHandle")
            .field("firestore", &self.firestore.as_ref().map(|_| "dynamic"))
            .field("internals", &self.internals)
            .finish()
    }
}

/// The helpers object handed to applications, binding a handle and the
/// store's dispatch to the action creators (JS `createFirestoreInstance`).
pub struct FirestoreInstance {
    firebase: FirebaseHandle,
    dispatch: Dispatch,
}

impl FirestoreInstance {
    pub fn new(firebase: FirebaseHandle, dispatch: Dispatch) -> Self {
        Self { firebase, dispatch }
    }

    pub fn firebase(&self) -> &FirebaseHandle {
        &self.firebase
    }

    /// Attaches a listener for a single query descriptor (string or object).
    pub fn set_listener(
        &self,
        descriptor: &Value,
        observer: SnapshotObserver,
    ) -> ReduxFirestoreResult<String> {
        let config = query_config_from_entry(descriptor)?;
        attach_listener(&self.firebase, &self.dispatch, Some(&config), observer)
    }

    /// Attaches listeners for an array of query descriptors, in order.
    pub fn set_listeners(&self, descriptors: &Value) -> ReduxFirestoreResult<()> {
        set_listeners(&self.firebase, &self.dispatch, descriptors)
    }

    /// Detaches the listener matching a single query descriptor.
    pub fn unset_listener(&self, descriptor: &Value) -> ReduxFirestoreResult<()> {
        let config = query_config_from_entry(descriptor)?;
        detach_listener(&self.firebase, &self.dispatch, &config)
    }

    /// Detaches listeners for an array of query descriptors, in order.
    pub fn unset_listeners(&self, descriptors: &Value) -> ReduxFirestoreResult<()> {
        unset_listeners(&self.firebase, &self.dispatch, descriptors)
    }

    pub fn add(&self, descriptor: &Value, data: Value) -> ReduxFirestoreResult<Value> {
        let config = query_config_from_entry(descriptor)?;
        actions::add(&self.firebase, &self.dispatch, &config, data)
    }

    pub fn set(&self, descriptor: &Value, data: Value) -> ReduxFirestoreResult<Value> {
        let config = query_config_from_entry(descriptor)?;
        actions::set(&self.firebase, &self.dispatch, &config, data)
    }

    pub fn update(&self, descriptor: &Value, data: Value) -> ReduxFirestoreResult<Value> {
        let config = query_config_from_entry(descriptor)?;
        actions::update(&self.firebase, &self.dispatch, &config, data)
    }

    pub fn delete_ref(&self, descriptor: &Value) -> ReduxFirestoreResult<Value> {
        let config = query_config_from_entry(descriptor)?;
        actions::delete_ref(&self.firebase, &self.dispatch, &config)
    }

    pub fn get(&self, descriptor: &Value) -> ReduxFirestoreResult<Value> {
        let config = query_config_from_entry(descriptor)?;
        actions::get(&self.firebase, &self.dispatch, &config)
    }

    /// Typed entry points for callers that already hold a canonical config.
    pub fn set_listener_config(
        &self,
        config: &QueryConfig,
        observer: SnapshotObserver,
    ) -> ReduxFirestoreResult<String> {
        attach_listener(&self.firebase, &self.dispatch, Some(config), observer)
    }

    pub fn unset_listener_config(&self, config: &QueryConfig) -> ReduxFirestoreResult<()> {
        detach_listener(&self.firebase, &self.dispatch, config)
    }
}

/// Builds the helpers object for a store (JS `createFirestoreInstance`).
pub fn create_firestore_instance(
    firestore: Option<Arc<dyn FirestoreDatabase>>,
    config: InstanceConfig,
    dispatch: Dispatch,
) -> FirestoreInstance {
    FirestoreInstance::new(FirebaseHandle::new(firestore, config), dispatch)
}
