//! Test utilities shared across crate-level unit and integration tests.

pub mod firestore;

pub use firestore::{recording_dispatch, MockFirestore};
