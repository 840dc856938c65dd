//! Builds live SDK references from canonical query configurations.

use std::sync::Arc;

use crate::error::{configuration_error, ReduxFirestoreResult};
use crate::instance::FirebaseHandle;
use crate::query::QueryConfig;
use crate::sdk::FirestoreReference;

/// Walks a canonical config and produces a chained collection/document/query
/// reference: `collection`, optional `doc`, each subcollection recursively,
/// then modifiers in fixed order (where, orderBy, limit).
///
/// Returns the final reference; never dispatches or subscribes.
pub fn firestore_ref(
    firebase: &FirebaseHandle,
    meta: &QueryConfig,
) -> ReduxFirestoreResult<Arc<dyn FirestoreReference>> {
    let firestore = firebase
        .firestore()
        .ok_or_else(|| configuration_error("Firestore must be required and initalized."))?;
    Ok(build_reference(firestore.collection(&meta.collection), meta))
}

fn build_reference(
    base: Arc<dyn FirestoreReference>,
    config: &QueryConfig,
) -> Arc<dyn FirestoreReference> {
    let mut reference = base;
    if let Some(doc) = &config.doc {
        reference = reference.doc(doc);
    }
    for sub in config.subcollections.iter().flatten() {
        reference = build_reference(reference.collection(&sub.collection), sub);
    }
    if let Some(filter) = &config.filter {
        for clause in filter.clauses() {
            reference =
                reference.where_field(&clause.field, clause.op.as_deref(), clause.value.as_ref());
        }
    }
    if let Some(order_by) = &config.order_by {
        for clause in order_by.clauses() {
            reference = reference.order_by(&clause.field, clause.direction.as_deref());
        }
    }
    if let Some(limit) = config.limit {
        reference = reference.limit(limit);
    }
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{FirebaseHandle, InstanceConfig};
    use crate::query::{OrderBy, OrderByClause, WhereClause, WhereFilter};
    use crate::test_support::MockFirestore;
    use serde_json::json;

    fn handle(mock: &MockFirestore) -> FirebaseHandle {
        FirebaseHandle::new(Some(mock.database()), InstanceConfig::default())
    }

    #[test]
    fn requires_initialized_firestore() {
        let firebase = FirebaseHandle::new(None, InstanceConfig::default());
        let err = firestore_ref(&firebase, &QueryConfig::new("test"))
            .err()
            .unwrap();
        assert_eq!(err.message(), "Firestore must be required and initalized.");
    }

    #[test]
    fn builds_doc_reference() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test").with_doc("other");
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(mock.calls(), ["collection(test)", "doc(other)"]);
    }

    #[test]
    fn chains_subcollections() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test")
            .with_doc("other")
            .with_subcollections(vec![QueryConfig::new("thing").with_doc("again")]);
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(
            mock.calls(),
            [
                "collection(test)",
                "doc(other)",
                "collection(thing)",
                "doc(again)"
            ]
        );
    }

    #[test]
    fn applies_subcollection_modifiers_before_outer_ones() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test")
            .with_doc("other")
            .with_subcollections(vec![QueryConfig::new("thing")
                .with_filter(WhereFilter::Clause(WhereClause::field_only("some")))])
            .with_limit(10);
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(
            mock.calls(),
            [
                "collection(test)",
                "doc(other)",
                "collection(thing)",
                "where(some)",
                "limit(10)"
            ]
        );
    }

    #[test]
    fn applies_single_where_clause() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test")
            .with_filter(WhereFilter::Clause(WhereClause::new("a", "==", json!("b"))));
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(mock.calls(), ["collection(test)", "where(a == \"b\")"]);
    }

    #[test]
    fn applies_one_call_per_compound_clause() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test").with_filter(WhereFilter::Clauses(vec![
            WhereClause::new("a", "==", json!("b")),
            WhereClause::new("c", ">", json!(2)),
        ]));
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(
            mock.calls(),
            ["collection(test)", "where(a == \"b\")", "where(c > 2)"]
        );
    }

    #[test]
    fn applies_order_by_shapes() {
        let mock = MockFirestore::new();
        let meta = QueryConfig::new("test")
            .with_order_by(OrderBy::Clauses(vec![
                OrderByClause::new("a", None),
                OrderByClause::new("b", Some("desc")),
            ]))
            .with_limit(5);
        firestore_ref(&handle(&mock), &meta).unwrap();
        assert_eq!(
            mock.calls(),
            [
                "collection(test)",
                "orderBy(a)",
                "orderBy(b desc)",
                "limit(5)"
            ]
        );
    }
}
