//! Query descriptor normalization and deterministic query naming.
//!
//! Callers describe what to listen to with loosely-shaped JSON (a collection
//! path string, a config object, or an array of either). Everything is
//! converted at this boundary into [`QueryConfig`], the single canonical
//! shape every downstream component consumes.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{validation_error, ReduxFirestoreResult};

const COLLECTION_REQUIRED: &str =
    "Collection and/or Doc are required parameters within query definition object.";
const INVALID_PATH: &str = "Invalid Path Definition: Only Strings and Objects are accepted.";
const WHERE_NOT_ARRAY: &str = "where parameter must be an array.";
const ORDER_BY_INVALID: &str = "orderBy parameter must be an array or string.";
const LIMIT_NOT_NUMBER: &str = "limit parameter must be a number.";

/// One `where` clause: field, optional operator, optional comparison value.
#[derive(Clone, Debug, PartialEq)]
pub struct WhereClause {
    pub field: String,
    pub op: Option<String>,
    pub value: Option<Value>,
}

impl WhereClause {
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: Some(op.into()),
            value: Some(value),
        }
    }

    pub fn field_only(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: None,
            value: None,
        }
    }
}

impl Serialize for WhereClause {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = 1 + usize::from(self.op.is_some()) + usize::from(self.value.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.field)?;
        if let Some(op) = &self.op {
            seq.serialize_element(op)?;
        }
        if let Some(value) = &self.value {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// A single clause or a conjunction of clauses, matching the two accepted
/// input shapes (`[field, op, value]` vs `[[..], [..]]`).
#[derive(Clone, Debug, PartialEq)]
pub enum WhereFilter {
    Clause(WhereClause),
    Clauses(Vec<WhereClause>),
}

impl WhereFilter {
    /// The first clause, which is the only one encoded into query names.
    pub fn first(&self) -> Option<&WhereClause> {
        match self {
            WhereFilter::Clause(clause) => Some(clause),
            WhereFilter::Clauses(clauses) => clauses.first(),
        }
    }

    pub fn clauses(&self) -> Vec<&WhereClause> {
        match self {
            WhereFilter::Clause(clause) => vec![clause],
            WhereFilter::Clauses(clauses) => clauses.iter().collect(),
        }
    }
}

impl Serialize for WhereFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WhereFilter::Clause(clause) => clause.serialize(serializer),
            WhereFilter::Clauses(clauses) => clauses.serialize(serializer),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderByClause {
    pub field: String,
    pub direction: Option<String>,
}

impl OrderByClause {
    pub fn new(field: impl Into<String>, direction: Option<&str>) -> Self {
        Self {
            field: field.into(),
            direction: direction.map(|d| d.to_string()),
        }
    }
}

impl Serialize for OrderByClause {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = 1 + usize::from(self.direction.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.field)?;
        if let Some(direction) = &self.direction {
            seq.serialize_element(direction)?;
        }
        seq.end()
    }
}

/// Ordering input shape: a bare field name, one clause, or several.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderBy {
    Field(String),
    Clause(OrderByClause),
    Clauses(Vec<OrderByClause>),
}

impl OrderBy {
    pub fn clauses(&self) -> Vec<OrderByClause> {
        match self {
            OrderBy::Field(field) => vec![OrderByClause::new(field.clone(), None)],
            OrderBy::Clause(clause) => vec![clause.clone()],
            OrderBy::Clauses(clauses) => clauses.clone(),
        }
    }
}

impl Serialize for OrderBy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OrderBy::Field(field) => serializer.serialize_str(field),
            OrderBy::Clause(clause) => clause.serialize(serializer),
            OrderBy::Clauses(clauses) => clauses.serialize(serializer),
        }
    }
}

/// Canonical, fully-typed form of a query descriptor.
///
/// `collection` is present and non-empty at every level of the tree.
/// Serializes to the JS action shape (camelCase keys, clauses as arrays) so
/// dispatched action metadata matches what reducers written against the JS
/// library expect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryConfig {
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<WhereFilter>,
    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcollections: Option<Vec<QueryConfig>>,
}

impl QueryConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            doc: None,
            filter: None,
            order_by: None,
            limit: None,
            subcollections: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_filter(mut self, filter: WhereFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_subcollections(mut self, subcollections: Vec<QueryConfig>) -> Self {
        self.subcollections = Some(subcollections);
        self
    }
}

/// Normalizes a query descriptor into canonical configs, in input order.
///
/// Accepts a collection-path string, a config object, or an array mixing
/// both. Always returns a `Vec`, also for single inputs (the JS library was
/// inconsistent here; one convention is applied uniformly).
pub fn get_query_configs(queries: &Value) -> ReduxFirestoreResult<Vec<QueryConfig>> {
    match queries {
        Value::Array(entries) => entries.iter().map(query_config_from_entry).collect(),
        Value::String(_) | Value::Object(_) => Ok(vec![query_config_from_entry(queries)?]),
        _ => Err(validation_error("Querie(s) must be an Array or a string")),
    }
}

/// Normalizes one descriptor entry (string or object).
pub fn query_config_from_entry(entry: &Value) -> ReduxFirestoreResult<QueryConfig> {
    match entry {
        Value::String(path) if !path.is_empty() => Ok(QueryConfig::new(path)),
        Value::Object(_) => query_config_from_object(entry),
        _ => Err(validation_error(INVALID_PATH)),
    }
}

fn query_config_from_object(descriptor: &Value) -> ReduxFirestoreResult<QueryConfig> {
    let collection = match descriptor.get("collection").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(validation_error(COLLECTION_REQUIRED)),
    };
    let mut config = QueryConfig::new(collection);

    if let Some(doc) = descriptor.get("doc") {
        let doc = doc
            .as_str()
            .ok_or_else(|| validation_error("doc parameter must be a string."))?;
        config.doc = Some(doc.to_string());
    }
    if let Some(filter) = descriptor.get("where") {
        config.filter = Some(parse_where(filter)?);
    }
    if let Some(order_by) = descriptor.get("orderBy") {
        config.order_by = Some(parse_order_by(order_by)?);
    }
    if let Some(limit) = descriptor.get("limit") {
        let limit = limit
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| validation_error(LIMIT_NOT_NUMBER))?;
        config.limit = Some(limit);
    }
    if let Some(subcollections) = descriptor.get("subcollections") {
        let entries = subcollections
            .as_array()
            .ok_or_else(|| validation_error(COLLECTION_REQUIRED))?;
        let parsed = entries
            .iter()
            .map(|entry| match entry {
                Value::Object(_) => query_config_from_object(entry),
                _ => Err(validation_error(COLLECTION_REQUIRED)),
            })
            .collect::<ReduxFirestoreResult<Vec<_>>>()?;
        config.subcollections = Some(parsed);
    }

    Ok(config)
}

fn parse_where(filter: &Value) -> ReduxFirestoreResult<WhereFilter> {
    let entries = filter
        .as_array()
        .ok_or_else(|| validation_error(WHERE_NOT_ARRAY))?;
    match entries.first() {
        Some(Value::String(_)) => Ok(WhereFilter::Clause(parse_where_clause(entries)?)),
        Some(Value::Array(_)) => {
            let clauses = entries
                .iter()
                .map(|entry| match entry {
                    Value::Array(clause) => parse_where_clause(clause),
                    _ => Err(validation_error(WHERE_NOT_ARRAY)),
                })
                .collect::<ReduxFirestoreResult<Vec<_>>>()?;
            Ok(WhereFilter::Clauses(clauses))
        }
        _ => Err(validation_error(WHERE_NOT_ARRAY)),
    }
}

fn parse_where_clause(clause: &[Value]) -> ReduxFirestoreResult<WhereClause> {
    let field = clause
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| validation_error(WHERE_NOT_ARRAY))?;
    let op = match clause.get(1) {
        Some(op) => Some(
            op.as_str()
                .ok_or_else(|| validation_error(WHERE_NOT_ARRAY))?
                .to_string(),
        ),
        None => None,
    };
    Ok(WhereClause {
        field: field.to_string(),
        op,
        value: clause.get(2).cloned(),
    })
}

fn parse_order_by(order_by: &Value) -> ReduxFirestoreResult<OrderBy> {
    match order_by {
        Value::String(field) => Ok(OrderBy::Field(field.clone())),
        Value::Array(entries) => match entries.first() {
            Some(Value::String(_)) => Ok(OrderBy::Clause(parse_order_by_clause(entries)?)),
            Some(Value::Array(_)) => {
                let clauses = entries
                    .iter()
                    .map(|entry| match entry {
                        Value::Array(clause) => parse_order_by_clause(clause),
                        _ => Err(validation_error(ORDER_BY_INVALID)),
                    })
                    .collect::<ReduxFirestoreResult<Vec<_>>>()?;
                Ok(OrderBy::Clauses(clauses))
            }
            _ => Err(validation_error(ORDER_BY_INVALID)),
        },
        _ => Err(validation_error(ORDER_BY_INVALID)),
    }
}

fn parse_order_by_clause(clause: &[Value]) -> ReduxFirestoreResult<OrderByClause> {
    let field = clause
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| validation_error(ORDER_BY_INVALID))?;
    let direction = match clause.get(1) {
        Some(direction) => Some(
            direction
                .as_str()
                .ok_or_else(|| validation_error(ORDER_BY_INVALID))?
                .to_string(),
        ),
        None => None,
    };
    Ok(OrderByClause {
        field: field.to_string(),
        direction,
    })
}

/// Derives the deterministic registry key for a config:
/// `collection[/doc][/subcollection[/doc]...][?where::<field><op><value>]`.
///
/// Only the first where clause contributes to the name. Configs that differ
/// solely in later clauses therefore collapse to the same key; the listener
/// registry depends on this, so it is kept as-is rather than fixed.
pub fn query_name(meta: &QueryConfig) -> ReduxFirestoreResult<String> {
    let mut name = path_name(meta)?;
    if let Some(clause) = meta.filter.as_ref().and_then(WhereFilter::first) {
        name.push_str("?where::");
        name.push_str(&clause.field);
        if let Some(op) = &clause.op {
            name.push_str(op);
        }
        if let Some(value) = &clause.value {
            name.push_str(&render_name_value(value));
        }
    }
    Ok(name)
}

fn path_name(config: &QueryConfig) -> ReduxFirestoreResult<String> {
    if config.collection.is_empty() {
        return Err(validation_error("Collection is required to build query name"));
    }
    let mut name = config.collection.clone();
    if let Some(doc) = &config.doc {
        name.push('/');
        name.push_str(doc);
    }
    for sub in config.subcollections.iter().flatten() {
        name.push('/');
        name.push_str(&path_name(sub)?);
    }
    Ok(name)
}

fn render_name_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
