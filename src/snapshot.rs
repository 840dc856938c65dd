use serde_json::{Map, Value};

/// State of a single document as delivered by the backing SDK.
///
/// `exists` and `data` are carried separately: a snapshot for a missing
/// document has `exists == false` regardless of any cached payload.
#[derive(Clone, Debug, PartialEq)]
pub struct DocSnapshot {
    id: String,
    exists: bool,
    data: Option<Value>,
}

impl DocSnapshot {
    pub fn new(id: impl Into<String>, exists: bool, data: Option<Value>) -> Self {
        Self {
            id: id.into(),
            exists,
            data,
        }
    }

    /// Snapshot for a document that does not exist on the backend.
    pub fn missing(id: impl Into<String>) -> Self {
        Self::new(id, false, None)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Returns the document fields, if any were delivered.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// Snapshot delivered to a listener: either a single document or the
/// current contents of a collection query, in delivery order.
#[derive(Clone, Debug, PartialEq)]
pub enum ListenerSnapshot {
    Doc(DocSnapshot),
    Collection(Vec<DocSnapshot>),
}

impl ListenerSnapshot {
    pub fn doc(id: impl Into<String>, exists: bool, data: Option<Value>) -> Self {
        ListenerSnapshot::Doc(DocSnapshot::new(id, exists, data))
    }

    pub fn collection(docs: Vec<DocSnapshot>) -> Self {
        ListenerSnapshot::Collection(docs)
    }
}

/// Flattens a snapshot into an ordered list of `{id, ...fields}` records.
///
/// Object payloads are merged beside the `id` key; scalar payloads are kept
/// under a `data` key. Documents that do not exist contribute nothing, so a
/// missing document and an empty collection both produce an empty list.
pub fn ordered_from_snap(snapshot: &ListenerSnapshot) -> Vec<Value> {
    match snapshot {
        ListenerSnapshot::Doc(doc) if doc.exists() => vec![ordered_record(doc)],
        ListenerSnapshot::Doc(_) => Vec::new(),
        ListenerSnapshot::Collection(docs) => docs.iter().map(ordered_record).collect(),
    }
}

/// Indexes a snapshot's documents by id.
///
/// Returns `None` when the snapshot holds no data at all: a single document
/// with `exists == false`, or a collection result with no children.
pub fn data_by_id_snapshot(snapshot: &ListenerSnapshot) -> Option<Map<String, Value>> {
    let mut data = Map::new();
    match snapshot {
        ListenerSnapshot::Doc(doc) => {
            if doc.exists() {
                data.insert(doc.id().to_string(), doc_data(doc));
            }
        }
        ListenerSnapshot::Collection(docs) => {
            for doc in docs {
                data.insert(doc.id().to_string(), doc_data(doc));
            }
        }
    }
    if data.is_empty() {
        None
    } else {
        Some(data)
    }
}

fn doc_data(doc: &DocSnapshot) -> Value {
    doc.data().cloned().unwrap_or(Value::Null)
}

fn ordered_record(doc: &DocSnapshot) -> Value {
    let mut record = Map::new();
    record.insert("id".to_string(), Value::String(doc.id().to_string()));
    match doc.data() {
        Some(Value::Object(fields)) => {
            for (key, value) in fields {
                record.insert(key.clone(), value.clone());
            }
        }
        Some(other) => {
            record.insert("data".to_string(), other.clone());
        }
        None => {}
    }
    Value::Object(record)
}
