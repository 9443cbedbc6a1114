use crate::error::Result;
use crate::model::{Audit, Collection, RunDocument, RunRef};
use crate::store::DataStore;
use serde::Serialize;
use serde_json::Value;

/// Record counts of a run's three collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub pages: u64,
    pub images: u64,
    pub errors: u64,
}

/// Parse crawl output leniently: unreadable or malformed JSON is logged and dropped.
pub fn parse_lenient(raw: Option<String>, what: &str) -> Option<Value> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(document = what, error = %e, "ignoring malformed JSON");
            None
        }
    }
}

/// Read a run document, treating I/O failures and bad JSON as absence.
pub fn read_document_lenient<S: DataStore>(
    store: &S,
    run: &RunRef,
    doc: RunDocument,
) -> Option<Value> {
    match store.read_document(run, doc) {
        Ok(raw) => parse_lenient(raw, doc.file_name()),
        Err(e) => {
            tracing::warn!(run = %run, document = doc.file_name(), error = %e, "unreadable document");
            None
        }
    }
}

pub fn load_audit<S: DataStore>(store: &S, run: &RunRef) -> Audit {
    read_document_lenient(store, run, RunDocument::Audit)
        .map(Audit::from_value)
        .unwrap_or_default()
}

/// Names of a collection's records; an unreadable collection counts as empty.
pub fn record_names<S: DataStore>(store: &S, run: &RunRef, collection: Collection) -> Vec<String> {
    store.list_records(run, collection).unwrap_or_else(|e| {
        tracing::warn!(run = %run, collection = collection.dir_name(), error = %e, "unreadable collection");
        Vec::new()
    })
}

/// File counts only; records are not parsed.
pub fn record_counts<S: DataStore>(store: &S, run: &RunRef) -> RecordCounts {
    let count = |c| record_names(store, run, c).len() as u64;
    RecordCounts {
        pages: count(Collection::Pages),
        images: count(Collection::Images),
        errors: count(Collection::Errors),
    }
}

pub fn write_json<S: DataStore, T: Serialize>(
    store: &mut S,
    run: &RunRef,
    doc: RunDocument,
    value: &T,
) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    store.write_document(run, doc, &content)
}
