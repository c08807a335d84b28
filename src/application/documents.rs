//! Typed decoding of stored documents.
//!
//! Corrupt documents are logged and treated as missing so one bad row
//! never takes a whole view down.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ports::Collection;

/// Decodes one document, `None` (with a warning) if it does not fit `T`.
pub(crate) fn decode<T: DeserializeOwned>(collection: Collection, key: &str, doc: Value) -> Option<T> {
    match serde_json::from_value(doc) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(collection = %collection, key, error = %e, "Ignoring corrupt document");
            None
        }
    }
}

/// Decodes every document that fits `T`, skipping the rest.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: Collection, docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let key = doc
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string();
            decode(collection, &key, doc)
        })
        .collect()
}
