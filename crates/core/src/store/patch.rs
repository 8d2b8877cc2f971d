//! Partial updates over JSON documents.

use serde_json::Value;

use super::{Entity, StoreError};

/// Applies `patch` to `record`: every key present in the serialized patch
/// replaces the record's key, everything else is kept.
///
/// Backends that store documents use this to implement `update`.
pub fn merge_patch<E: Entity>(record: &E, patch: &E::Patch) -> Result<E, StoreError> {
    let mut document = serde_json::to_value(record)?;
    let patch = serde_json::to_value(patch)?;

    match (&mut document, patch) {
        (Value::Object(target), Value::Object(fields)) => {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        _ => {
            return Err(StoreError::backend(format!(
                "{} record and patch must both be JSON objects",
                E::KIND
            )));
        }
    }

    Ok(serde_json::from_value(document)?)
}
