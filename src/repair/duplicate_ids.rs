/*!
 * Duplicate annotation id repair.
 *
 * The first annotation carrying a given id keeps it. Every later annotation
 * with the same id is renumbered past the largest id in the section, in
 * encounter order, so new ids can never collide with old or new ones.
 */

use std::collections::HashSet;
use std::fmt;

use log::debug;
use serde_json::Value;

use crate::document::ANNOTATIONS;
use crate::errors::SchemaError;

const ID_FIELD: &str = "id";

/// One renumbered annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdFix {
    /// Position of the annotation in the section
    pub index: usize,
    pub old_id: u64,
    pub new_id: u64,
}

impl fmt::Display for IdFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old_id, self.new_id)
    }
}

/// Give every duplicated annotation id a fresh value.
///
/// Returns the rewrites in the order they were applied. Fails without
/// modifying anything if a record is not an object or its id is not a
/// non-negative integer.
pub fn dedupe_annotation_ids(annotations: &mut [Value]) -> Result<Vec<IdFix>, SchemaError> {
    let mut seen = HashSet::with_capacity(annotations.len());
    let mut duplicates = Vec::new();
    let mut max_id = 0u64;

    for (index, record) in annotations.iter().enumerate() {
        let id = read_id(record, index)?;
        max_id = max_id.max(id);
        if !seen.insert(id) {
            duplicates.push((index, id));
        }
    }

    if duplicates.is_empty() {
        return Ok(Vec::new());
    }

    // Every new id must fit before anything is rewritten
    if max_id.checked_add(duplicates.len() as u64).is_none() {
        let (index, id) = duplicates[0];
        return Err(SchemaError::InvalidField {
            section: ANNOTATIONS,
            index,
            field: ID_FIELD,
            expected: "an id leaving room for renumbering",
            found: id.to_string(),
        });
    }

    let mut fixes = Vec::with_capacity(duplicates.len());
    for (index, old_id) in duplicates {
        max_id += 1;
        if let Some(record) = annotations[index].as_object_mut() {
            record.insert(ID_FIELD.to_string(), Value::from(max_id));
        }
        debug!("annotations[{}]: id {} -> {}", index, old_id, max_id);
        fixes.push(IdFix { index, old_id, new_id: max_id });
    }

    Ok(fixes)
}

fn read_id(record: &Value, index: usize) -> Result<u64, SchemaError> {
    let object = record.as_object().ok_or(SchemaError::RecordNotObject {
        section: ANNOTATIONS,
        index,
    })?;
    let id = object.get(ID_FIELD).ok_or(SchemaError::MissingField {
        section: ANNOTATIONS,
        index,
        field: ID_FIELD,
    })?;

    id.as_u64().ok_or_else(|| SchemaError::InvalidField {
        section: ANNOTATIONS,
        index,
        field: ID_FIELD,
        expected: "a non-negative integer",
        found: id.to_string(),
    })
}
