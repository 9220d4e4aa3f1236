/*!
 * Category name normalization.
 *
 * Categories whose name is a known alias are renamed to the canonical
 * spelling. Names are matched verbatim: no case folding, no trimming.
 */

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::document::CATEGORIES;
use crate::errors::SchemaError;

const NAME_FIELD: &str = "name";

// Canonical names follow the map_*.csv files shipped with the dataset
static BUILTIN_ALIASES: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    [("Food can", "Food Can")]
        .into_iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect()
});

/// Mapping from inconsistent category names to their canonical form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// The table of aliases known to exist in published annotation files
    pub fn builtin() -> Self {
        Self {
            entries: (*BUILTIN_ALIASES).clone(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace an alias
    pub fn insert(&mut self, alias: String, canonical: String) {
        self.entries.insert(alias, canonical);
    }

    /// Canonical name for an alias, if the name is one
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(alias, canonical)| (alias.into(), canonical.into()))
                .collect(),
        }
    }
}

/// One renamed category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFix {
    /// Position of the category in the section
    pub index: usize,
    pub old_name: String,
    pub new_name: String,
}

impl fmt::Display for NameFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> '{}'", self.old_name, self.new_name)
    }
}

/// Rename every category whose name is an alias key.
///
/// All names are read and checked first; a record that is not an object or
/// whose name is not a string fails the pass before any rename happens.
pub fn normalize_category_names(
    categories: &mut [Value],
    aliases: &AliasTable,
) -> Result<Vec<NameFix>, SchemaError> {
    let fixes = plan_category_renames(categories, aliases)?;
    apply_category_renames(categories, &fixes);
    Ok(fixes)
}

/// Check every category name and list the renames the alias table calls for,
/// without changing anything
pub fn plan_category_renames(
    categories: &[Value],
    aliases: &AliasTable,
) -> Result<Vec<NameFix>, SchemaError> {
    let mut fixes = Vec::new();

    for (index, record) in categories.iter().enumerate() {
        let name = read_name(record, index)?;
        if let Some(canonical) = aliases.canonical_name(name) {
            fixes.push(NameFix {
                index,
                old_name: name.to_string(),
                new_name: canonical.to_string(),
            });
        }
    }

    Ok(fixes)
}

/// Apply renames produced by [`plan_category_renames`] for the same section
pub fn apply_category_renames(categories: &mut [Value], fixes: &[NameFix]) {
    for fix in fixes {
        if let Some(record) = categories.get_mut(fix.index).and_then(Value::as_object_mut) {
            record.insert(NAME_FIELD.to_string(), Value::from(fix.new_name.as_str()));
        }
        debug!("categories[{}]: name {}", fix.index, fix);
    }
}

fn read_name(record: &Value, index: usize) -> Result<&str, SchemaError> {
    let object = record.as_object().ok_or(SchemaError::RecordNotObject {
        section: CATEGORIES,
        index,
    })?;
    let name = object.get(NAME_FIELD).ok_or(SchemaError::MissingField {
        section: CATEGORIES,
        index,
        field: NAME_FIELD,
    })?;

    name.as_str().ok_or_else(|| SchemaError::InvalidField {
        section: CATEGORIES,
        index,
        field: NAME_FIELD,
        expected: "a string",
        found: name.to_string(),
    })
}
