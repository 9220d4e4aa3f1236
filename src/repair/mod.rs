/*!
 * Integrity repairs applied to an annotation document.
 *
 * Each pass validates the records it reads before touching any of them, so a
 * schema error leaves the document exactly as it was loaded.
 */

pub mod category_names;
pub mod duplicate_ids;

pub use category_names::{
    AliasTable, NameFix, apply_category_renames, normalize_category_names, plan_category_renames,
};
pub use duplicate_ids::{IdFix, dedupe_annotation_ids};

use crate::document::AnnotationDocument;
use crate::errors::SchemaError;

/// Everything changed by one repair run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairReport {
    /// Annotation id rewrites, in encounter order
    pub id_fixes: Vec<IdFix>,

    /// Category name rewrites, in document order
    pub name_fixes: Vec<NameFix>,
}

impl RepairReport {
    /// True when the document needed no change
    pub fn is_clean(&self) -> bool {
        self.id_fixes.is_empty() && self.name_fixes.is_empty()
    }
}

/// Run both passes over a document: ids first, then category names.
///
/// Category records are checked and the renames planned before any id is
/// rewritten, so a bad category never leaves renumbered annotations behind.
pub fn repair_document(
    document: &mut AnnotationDocument,
    aliases: &AliasTable,
) -> Result<RepairReport, SchemaError> {
    document.annotations()?;
    let name_fixes = plan_category_renames(document.categories()?, aliases)?;

    let id_fixes = dedupe_annotation_ids(document.annotations_mut()?)?;
    apply_category_renames(document.categories_mut()?, &name_fixes);

    Ok(RepairReport { id_fixes, name_fixes })
}
