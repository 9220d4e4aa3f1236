/*!
 * In-memory annotation document.
 *
 * The document is kept as the original JSON object so that every field this
 * tool does not touch (`info`, `images`, `licenses`, per-record geometry...)
 * is written back verbatim and in its original key order. Only the
 * `annotations` and `categories` sections are exposed for mutation.
 */

use std::path::Path;

use log::debug;
use serde_json::{Map, Value};

use crate::errors::{AppError, SchemaError};
use crate::file_utils::FileManager;

/// Name of the annotation section
pub const ANNOTATIONS: &str = "annotations";

/// Name of the category section
pub const CATEGORIES: &str = "categories";

/// A COCO-style annotation document held entirely in memory
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDocument {
    root: Map<String, Value>,
}

impl AnnotationDocument {
    /// Wrap a parsed JSON value, checking that both sections are present
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(root) = value else {
            return Err(SchemaError::RootNotObject);
        };

        let document = Self { root };
        document.section(ANNOTATIONS)?;
        document.section(CATEGORIES)?;
        Ok(document)
    }

    /// Read and parse a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;
        debug!("Read {} bytes from {:?}", text.len(), path);

        let value: Value = serde_json::from_str(&text).map_err(|source| AppError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_value(value)?)
    }

    /// Serialize with 2-space indentation
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }

    /// Serialize and write the document to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let path = path.as_ref();
        let text = self.to_pretty_string().map_err(|e| AppError::Output {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        FileManager::write_to_file(path, &text)?;
        debug!("Wrote {} bytes to {:?}", text.len(), path);
        Ok(())
    }

    /// Annotation records, in document order
    pub fn annotations(&self) -> Result<&[Value], SchemaError> {
        self.section(ANNOTATIONS)
    }

    pub fn annotations_mut(&mut self) -> Result<&mut [Value], SchemaError> {
        self.section_mut(ANNOTATIONS)
    }

    /// Category records, in document order
    pub fn categories(&self) -> Result<&[Value], SchemaError> {
        self.section(CATEGORIES)
    }

    pub fn categories_mut(&mut self) -> Result<&mut [Value], SchemaError> {
        self.section_mut(CATEGORIES)
    }

    fn section(&self, name: &'static str) -> Result<&[Value], SchemaError> {
        match self.root.get(name) {
            Some(Value::Array(records)) => Ok(records.as_slice()),
            Some(_) => Err(SchemaError::SectionNotArray(name)),
            None => Err(SchemaError::MissingSection(name)),
        }
    }

    fn section_mut(&mut self, name: &'static str) -> Result<&mut [Value], SchemaError> {
        match self.root.get_mut(name) {
            Some(Value::Array(records)) => Ok(records.as_mut_slice()),
            Some(_) => Err(SchemaError::SectionNotArray(name)),
            None => Err(SchemaError::MissingSection(name)),
        }
    }
}
