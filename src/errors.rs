/*!
 * Error types for the annofix application.
 *
 * This module contains custom error types for the different failure modes
 * of a fix run, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Shape violations found while reading the annotation document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The document root is not a JSON object
    #[error("Document root must be a JSON object")]
    RootNotObject,

    /// A required top-level field is absent
    #[error("Missing top-level field '{0}'")]
    MissingSection(&'static str),

    /// A top-level field is present but is not an array
    #[error("Top-level field '{0}' must be an array")]
    SectionNotArray(&'static str),

    /// A record inside a section is not a JSON object
    #[error("{section}[{index}] must be a JSON object")]
    RecordNotObject {
        /// Section the record belongs to
        section: &'static str,
        /// Position of the record in its section
        index: usize,
    },

    /// A record lacks a required field
    #[error("{section}[{index}] is missing field '{field}'")]
    MissingField {
        section: &'static str,
        index: usize,
        field: &'static str,
    },

    /// A record field holds a value of the wrong type
    #[error("{section}[{index}].{field} must be {expected}, found {found}")]
    InvalidField {
        section: &'static str,
        index: usize,
        field: &'static str,
        /// Human readable description of the accepted values
        expected: &'static str,
        /// The offending value as JSON text
        found: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The input file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not valid JSON
    #[error("Failed to parse {path:?} as JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document does not have the expected shape
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The output file could not be written
    #[error("Failed to write {path:?}: {message}")]
    Output { path: PathBuf, message: String },
}
