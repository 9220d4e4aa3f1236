use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::errors::AppError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| AppError::Input {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a string to a file.
    ///
    /// The content goes to a temporary file next to the destination which is
    /// then renamed over it, so an interrupted write never leaves a truncated
    /// destination behind. An existing destination keeps its permissions.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        let path = path.as_ref();
        let output_error = |message: String| AppError::Output {
            path: path.to_path_buf(),
            message,
        };

        // The destination directory must already exist
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(output_error(format!("directory {:?} does not exist", parent)));
        }

        let mut staged = NamedTempFile::new_in(parent)
            .map_err(|e| output_error(format!("cannot create temporary file: {}", e)))?;
        staged
            .write_all(content.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| output_error(e.to_string()))?;

        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(staged.path(), metadata.permissions())
                .map_err(|e| output_error(format!("cannot copy permissions: {}", e)))?;
        }

        debug!("Renaming {:?} over {:?}", staged.path(), path);
        staged
            .persist(path)
            .map_err(|e| output_error(e.error.to_string()))?;

        Ok(())
    }
}
