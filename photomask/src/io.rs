//! Filesystem helpers that record the offending path on failure.

use std::fs::{self, File};
use std::path::Path;

use crate::error::{with_err_context, ErrorContext, Result};

pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    with_err_context(fs::read_to_string(path), || {
        ErrorContext::ReadFile(path.into())
    })
}

/// Creates `path` for writing, along with any missing parent directories.
pub fn create_file(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    with_err_context(File::create(path), || ErrorContext::CreateFile(path.into()))
}

/// Ensures the directory that will contain `path` exists.
pub fn create_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let Some(dir) = path.as_ref().parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    with_err_context(fs::create_dir_all(dir), || ErrorContext::CreateDir(dir.into()))
}
