//! Error conversion utilities for CLI.
//!
//! Converts imagepack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use imagepack_core::PackError;
use std::path::Path;

/// Converts `PackError` to a user-friendly anyhow error with context.
pub fn convert_pack_error(err: PackError, archive: &Path, image: &Path) -> anyhow::Error {
    match err {
        PackError::UnsupportedFormat { path } => {
            anyhow!(
                "Unsupported archive kind: {}\n\
                 HINT: The archive name must end in .zip, .tar, .tgz or .tar.gz",
                path.display()
            )
        }
        PackError::SourceNotFound { path } => {
            anyhow!(
                "Image directory not found: {}\n\
                 HINT: Check that the image has been built before packaging it.",
                path.display()
            )
        }
        PackError::SourceNotDirectory { path } => {
            anyhow!(
                "Image path is not a directory: {}\n\
                 HINT: IMAGE is the last argument: imagepack <PREFIX> <ARCHIVE> <IMAGE>",
                path.display()
            )
        }
        PackError::InvalidPath { path } => {
            anyhow!(
                "Path is not valid UTF-8: {}\n\
                 HINT: Zip entry names must be UTF-8; package '{}' as .tar or .tgz, \
                 or rename the file.",
                path.display(),
                image.display()
            )
        }
        PackError::Io(io_err) => {
            anyhow!(
                "I/O error while packaging '{}' into '{}': {}",
                image.display(),
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error packaging archive '{}'", archive.display())),
    }
}
