//! Packaging operation reporting.

use crate::formats::detect::ArchiveFormat;
use std::path::PathBuf;
use std::time::Duration;

/// Report of one archive creation.
///
/// # Examples
///
/// ```
/// use imagepack_core::creation::PackReport;
///
/// let mut report = PackReport::default();
/// report.files_added = 10;
/// report.bytes_written = 1024;
/// report.bytes_compressed = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Format that was written.
    pub format: Option<ArchiveFormat>,

    /// Number of regular files added to the archive.
    pub files_added: usize,

    /// Number of walked entries that were not archived (symlinks and other
    /// non-regular files).
    pub files_skipped: usize,

    /// Number of source files whose permissions were widened.
    pub permissions_normalized: usize,

    /// Total content bytes read from source files.
    pub bytes_written: u64,

    /// Size of the finished archive file.
    pub bytes_compressed: u64,

    /// Duration of the creation operation.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (content bytes / archive bytes).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }
}

/// Everything produced by a full packaging run.
#[derive(Debug, Clone)]
pub struct PackageOutput {
    /// Path of the written archive.
    pub archive_path: PathBuf,

    /// Path of the `.sha1` sidecar.
    pub digest_path: PathBuf,

    /// Lowercase hex SHA-1 of the archive.
    pub digest: String,

    /// Archive creation statistics.
    pub report: PackReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_report_default() {
        let report = PackReport::default();
        assert_eq!(report.format, None);
        assert_eq!(report.files_added, 0);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(report.permissions_normalized, 0);
        assert_eq!(report.bytes_written, 0);
        assert_eq!(report.bytes_compressed, 0);
        assert_eq!(report.duration, Duration::default());
        assert!(!report.has_warnings());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_ratio() {
        let mut report = PackReport::new();

        report.bytes_written = 1000;
        report.bytes_compressed = 500;
        assert_eq!(report.compression_ratio(), 2.0);

        // Tar overhead makes small images larger than their content
        report.bytes_written = 4;
        report.bytes_compressed = 2048;
        assert_eq!(report.compression_ratio(), 4.0 / 2048.0);

        report.bytes_written = 0;
        assert_eq!(report.compression_ratio(), 0.0);

        report.bytes_written = 1000;
        report.bytes_compressed = 0;
        assert_eq!(report.compression_ratio(), 0.0);
    }

    #[test]
    fn test_warnings() {
        let mut report = PackReport::new();
        report.add_warning("skipped symlink: lib/libfoo.so");
        report.add_warning(String::from("second"));
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0], "skipped symlink: lib/libfoo.so");
    }
}
