//! Progress reporting for archive creation.
//!
//! [`ProgressCallback`] receives one event per walked entry. [`EntryListing`]
//! is the implementation behind verbose mode: it prints each file's size and
//! archive name as the file is added.

use crate::creation::report::PackReport;
use crate::creation::walker::ArchiveEntry;
use std::io::Write;
use std::path::Path;

/// Receives progress updates while an archive is being written.
///
/// # Examples
///
/// ```
/// use imagepack_core::ProgressCallback;
/// use imagepack_core::creation::walker::ArchiveEntry;
///
/// struct Counter(usize);
///
/// impl ProgressCallback for Counter {
///     fn on_entry_start(&mut self, _entry: &ArchiveEntry, _total: usize, _current: usize) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry is written.
    ///
    /// # Arguments
    ///
    /// * `entry` - The file about to be added
    /// * `total` - Total number of files that will be added
    /// * `current` - Current file number (1-indexed)
    fn on_entry_start(&mut self, entry: &ArchiveEntry, total: usize, current: usize);

    /// Called after an entry's content has been written.
    fn on_entry_complete(&mut self, _entry: &ArchiveEntry) {}

    /// Called for a walked entry that is not a regular file.
    fn on_entry_skipped(&mut self, _path: &Path) {}

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self, _report: &PackReport) {}
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _entry: &ArchiveEntry, _total: usize, _current: usize) {}
}

/// Writes one line per added file: the size right-aligned in 11 columns
/// with `,` thousands separators, then the archive name.
///
/// Write failures on the listing sink are ignored; they never abort
/// packaging.
///
/// # Examples
///
/// ```
/// use imagepack_core::creation::progress::EntryListing;
/// use imagepack_core::creation::walker::ArchiveEntry;
/// use imagepack_core::ProgressCallback;
/// use std::path::PathBuf;
///
/// let mut listing = EntryListing::new(Vec::new());
/// let entry = ArchiveEntry {
///     path: PathBuf::from("image/release"),
///     archive_name: PathBuf::from("jdk-9/release"),
///     size: 1234,
///     mode: 0o644,
/// };
/// listing.on_entry_start(&entry, 1, 1);
/// assert_eq!(listing.into_inner(), b"      1,234 jdk-9/release\n");
/// ```
#[derive(Debug)]
pub struct EntryListing<W: Write> {
    out: W,
}

impl<W: Write> EntryListing<W> {
    /// Creates a listing writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressCallback for EntryListing<W> {
    fn on_entry_start(&mut self, entry: &ArchiveEntry, _total: usize, _current: usize) {
        let _ = writeln!(
            self.out,
            "{}",
            format_entry_line(entry.size, &entry.archive_name.to_string_lossy())
        );
    }

    fn on_complete(&mut self, _report: &PackReport) {
        let _ = self.out.flush();
    }
}

/// Formats a verbose listing line (without newline).
///
/// # Examples
///
/// ```
/// use imagepack_core::creation::progress::format_entry_line;
///
/// assert_eq!(format_entry_line(4, "jdk-9/a.txt"), "          4 jdk-9/a.txt");
/// assert_eq!(
///     format_entry_line(123_456_789_012, "big"),
///     "123,456,789,012 big"
/// );
/// ```
#[must_use]
pub fn format_entry_line(size: u64, archive_name: &str) -> String {
    format!("{:>11} {archive_name}", group_thousands(size))
}

/// Renders `n` with `,` between each group of three digits.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
