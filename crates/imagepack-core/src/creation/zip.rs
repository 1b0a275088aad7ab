//! ZIP archive writing.

use crate::Result;
use crate::creation::walker::ArchiveEntry;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Files at or above this size need ZIP64 extra fields.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Writes image entries into a deflate-compressed ZIP archive.
///
/// Entry modes keep only the `0o777` bits: setuid, setgid and sticky bits
/// are dropped by the zip writer, unlike in tar output. Entry names must be
/// valid UTF-8.
pub struct ZipPacker<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipPacker<W> {
    /// Creates a packer writing to `writer` at the given level (1-9).
    ///
    /// `None` uses the deflate default.
    pub fn new(writer: W, compression_level: Option<u8>) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(compression_level.map(i64::from));
        Self {
            zip: ZipWriter::new(writer),
            options,
        }
    }

    /// Appends one regular file and returns the number of content bytes
    /// written.
    ///
    /// At most the size seen at open time is copied.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackError::InvalidPath`] if the entry name is not
    /// valid UTF-8, or an I/O error.
    pub fn append(&mut self, entry: &ArchiveEntry) -> Result<u64> {
        let name = entry.utf8_name()?;
        let file = File::open(&entry.path)?;
        let size = file.metadata()?.len();

        let options = self
            .options
            .unix_permissions(entry.mode)
            .large_file(size >= ZIP64_THRESHOLD);

        self.zip
            .start_file(name, options)
            .map_err(|e| std::io::Error::other(format!("failed to start file in ZIP: {e}")))?;

        let written = std::io::copy(&mut file.take(size), &mut self.zip)?;
        Ok(written)
    }

    /// Writes the central directory and returns the inner writer.
    pub fn finish(self) -> Result<W> {
        let mut writer = self
            .zip
            .finish()
            .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;
        writer.flush()?;
        Ok(writer)
    }
}
