//! Format dispatch for archive output files.

use crate::Result;
use crate::creation::tar::TarPacker;
use crate::creation::tar::gzip_encoder;
use crate::creation::walker::ArchiveEntry;
use crate::creation::zip::ZipPacker;
use crate::formats::detect::ArchiveFormat;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

/// An open archive output file, one variant per supported format.
///
/// The output file is created by [`ArchiveWriter::create`] and finalized
/// exactly once by [`ArchiveWriter::finish`]. Dropping a writer without
/// finishing leaves a truncated archive on disk.
pub enum ArchiveWriter {
    /// Deflate ZIP.
    Zip(ZipPacker<BufWriter<File>>),
    /// Uncompressed tar.
    Tar(TarPacker<BufWriter<File>>),
    /// Gzip-compressed tar.
    TarGz(TarPacker<GzEncoder<BufWriter<File>>>),
}

impl ArchiveWriter {
    /// Creates (or truncates) `path` and prepares a writer for `format`.
    pub fn create(
        path: &Path,
        format: ArchiveFormat,
        compression_level: Option<u8>,
    ) -> Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match format {
            ArchiveFormat::Zip => Self::Zip(ZipPacker::new(file, compression_level)),
            ArchiveFormat::Tar => Self::Tar(TarPacker::new(file)),
            ArchiveFormat::TarGz => {
                Self::TarGz(TarPacker::new(gzip_encoder(file, compression_level)))
            }
        })
    }

    /// Returns the format being written.
    #[must_use]
    pub const fn format(&self) -> ArchiveFormat {
        match self {
            Self::Zip(_) => ArchiveFormat::Zip,
            Self::Tar(_) => ArchiveFormat::Tar,
            Self::TarGz(_) => ArchiveFormat::TarGz,
        }
    }

    /// Appends one entry, returning the content bytes written.
    pub fn append(&mut self, entry: &ArchiveEntry) -> Result<u64> {
        match self {
            Self::Zip(packer) => packer.append(entry),
            Self::Tar(packer) => packer.append(entry),
            Self::TarGz(packer) => packer.append(entry),
        }
    }

    /// Writes format trailers and flushes everything to the file.
    pub fn finish(self) -> Result<()> {
        let file = match self {
            Self::Zip(packer) => packer.finish()?,
            Self::Tar(packer) => packer.finish()?,
            Self::TarGz(packer) => packer.finish()?.finish()?,
        };
        let mut file = file.into_inner().map_err(std::io::IntoInnerError::into_error)?;
        file.flush()?;
        Ok(())
    }
}
