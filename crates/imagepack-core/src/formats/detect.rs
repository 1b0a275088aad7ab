//! Archive format detection.

use std::fmt;
use std::path::Path;

use crate::PackError;
use crate::Result;

/// Archive kinds an image can be packaged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Deflate-compressed ZIP archive.
    Zip,
    /// Uncompressed tar archive.
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveFormat {
    /// File-name suffixes recognized for this format.
    #[must_use]
    pub const fn suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Zip => &[".zip"],
            Self::Tar => &[".tar"],
            Self::TarGz => &[".tgz", ".tar.gz"],
        }
    }

    /// Returns `true` if entries are compressed.
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        !matches!(self, Self::Tar)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        };
        f.write_str(name)
    }
}

/// Detects the archive format from an output path.
///
/// Matching is done on the end of the whole path and is case-sensitive:
/// `.zip`, `.tar`, `.tgz` and `.tar.gz` are accepted, anything else
/// (including a bare `.gz`) is rejected. A trailing separator, as in
/// `out.zip/`, names a directory and is rejected.
///
/// # Errors
///
/// Returns [`PackError::UnsupportedFormat`] if no suffix matches, or
/// [`PackError::InvalidPath`] if the path is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use imagepack_core::formats::detect::ArchiveFormat;
/// use imagepack_core::formats::detect::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("jdk.tar.gz"))?, ArchiveFormat::TarGz);
/// assert!(detect_format(Path::new("jdk.rar")).is_err());
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let name = path.to_str().ok_or_else(|| PackError::InvalidPath {
        path: path.to_path_buf(),
    })?;

    [ArchiveFormat::Zip, ArchiveFormat::Tar, ArchiveFormat::TarGz]
        .into_iter()
        .find(|format| format.suffixes().iter().any(|s| name.ends_with(s)))
        .ok_or_else(|| PackError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
}
