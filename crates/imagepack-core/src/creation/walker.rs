//! Image directory walking.
//!
//! Walks a source directory and yields every regular file as an
//! [`ArchiveEntry`] with its archive name already computed. Directories are
//! recursed into but never emitted; symlinks are not followed and, like
//! sockets, fifos and device nodes, are reported as skipped.

use crate::PackError;
use crate::Result;
use std::ffi::OsString;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One regular file destined for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full filesystem path of the file.
    pub path: PathBuf,

    /// Entry name inside the archive: `prefix + relative path`, always
    /// `/`-separated. Not necessarily UTF-8.
    pub archive_name: PathBuf,

    /// Size in bytes at walk time.
    pub size: u64,

    /// Permission bits (`0o7777` mask) recorded for the entry.
    pub mode: u32,
}

/// Result of visiting one walk item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkedEntry {
    /// A regular file to archive.
    File(ArchiveEntry),

    /// A non-regular, non-directory entry that will not be archived.
    Skipped {
        /// Path of the skipped entry.
        path: PathBuf,
    },
}

/// Walks an image directory, yielding regular files in file-name order.
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::creation::walker::ImageWalker;
/// use imagepack_core::creation::walker::WalkedEntry;
/// use std::path::Path;
///
/// let walker = ImageWalker::new(Path::new("build/image"), "jdk-9/");
/// for entry in walker.walk() {
///     if let WalkedEntry::File(file) = entry? {
///         println!("{} -> {}", file.path.display(), file.archive_name.display());
///     }
/// }
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub struct ImageWalker<'a> {
    root: &'a Path,
    prefix: &'a str,
}

impl<'a> ImageWalker<'a> {
    /// Creates a walker rooted at `root`, naming entries under `prefix`.
    #[must_use]
    pub fn new(root: &'a Path, prefix: &'a str) -> Self {
        Self { root, prefix }
    }

    /// Returns an iterator over walked entries.
    ///
    /// Directories (including the root) are not yielded.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkedEntry>> + '_ {
        WalkDir::new(self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.visit(&entry).transpose(),
                Err(e) => Some(Err(PackError::Io(std::io::Error::other(format!(
                    "walkdir error: {e}"
                ))))),
            })
    }

    fn visit(&self, entry: &walkdir::DirEntry) -> Result<Option<WalkedEntry>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Ok(None);
        }

        let path = entry.path().to_path_buf();
        if !file_type.is_file() {
            return Ok(Some(WalkedEntry::Skipped { path }));
        }

        let metadata = entry.metadata().map_err(|e| {
            PackError::Io(std::io::Error::other(format!(
                "cannot read metadata for {}: {e}",
                path.display()
            )))
        })?;

        let mut archive_name = OsString::from(self.prefix);
        archive_name.push(relative_name(&path, self.root)?);

        Ok(Some(WalkedEntry::File(ArchiveEntry {
            size: metadata.len(),
            mode: permission_bits(&metadata),
            archive_name: PathBuf::from(archive_name),
            path,
        })))
    }
}

/// All entries found under one image directory.
#[derive(Debug, Clone, Default)]
pub struct CollectedEntries {
    /// Regular files, in walk order.
    pub files: Vec<ArchiveEntry>,

    /// Paths that were seen but not archived.
    pub skipped: Vec<PathBuf>,
}

/// Walks `root` to completion and collects its entries.
///
/// # Errors
///
/// Returns an error if:
/// - `root` does not exist or is not a directory
/// - Directory traversal fails
/// - A relative path is not valid UTF-8
pub fn collect_entries(root: &Path, prefix: &str) -> Result<CollectedEntries> {
    let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PackError::SourceNotFound {
            path: root.to_path_buf(),
        },
        _ => PackError::Io(e),
    })?;
    if !metadata.is_dir() {
        return Err(PackError::SourceNotDirectory {
            path: root.to_path_buf(),
        });
    }

    let mut collected = CollectedEntries::default();
    for entry in ImageWalker::new(root, prefix).walk() {
        match entry? {
            WalkedEntry::File(file) => collected.files.push(file),
            WalkedEntry::Skipped { path } => collected.skipped.push(path),
        }
    }
    Ok(collected)
}

/// Computes the `/`-separated path of `path` relative to `root`.
///
/// Name bytes are kept as they are on disk; they need not be UTF-8.
///
/// # Errors
///
/// Returns an error if `path` is not under `root`.
pub fn relative_name(path: &Path, root: &Path) -> Result<OsString> {
    let invalid = || PackError::InvalidPath {
        path: path.to_path_buf(),
    };
    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut name = OsString::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                if !name.is_empty() {
                    name.push("/");
                }
                name.push(part);
            }
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }
    Ok(name)
}

impl ArchiveEntry {
    /// Returns the archive name as UTF-8, for formats that require it.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidPath`] if the name is not valid UTF-8.
    pub fn utf8_name(&self) -> Result<&str> {
        self.archive_name
            .to_str()
            .ok_or_else(|| PackError::InvalidPath {
                path: self.path.clone(),
            })
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(collected: &CollectedEntries) -> Vec<&str> {
        collected
            .files
            .iter()
            .map(|e| e.archive_name.to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_collect_regular_files_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "abcd").unwrap();
        fs::create_dir_all(temp.path().join("sub/empty")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), "").unwrap();

        let collected = collect_entries(temp.path(), "jdk-9/").unwrap();

        assert_eq!(names(&collected), vec!["jdk-9/a.txt", "jdk-9/sub/b.txt"]);
        assert_eq!(collected.files[0].size, 4);
        assert_eq!(collected.files[1].size, 0);
        assert!(collected.skipped.is_empty());
    }

    #[test]
    fn test_collect_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            fs::write(temp.path().join(name), name).unwrap();
        }

        let collected = collect_entries(temp.path(), "").unwrap();
        assert_eq!(names(&collected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hidden_files_included() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "x").unwrap();

        let collected = collect_entries(temp.path(), "p/").unwrap();
        assert_eq!(names(&collected), vec!["p/.hidden"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("target.txt"), "data").unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        std::os::unix::fs::symlink("target.txt", temp.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink("dir", temp.path().join("dirlink")).unwrap();

        let collected = collect_entries(temp.path(), "").unwrap();
        assert_eq!(names(&collected), vec!["target.txt"]);
        assert_eq!(collected.skipped.len(), 2);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = collect_entries(&temp.path().join("nope"), "");
        assert!(matches!(result, Err(PackError::SourceNotFound { .. })));
    }

    #[test]
    fn test_root_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let result = collect_entries(&file, "");
        assert!(matches!(result, Err(PackError::SourceNotDirectory { .. })));
    }

    #[test]
    fn test_root_lookup_failure_is_io() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        // A path through a regular file fails with something other than NotFound
        let result = collect_entries(&file.join("child"), "");
        assert!(matches!(result, Err(PackError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_collected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "abcd").unwrap();
        let latin1 = OsStr::from_bytes(b"lat\xe9n.txt");
        fs::write(temp.path().join(latin1), "x").unwrap();

        let collected = collect_entries(temp.path(), "jdk-9/").unwrap();

        assert_eq!(collected.files.len(), 2);
        assert_eq!(collected.files[0].archive_name, Path::new("jdk-9/a.txt"));
        assert_eq!(
            collected.files[1].archive_name.as_os_str().as_bytes(),
            b"jdk-9/lat\xe9n.txt"
        );
        assert!(collected.files[1].utf8_name().is_err());
        assert_eq!(collected.files[0].utf8_name().unwrap(), "jdk-9/a.txt");
    }

    #[test]
    fn test_relative_name() {
        let root = Path::new("/image");
        assert_eq!(
            relative_name(Path::new("/image/lib/server/libjvm.so"), root).unwrap(),
            "lib/server/libjvm.so"
        );
        assert!(relative_name(Path::new("/elsewhere/file"), root).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_recorded() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bin");
        fs::write(&file, "#!/bin/sh").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o750)).unwrap();

        let collected = collect_entries(temp.path(), "").unwrap();
        assert_eq!(collected.files[0].mode, 0o750);
    }
}
