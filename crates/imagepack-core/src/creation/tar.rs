//! TAR archive writing, plain or gzip-compressed.

use crate::Result;
use crate::creation::walker::ArchiveEntry;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use tar::Builder;
use tar::Header;

/// Writes image entries into a tar stream.
///
/// The underlying writer can be a plain file or a compressor; call
/// [`TarPacker::finish`] to write the end-of-archive marker and get the
/// writer back.
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::creation::tar::TarPacker;
/// use imagepack_core::creation::walker::collect_entries;
/// use std::fs::File;
/// use std::path::Path;
///
/// let entries = collect_entries(Path::new("build/image"), "jdk-9/")?;
/// let mut packer = TarPacker::new(File::create("jdk-9.tar")?);
/// for entry in &entries.files {
///     packer.append(entry)?;
/// }
/// packer.finish()?;
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub struct TarPacker<W: Write> {
    builder: Builder<W>,
}

impl<W: Write> TarPacker<W> {
    /// Creates a packer writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            builder: Builder::new(writer),
        }
    }

    /// Appends one regular file and returns the number of content bytes
    /// written.
    ///
    /// The header carries `entry.mode` rather than the mode currently on
    /// disk. Exactly the size seen at open time is copied, even if the file
    /// keeps growing.
    pub fn append(&mut self, entry: &ArchiveEntry) -> Result<u64> {
        let file = File::open(&entry.path)?;
        let metadata = file.metadata()?;
        let size = metadata.len();

        let mut header = Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(size);
        header.set_mode(entry.mode);
        set_ownership(&mut header, &metadata);

        self.builder
            .append_data(&mut header, &entry.archive_name, file.take(size))?;

        Ok(size)
    }

    /// Writes the end-of-archive marker and returns the inner writer.
    pub fn finish(self) -> Result<W> {
        let mut writer = self.builder.into_inner()?;
        writer.flush()?;
        Ok(writer)
    }
}

/// Wraps `writer` in a gzip encoder at the given level (1-9).
pub fn gzip_encoder<W: Write>(writer: W, level: Option<u8>) -> GzEncoder<W> {
    GzEncoder::new(writer, compression_level_to_flate2(level))
}

/// Sets ownership and modification time in the header from metadata.
#[cfg(unix)]
fn set_ownership(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_ownership(header: &mut Header, metadata: &std::fs::Metadata) {
    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

/// Converts compression level (1-9) to flate2 compression level.
fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None => flate2::Compression::default(),
        Some(n) => flate2::Compression::new(u32::from(n.clamp(1, 9))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::BufWriter;
    use std::path::Path;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entry(path: &Path, name: &str, mode: u32) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_path_buf(),
            archive_name: PathBuf::from(name),
            size: fs::metadata(path).unwrap().len(),
            mode,
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "abcd").unwrap();

        let mut packer = TarPacker::new(Vec::new());
        let written = packer.append(&entry(&source, "jdk-9/a.txt", 0o644)).unwrap();
        let bytes = packer.finish().unwrap();

        assert_eq!(written, 4);
        let mut archive = tar::Archive::new(bytes.as_slice());
        let mut entries = archive.entries().unwrap();
        let mut first = entries.next().unwrap().unwrap();
        assert_eq!(first.path().unwrap().to_str(), Some("jdk-9/a.txt"));
        assert_eq!(first.header().mode().unwrap(), 0o644);
        assert_eq!(first.header().entry_type(), tar::EntryType::Regular);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "abcd");
        drop(first);
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_header_uses_entry_mode() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("tool");
        fs::write(&source, "#!/bin/sh").unwrap();

        let mut packer = TarPacker::new(Vec::new());
        packer.append(&entry(&source, "bin/tool", 0o755)).unwrap();
        let bytes = packer.finish().unwrap();

        let mut archive = tar::Archive::new(bytes.as_slice());
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.header().mode().unwrap(), 0o755);
    }

    #[test]
    fn test_long_names_supported() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("f");
        fs::write(&source, "x").unwrap();
        let long_name = format!("jdk-9/{}/f", "d".repeat(150));

        let mut packer = TarPacker::new(Vec::new());
        packer.append(&entry(&source, &long_name, 0o644)).unwrap();
        let bytes = packer.finish().unwrap();

        let mut archive = tar::Archive::new(bytes.as_slice());
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.path().unwrap().to_str(), Some(long_name.as_str()));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_kept_as_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("f");
        fs::write(&source, "x").unwrap();
        let name = OsStr::from_bytes(b"jdk-9/lat\xe9n.txt");

        let mut packer = TarPacker::new(Vec::new());
        packer
            .append(&ArchiveEntry {
                path: source,
                archive_name: PathBuf::from(name),
                size: 1,
                mode: 0o644,
            })
            .unwrap();
        let bytes = packer.finish().unwrap();

        let mut archive = tar::Archive::new(bytes.as_slice());
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.path_bytes().as_ref(), b"jdk-9/lat\xe9n.txt");
    }

    #[test]
    fn test_copy_stops_at_open_size_while_file_grows() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("self.tar");
        fs::write(&source, "a".repeat(10_000)).unwrap();

        // The archive is appended to the very file being read
        let sink = fs::OpenOptions::new().append(true).open(&source).unwrap();
        let mut packer = TarPacker::new(BufWriter::with_capacity(16, sink));
        let written = packer.append(&entry(&source, "self.tar", 0o644)).unwrap();
        drop(packer.finish().unwrap());

        assert_eq!(written, 10_000);
        let data = fs::read(&source).unwrap();
        let mut archive = tar::Archive::new(&data[10_000..]);
        let mut first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.header().size().unwrap(), 10_000);
        let mut content = Vec::new();
        first.read_to_end(&mut content).unwrap();
        assert_eq!(content, vec![b'a'; 10_000]);
    }

    #[test]
    fn test_empty_archive_has_trailer() {
        let bytes = TarPacker::new(Vec::new()).finish().unwrap();
        assert_eq!(bytes.len(), 1024);
        assert!(bytes.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_gzip_encoder_round_trip() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("data");
        fs::write(&source, "a".repeat(10_000)).unwrap();

        let mut packer = TarPacker::new(gzip_encoder(Vec::new(), Some(9)));
        packer.append(&entry(&source, "data", 0o644)).unwrap();
        let compressed = packer.finish().unwrap().finish().unwrap();

        assert_eq!(&compressed[0..2], &[0x1f, 0x8b]);
        let mut archive = tar::Archive::new(GzDecoder::new(compressed.as_slice()));
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.header().size().unwrap(), 10_000);
    }

    #[test]
    fn test_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let mut packer = TarPacker::new(Vec::new());
        let missing = ArchiveEntry {
            path: temp.path().join("missing"),
            archive_name: PathBuf::from("missing"),
            size: 0,
            mode: 0o644,
        };
        assert!(packer.append(&missing).is_err());
    }

    #[test]
    fn test_compression_level_to_flate2() {
        assert_eq!(
            compression_level_to_flate2(None).level(),
            flate2::Compression::default().level()
        );
        assert_eq!(compression_level_to_flate2(Some(1)).level(), 1);
        assert_eq!(compression_level_to_flate2(Some(9)).level(), 9);
        assert_eq!(compression_level_to_flate2(Some(0)).level(), 1);
    }
}
