//! SHA-1 digests of archive files.
//!
//! The digest of an archive is written next to it as `<archive>.sha1`: the
//! 40-character lowercase hex digest and nothing else, not even a newline.

use crate::Result;
use sha1::Digest;
use sha1::Sha1;
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

/// Read size used when streaming a file through the hasher.
pub const CHUNK_SIZE: usize = 4096;

/// Extension appended to the archive path to name its digest file.
pub const DIGEST_EXTENSION: &str = "sha1";

/// Streams `reader` to the end and returns its lowercase hex SHA-1.
///
/// # Examples
///
/// ```
/// use imagepack_core::digest::sha1_reader;
///
/// let digest = sha1_reader("abc".as_bytes())?;
/// assert_eq!(digest, "a9993e364706816aba3e25717850c26c9cd0d89d");
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub fn sha1_reader<R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Returns the lowercase hex SHA-1 of the file at `path`.
pub fn sha1_file(path: &Path) -> Result<String> {
    sha1_reader(File::open(path)?)
}

/// Computes the SHA-1 of `source` and writes it to `dest`.
///
/// `dest` is created or truncated. Returns the digest that was written.
///
/// # Errors
///
/// Returns an error if `source` cannot be read or `dest` cannot be written.
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::digest::digest_path_for;
/// use imagepack_core::digest::write_digest;
/// use std::path::Path;
///
/// let archive = Path::new("jdk-9.tar.gz");
/// let digest = write_digest(archive, &digest_path_for(archive))?;
/// assert_eq!(digest.len(), 40);
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub fn write_digest(source: &Path, dest: &Path) -> Result<String> {
    let digest = sha1_file(source)?;
    std::fs::write(dest, &digest)?;
    tracing::info!(
        source = %source.display(),
        dest = %dest.display(),
        %digest,
        "wrote digest"
    );
    Ok(digest)
}

/// Returns the sidecar digest path for an archive: the full archive file
/// name with `.sha1` appended.
///
/// # Examples
///
/// ```
/// use imagepack_core::digest::digest_path_for;
/// use std::path::Path;
///
/// assert_eq!(
///     digest_path_for(Path::new("out/jdk-9.tar.gz")),
///     Path::new("out/jdk-9.tar.gz.sha1")
/// );
/// ```
#[must_use]
pub fn digest_path_for(archive: &Path) -> PathBuf {
    let mut name = OsString::from(archive.as_os_str());
    name.push(".");
    name.push(DIGEST_EXTENSION);
    PathBuf::from(name)
}

/// Returns `true` if `s` looks like a SHA-1 hex digest.
#[must_use]
pub fn is_sha1_hex(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn test_known_vectors() {
        assert_eq!(sha1_reader(&b""[..]).unwrap(), EMPTY_SHA1);
        assert_eq!(
            sha1_reader(&b"abcd"[..]).unwrap(),
            "81fe8bfe87576c3ecb22426f8e57847382917acf"
        );
    }

    #[test]
    fn test_multi_chunk_input() {
        // Spans several chunks with a partial tail
        let data = vec![b'a'; CHUNK_SIZE * 3 + 17];
        let streamed = sha1_reader(data.as_slice()).unwrap();
        let whole = hex::encode(Sha1::digest(&data));
        assert_eq!(streamed, whole);
    }

    #[test]
    fn test_write_digest_no_newline() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("out.tar");
        let dest = temp.path().join("out.tar.sha1");
        fs::write(&source, "abcd").unwrap();

        let digest = write_digest(&source, &dest).unwrap();

        let written = fs::read_to_string(&dest).unwrap();
        assert_eq!(written, digest);
        assert_eq!(written.len(), 40);
        assert!(is_sha1_hex(&written));
    }

    #[test]
    fn test_write_digest_truncates() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("empty");
        let dest = temp.path().join("empty.sha1");
        fs::write(&source, "").unwrap();
        fs::write(&dest, "x".repeat(100)).unwrap();

        write_digest(&source, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), EMPTY_SHA1);
    }

    #[test]
    fn test_write_digest_missing_source() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("x.sha1");
        let result = write_digest(&temp.path().join("missing"), &dest);
        assert!(result.unwrap_err().is_io());
        assert!(!dest.exists());
    }

    #[test]
    fn test_digest_path_for() {
        assert_eq!(
            digest_path_for(Path::new("image.zip")),
            PathBuf::from("image.zip.sha1")
        );
        assert_eq!(
            digest_path_for(Path::new("/tmp/a.b/image")),
            PathBuf::from("/tmp/a.b/image.sha1")
        );
    }

    #[test]
    fn test_is_sha1_hex() {
        assert!(is_sha1_hex(EMPTY_SHA1));
        assert!(!is_sha1_hex(&EMPTY_SHA1.to_uppercase()));
        assert!(!is_sha1_hex("abc"));
        assert!(!is_sha1_hex(&format!("{EMPTY_SHA1}\n")));
    }
}
