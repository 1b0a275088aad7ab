//! Permission normalization for image files.
//!
//! Packaging makes every archived file readable by group and others. This is
//! applied to the source tree itself, in place, and is not undone: the
//! previous modes are not recorded anywhere.

use crate::Result;
use crate::creation::walker::ArchiveEntry;
use std::path::Path;

/// Bits added to every archived file (group-read, other-read).
pub const READ_BITS: u32 = 0o044;

/// Returns `mode` with group-read and other-read added.
///
/// # Examples
///
/// ```
/// use imagepack_core::creation::permissions::normalized_mode;
///
/// assert_eq!(normalized_mode(0o600), 0o644);
/// assert_eq!(normalized_mode(0o700), 0o744);
/// assert_eq!(normalized_mode(0o644), 0o644);
/// ```
#[must_use]
pub const fn normalized_mode(mode: u32) -> u32 {
    mode | READ_BITS
}

/// Normalizes the permissions of every entry on disk.
///
/// Each entry's recorded `mode` is updated to the normalized value so that
/// archive headers carry the same bits as the filesystem. Returns the number
/// of files whose mode actually changed.
///
/// # Errors
///
/// Returns an error if a permission change fails. Entries before the failing
/// one keep their new mode.
pub fn normalize_entries(entries: &mut [ArchiveEntry]) -> Result<usize> {
    let mut changed = 0;
    for entry in entries.iter_mut() {
        let mode = normalized_mode(entry.mode);
        if mode != entry.mode {
            apply_mode(&entry.path, mode)?;
            tracing::trace!(
                path = %entry.path.display(),
                from = format_args!("{:#o}", entry.mode),
                to = format_args!("{mode:#o}"),
                "normalized permissions"
            );
            entry.mode = mode;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Sets the permission bits of `path` to `mode`.
///
/// On platforms without Unix modes this is a no-op.
///
/// # Errors
///
/// Returns an error if the permission change fails.
#[cfg(unix)]
pub fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
