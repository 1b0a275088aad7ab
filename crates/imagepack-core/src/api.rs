//! High-level public API for packaging an image directory.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ProgressCallback;
use crate::Result;
use crate::creation::PackConfig;
use crate::creation::PackReport;
use crate::creation::PackageOutput;
use crate::creation::permissions;
use crate::creation::ArchiveEntry;
use crate::creation::progress::NoopProgress;
use crate::creation::walker::collect_entries;
use crate::creation::writer::ArchiveWriter;
use crate::digest;
use crate::formats::detect::ArchiveFormat;
use crate::formats::detect::detect_format;

/// Creates an archive of every regular file under `source_dir`.
///
/// The format is taken from `config.format` or detected from the archive
/// file name. Entries are named `config.prefix() + relative path`.
///
/// # Errors
///
/// Returns an error if:
/// - The archive kind is unsupported (nothing on disk is touched)
/// - The configuration is invalid
/// - `source_dir` is missing or not a directory
/// - Any I/O operation fails
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::create_archive;
/// use imagepack_core::creation::PackConfig;
///
/// let config = PackConfig::default().with_prefix("jdk-9");
/// let report = create_archive("build/image", "jdk-9.tar.gz", &config)?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    archive_path: Q,
    config: &PackConfig,
) -> Result<PackReport> {
    create_archive_with_progress(source_dir, archive_path, config, &mut NoopProgress)
}

/// Creates an archive, reporting each entry to `progress`.
///
/// Steps run strictly in order: format selection, configuration check,
/// directory walk, permission normalization, archive write, finalization.
/// The output file is only created after the walk, and a previous archive
/// at the output path is dropped from the walked entries, so an archive
/// written inside `source_dir` never contains itself.
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    archive_path: Q,
    config: &PackConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<PackReport> {
    let source_dir = source_dir.as_ref();
    let output = archive_path.as_ref();

    let format = determine_format(output, config)?;
    config.validate()?;

    let start = Instant::now();
    let mut report = PackReport {
        format: Some(format),
        ..PackReport::default()
    };

    let collected = collect_entries(source_dir, config.prefix())?;
    for path in &collected.skipped {
        tracing::debug!(path = %path.display(), "skipping non-regular entry");
        progress.on_entry_skipped(path);
        report.files_skipped += 1;
        report.add_warning(format!("skipped non-regular file: {}", path.display()));
    }

    let mut files = collected.files;
    if let Some(previous) = take_output_entry(&mut files, output) {
        tracing::debug!(path = %previous.display(), "skipping output archive");
        progress.on_entry_skipped(&previous);
        report.files_skipped += 1;
        report.add_warning(format!(
            "skipped output archive inside source: {}",
            previous.display()
        ));
    }

    if config.normalize_permissions {
        report.permissions_normalized = permissions::normalize_entries(&mut files)?;
    }

    let mut writer = ArchiveWriter::create(output, format, config.compression_level)?;
    let total = files.len();
    for (idx, entry) in files.iter().enumerate() {
        progress.on_entry_start(entry, total, idx + 1);
        let bytes = writer.append(entry)?;
        tracing::debug!(
            name = %entry.archive_name.display(),
            bytes,
            mode = format_args!("{:#o}", entry.mode),
            "added entry"
        );
        report.files_added += 1;
        report.bytes_written += bytes;
        progress.on_entry_complete(entry);
    }
    writer.finish()?;

    report.bytes_compressed = fs::metadata(output)?.len();
    report.duration = start.elapsed();

    tracing::info!(
        archive = %output.display(),
        %format,
        files = report.files_added,
        skipped = report.files_skipped,
        bytes = report.bytes_compressed,
        "created archive"
    );
    progress.on_complete(&report);

    Ok(report)
}

/// Packages an image: archive, `.sha1` sidecar, then output permissions.
///
/// The digest is computed only after the archive has been finalized. When
/// `config.output_mode` is set, both output files receive that mode last.
///
/// # Errors
///
/// Returns the first error from archive creation, digest writing or the
/// final permission change. Partially written outputs are left in place.
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::creation::PackConfig;
/// use imagepack_core::creation::progress::NoopProgress;
/// use imagepack_core::package;
///
/// let config = PackConfig::default().with_prefix("jdk-9");
/// let output = package("build/image", "jdk-9.zip", &config, &mut NoopProgress)?;
/// println!("{}", output.archive_path.display());
/// println!("{}", output.digest_path.display());
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
pub fn package<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    archive_path: Q,
    config: &PackConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<PackageOutput> {
    let archive_path = archive_path.as_ref();

    let report = create_archive_with_progress(source_dir, archive_path, config, progress)?;

    let digest_path = digest::digest_path_for(archive_path);
    let digest = digest::write_digest(archive_path, &digest_path)?;

    if let Some(mode) = config.output_mode {
        permissions::apply_mode(archive_path, mode)?;
        permissions::apply_mode(&digest_path, mode)?;
    }

    Ok(PackageOutput {
        archive_path: archive_path.to_path_buf(),
        digest_path,
        digest,
        report,
    })
}

/// Removes the entry that is the same file as `output`, if any.
///
/// Only an already existing output can match.
fn take_output_entry(files: &mut Vec<ArchiveEntry>, output: &Path) -> Option<PathBuf> {
    let target = file_identity(output)?;
    let idx = files
        .iter()
        .position(|entry| file_identity(&entry.path).as_ref() == Some(&target))?;
    Some(files.remove(idx).path)
}

#[cfg(unix)]
fn file_identity(path: &Path) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    fs::metadata(path).ok().map(|m| (m.dev(), m.ino()))
}

#[cfg(not(unix))]
fn file_identity(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).ok()
}

/// Determines archive format from config or output path.
fn determine_format(output: &Path, config: &PackConfig) -> Result<ArchiveFormat> {
    if let Some(format) = config.format {
        return Ok(format);
    }
    detect_format(output)
}
