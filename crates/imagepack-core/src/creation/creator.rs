//! Builder for packaging an image with a fluent API.

use std::path::Path;
use std::path::PathBuf;

use crate::PackError;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::config::PackConfig;
use crate::creation::progress::NoopProgress;
use crate::creation::report::PackageOutput;
use crate::formats::detect::ArchiveFormat;

/// Builder for packaging an image directory.
///
/// # Examples
///
/// ```no_run
/// use imagepack_core::creation::Packager;
///
/// let output = Packager::new()
///     .image("build/linux-x86_64/images/jdk")
///     .output("jdk-9.tar.gz")
///     .prefix("jdk-9")
///     .compression_level(9)
///     .package()?;
///
/// println!("{}", output.digest);
/// # Ok::<(), imagepack_core::PackError>(())
/// ```
#[derive(Debug, Default)]
pub struct Packager {
    image: Option<PathBuf>,
    output_path: Option<PathBuf>,
    config: PackConfig,
}

impl Packager {
    /// Creates a new `Packager` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the image directory to package.
    #[must_use]
    pub fn image<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.image = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output archive path.
    ///
    /// The archive format is detected from the file name unless explicitly
    /// set via `format()`.
    #[must_use]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory name entries are placed under.
    #[must_use]
    pub fn prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.config = self.config.with_prefix(prefix);
        self
    }

    /// Sets the full configuration, replacing any earlier settings.
    #[must_use]
    pub fn config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the compression level (1-9).
    ///
    /// Out-of-range values are reported by `package()`.
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Sets whether source permissions are normalized.
    ///
    /// Default: `true`.
    #[must_use]
    pub fn normalize_permissions(mut self, normalize: bool) -> Self {
        self.config.normalize_permissions = normalize;
        self
    }

    /// Sets the mode applied to the archive and digest files.
    ///
    /// Default: `Some(0o664)`. `None` leaves the mode from file creation.
    #[must_use]
    pub fn output_mode(mut self, mode: Option<u32>) -> Self {
        self.config.output_mode = mode;
        self
    }

    /// Sets an explicit archive format.
    #[must_use]
    pub fn format(mut self, format: ArchiveFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    /// Packages the image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image or output path is not set, or if
    /// [`crate::package`] fails.
    pub fn package(self) -> Result<PackageOutput> {
        self.package_with_progress(&mut NoopProgress)
    }

    /// Packages the image, reporting entries to `progress`.
    pub fn package_with_progress(
        self,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PackageOutput> {
        let image = self.image.ok_or_else(|| PackError::InvalidConfiguration {
            reason: "image directory not set".to_string(),
        })?;
        let output_path = self
            .output_path
            .ok_or_else(|| PackError::InvalidConfiguration {
                reason: "output path not set".to_string(),
            })?;

        crate::api::package(&image, &output_path, &self.config, progress)
    }
}
