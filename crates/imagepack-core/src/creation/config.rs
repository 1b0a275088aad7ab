//! Configuration for image packaging operations.

use crate::PackError;
use crate::Result;
use crate::formats::detect::ArchiveFormat;

/// Mode applied to the archive and digest files after they are written
/// (`rw-rw-r--`).
pub const DEFAULT_OUTPUT_MODE: u32 = 0o664;

/// Configuration for packaging an image directory.
///
/// # Examples
///
/// ```
/// use imagepack_core::creation::PackConfig;
///
/// let config = PackConfig::default()
///     .with_prefix("jdk-9")
///     .with_compression_level(9);
///
/// assert_eq!(config.prefix(), "jdk-9/");
/// ```
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Directory name every entry is placed under, always `/`-terminated
    /// unless empty.
    pub(crate) prefix: String,

    /// Compression level (1-9) for zip and gzip-tar output.
    ///
    /// `None` uses the format default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Add group-read and other-read to every archived file in the source
    /// tree before writing it.
    ///
    /// Default: `true`.
    pub normalize_permissions: bool,

    /// Mode set on the archive and digest files once both are written.
    ///
    /// Default: `Some(0o664)`.
    pub output_mode: Option<u32>,

    /// Archive format to create.
    ///
    /// `None` means detect from the output file name.
    ///
    /// Default: `None`.
    pub format: Option<ArchiveFormat>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            compression_level: Some(6),
            normalize_permissions: true,
            output_mode: Some(DEFAULT_OUTPUT_MODE),
            format: None,
        }
    }
}

impl PackConfig {
    /// Creates a new `PackConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry name prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the entry name prefix.
    ///
    /// A `/` is appended unless the prefix is empty or already ends with one.
    /// Backslashes are converted to `/`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = normalize_prefix(prefix.as_ref());
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the compression level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets whether source file permissions are normalized.
    #[must_use]
    pub fn with_normalize_permissions(mut self, normalize: bool) -> Self {
        self.normalize_permissions = normalize;
        self
    }

    /// Sets the mode applied to output files.
    #[must_use]
    pub fn with_output_mode(mut self, mode: Option<u32>) -> Self {
        self.output_mode = mode;
        self
    }

    /// Sets the archive format.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveFormat>) -> Self {
        self.format = format;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is set but not in range 1-9
    /// - Output mode has bits outside `0o7777`
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PackError::InvalidCompressionLevel { level });
        }
        if let Some(mode) = self.output_mode
            && mode & !0o7777 != 0
        {
            return Err(PackError::InvalidConfiguration {
                reason: format!("output mode {mode:#o} is not a permission mode"),
            });
        }
        Ok(())
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let mut normalized = prefix.replace('\\', "/");
    if !normalized.is_empty() && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}
