//! Build image packaging.
//!
//! `imagepack-core` turns a built image directory into a single archive
//! (zip, tar or tar.gz) whose entries all live under one prefix directory,
//! and writes the archive's SHA-1 next to it as `<archive>.sha1`.
//!
//! Packaging widens the permissions of the source files in place so that
//! group and others can read them. The change is not rolled back.
//!
//! # Examples
//!
//! ```no_run
//! use imagepack_core::creation::PackConfig;
//! use imagepack_core::creation::progress::NoopProgress;
//! use imagepack_core::package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackConfig::default().with_prefix("jdk-9");
//! let output = package("build/image", "jdk-9.tar.gz", &config, &mut NoopProgress)?;
//! println!("{} ({})", output.archive_path.display(), output.digest);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod creation;
pub mod digest;
pub mod error;
pub mod formats;

// Re-export main API types
pub use api::create_archive;
pub use api::create_archive_with_progress;
pub use api::package;
pub use creation::PackConfig;
pub use creation::PackReport;
pub use creation::PackageOutput;
pub use creation::progress::ProgressCallback;
pub use digest::write_digest;
pub use error::PackError;
pub use error::Result;
pub use formats::ArchiveFormat;
