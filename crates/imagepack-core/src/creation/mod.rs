//! Archive creation module.
//!
//! Walks an image directory, normalizes permissions and writes the entries
//! into a zip, tar or gzip-tar archive.

pub mod permissions;
pub mod walker;

pub mod config;
pub mod creator;
pub mod progress;
pub mod report;
pub mod tar;
pub mod writer;
pub mod zip;

// Re-exports for public API
pub use config::PackConfig;
pub use creator::Packager;
pub use report::PackReport;
pub use report::PackageOutput;
pub use walker::ArchiveEntry;
pub use walker::ImageWalker;
