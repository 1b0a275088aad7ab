//! Archive format selection.

pub mod detect;

pub use detect::ArchiveFormat;
