//! Output formatter trait for CLI results.

use anyhow::Result;
use imagepack_core::PackageOutput;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a packaging run
    fn format_package_result(&self, output: &PackageOutput) -> Result<()>;

    /// Format a failed packaging run
    fn format_error(&self, code: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<ErrorCode> {
    pub fn error(
        operation: impl Into<String>,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(ErrorCode { code: code.into() }),
            error: Some(error.into()),
        }
    }
}

/// Machine-readable error kind attached to JSON error output.
#[derive(Debug, Serialize)]
pub struct ErrorCode {
    pub code: String,
}
