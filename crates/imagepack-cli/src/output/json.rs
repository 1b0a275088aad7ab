//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use imagepack_core::PackageOutput;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackageData {
    archive_path: String,
    digest_path: String,
    sha1: String,
    format: Option<String>,
    files_added: usize,
    files_skipped: usize,
    permissions_normalized: usize,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&PackageOutput> for PackageData {
    fn from(output: &PackageOutput) -> Self {
        let report = &output.report;
        Self {
            archive_path: output.archive_path.display().to_string(),
            digest_path: output.digest_path.display().to_string(),
            sha1: output.digest.clone(),
            format: report.format.map(|f| f.to_string()),
            files_added: report.files_added,
            files_skipped: report.files_skipped,
            permissions_normalized: report.permissions_normalized,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_package_result(&self, output: &PackageOutput) -> Result<()> {
        Self::output(&JsonOutput::success("package", PackageData::from(output)))
    }

    fn format_error(&self, code: &str, error: &anyhow::Error) {
        let output = JsonOutput::error("package", code, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, _message: &str) {
        // Warnings are carried in the result's `warnings` array
    }
}
