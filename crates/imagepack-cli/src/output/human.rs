//! Human-readable output formatter.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use imagepack_core::PackageOutput;

pub struct HumanFormatter {
    use_colors: bool,
    out: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled_stderr(),
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    /// Lines printed on success: the archive path, then the digest path.
    fn result_lines(output: &PackageOutput) -> [String; 2] {
        [
            output.archive_path.display().to_string(),
            output.digest_path.display().to_string(),
        ]
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_package_result(&self, output: &PackageOutput) -> Result<()> {
        for line in Self::result_lines(output) {
            self.out.write_line(&line)?;
        }
        Ok(())
    }

    fn format_error(&self, _code: &str, _error: &anyhow::Error) {
        // anyhow prints the error chain when main returns
    }

    fn format_warning(&self, message: &str) {
        let line = if self.use_colors {
            format!("{} {message}", style("warning:").yellow().bold())
        } else {
            format!("warning: {message}")
        };
        let _ = self.err.write_line(&line);
    }
}
