//! Colored diagnostic output on stderr.

use crate::checker::Report;
use colored::Colorize;
use std::io::{self, Write};

/// Diagnostic stream; silent unless verbose.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    verbose: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Write legacy-name warnings.
    pub fn write_warnings(&self, out: &mut impl Write, warnings: &[String]) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }

        for warning in warnings {
            writeln!(out, "{} {}", "[!]".yellow(), warning.yellow())?;
        }
        Ok(())
    }

    /// Write every rejection reason.
    pub fn write_rejections(&self, out: &mut impl Write, report: &Report) -> io::Result<()> {
        if !self.verbose || report.is_publishable() {
            return Ok(());
        }

        writeln!(out, "{}", report.message().red())
    }

    /// Write everything the report has to say.
    pub fn write_report(&self, out: &mut impl Write, report: &Report) -> io::Result<()> {
        self.write_warnings(out, &report.warnings)?;
        self.write_rejections(out, report)
    }

    /// Print the report to stderr.
    pub fn print_report(&self, report: &Report) {
        let _ = self.write_report(&mut io::stderr().lock(), report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rejection;

    fn render(console: ConsoleOutput, report: &Report) -> String {
        let mut out = Vec::new();
        console.write_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn legacy_report() -> Report {
        Report {
            rejections: Vec::new(),
            warnings: vec!["name can no longer contain capital letters".to_string()],
        }
    }

    #[test]
    fn test_verbose_prints_warnings() {
        let output = render(ConsoleOutput::new(true), &legacy_report());
        assert!(output.contains("[!]"));
        assert!(output.contains("name can no longer contain capital letters"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_warnings_and_rejections_on_separate_lines() {
        let mut report = legacy_report();
        report.rejections.push(Rejection::PrivatePackage);

        let output = render(ConsoleOutput::new(true), &report);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[!]") && lines[0].contains("capital letters"));
        assert!(!lines[1].contains("[!]") && lines[1].contains("This package is private."));
    }

    #[test]
    fn test_quiet_prints_nothing() {
        let mut report = legacy_report();
        report.rejections.push(Rejection::PrivatePackage);

        assert!(render(ConsoleOutput::new(false), &report).is_empty());
        assert!(render(ConsoleOutput::default(), &report).is_empty());
    }
}
