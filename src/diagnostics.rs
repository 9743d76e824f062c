//! Pretty diagnostic reporting using [ariadne].
//!
//! Renders a [`ParseError`] with the offending source line, an underline,
//! and a label. Only compiled with the `diagnostics` feature:
//!
//! ```toml
//! [dependencies]
//! citeswap = { version = "0.1", features = ["diagnostics"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use citeswap::{CitationFormat, parse_with_diagnostics};
//!
//! let source = "@article{key,\n  title {Missing equals}\n}";
//! let report = parse_with_diagnostics(&CitationFormat::BibTex, source, "refs.bib").unwrap_err();
//! assert!(report.contains("refs.bib"));
//! ```

use crate::error::ParseError;
use crate::{CitationParser, Reference};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;

impl ParseError {
    /// Render this error as an Ariadne report over `source`.
    ///
    /// The returned string contains ANSI colour codes.
    pub fn to_diagnostic(&self, filename: &str, source: &str) -> String {
        let range = self.primary_byte_range(source);
        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(self.error.to_string())
                    .with_color(Color::Red),
            )
            .finish();

        let mut buf = Vec::new();
        match report.write((filename, Source::from(source)), &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    /// Span if present, else the whole reported line, else the start of input.
    fn primary_byte_range(&self, source: &str) -> Range<usize> {
        if let Some(span) = self.span {
            return span.start.min(source.len())..span.end.min(source.len());
        }
        if let Some(line) = self.line {
            let index = line.saturating_sub(1);
            let start: usize = source.split('\n').take(index).map(|l| l.len() + 1).sum();
            let len = source.split('\n').nth(index).map_or(0, str::len);
            let start = start.min(source.len());
            return start..(start + len).min(source.len());
        }
        0..0
    }
}

/// Parse `input` with `parser`, rendering any failure as an Ariadne report.
///
/// # Errors
///
/// Returns the rendered diagnostic when parsing fails.
pub fn parse_with_diagnostics(
    parser: &dyn CitationParser,
    input: &str,
    filename: &str,
) -> Result<Reference, String> {
    parser
        .parse(input)
        .map_err(|e| e.to_diagnostic(filename, input))
}
