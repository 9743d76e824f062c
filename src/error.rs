//! Error types for citation parsing and conversion.
//!
//! Parse failures carry the grammar that rejected the input and, for the
//! line-oriented BibTeX codec, the line/column and byte span of the offending
//! character. Conversion failures wrap the underlying error together with
//! the stage and style that failed.

use crate::CitationFormat;
use crate::style::SUPPORTED_STYLES;
use thiserror::Error;

/// A byte-offset span into the original source text.
///
/// Both `start` and `end` are byte offsets (not character indices) from the
/// beginning of the source string.  `start` is inclusive, `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SourceSpan {
    /// Create a new `SourceSpan`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Field name constants for consistent error reporting.
pub mod fields {
    pub const ENTRY_TYPE: &str = "entry_type";
    pub const CITE_KEY: &str = "cite_key";
}

/// Which half of a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Parse,
    Format,
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConversionStage::Parse => "parse",
            ConversionStage::Format => "format",
        })
    }
}

/// Top-level error type for citation operations.
#[derive(Error, Debug)]
pub enum CitationError {
    #[error("Unsupported style '{style}'. Supported styles: {}", SUPPORTED_STYLES.join(", "))]
    UnsupportedStyle { style: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to {stage} citation as {style} style: {source}")]
    Conversion {
        stage: ConversionStage,
        style: String,
        source: Box<CitationError>,
    },
}

/// Parse error with detailed location and context information.
#[derive(Error, Debug)]
#[error("Error in {format} format{}: {error}",
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        (None, Some(c)) => format!(" at column {}", c),
        (None, None) => String::new(),
    }
)]
pub struct ParseError {
    /// Line number where the error occurred (1-based, None if not available)
    pub line: Option<usize>,
    /// Column number where the error occurred (1-based, None if not available)
    pub column: Option<usize>,
    /// Byte-offset span into the source text, for rich diagnostic rendering.
    pub span: Option<SourceSpan>,
    /// The grammar that rejected the input
    pub format: CitationFormat,
    /// The specific error that occurred
    pub error: ValueError,
}

impl ParseError {
    /// Create a new ParseError.
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        format: CitationFormat,
        error: ValueError,
    ) -> Self {
        Self {
            line,
            column,
            span: None,
            format,
            error,
        }
    }

    /// Attach a byte-offset span to this error, returning `self` (builder style).
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Create a ParseError with just line information.
    pub fn at_line(line: usize, format: CitationFormat, error: ValueError) -> Self {
        Self::new(Some(line), None, format, error)
    }

    /// Create a ParseError with line and column information.
    pub fn at_position(
        line: usize,
        column: usize,
        format: CitationFormat,
        error: ValueError,
    ) -> Self {
        Self::new(Some(line), Some(column), format, error)
    }

    /// Create a ParseError pointing at a byte offset of `source`.
    ///
    /// Line and column are derived from the offset (both 1-based, column
    /// counted in characters) and the span covers the character at `offset`.
    pub fn at_offset(
        source: &str,
        offset: usize,
        format: CitationFormat,
        error: ValueError,
    ) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count() + 1;
        let end = source[offset..]
            .chars()
            .next()
            .map_or(offset, |c| offset + c.len_utf8());
        Self::at_position(line, column, format, error).with_span(SourceSpan::new(offset, end))
    }

    /// Create a ParseError without position information.
    pub fn without_position(format: CitationFormat, error: ValueError) -> Self {
        Self::new(None, None, format, error)
    }

    /// Shorthand for a citation whose structural anchor could not be found.
    pub(crate) fn missing_anchor(format: CitationFormat, anchor: &'static str) -> Self {
        Self::without_position(format, ValueError::MissingAnchor { anchor })
    }
}

/// Specific value-level errors that can occur during parsing.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("Empty input")]
    Empty,

    #[error("Bad syntax: {0}")]
    Syntax(String),

    #[error("Expected {anchor}")]
    MissingAnchor { anchor: &'static str },

    #[error("Missing value for {key}")]
    MissingValue {
        field: &'static str,
        key: &'static str,
    },

    #[error("Unterminated {delimiter}-delimited value for '{key}'")]
    Unterminated { delimiter: char, key: String },
}
