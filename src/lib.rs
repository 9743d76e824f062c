//! A library for formatting, parsing, and converting bibliographic citations.
//!
//! `citeswap` renders a normalized [`Reference`] into several citation styles
//! (APA 6th/7th, IEEE, MLA 9th, Chicago author-date, Vancouver/NLM), recovers a
//! [`Reference`] from citation text produced by those styles, and reads and
//! writes single BibTeX entries. The [`Reference`] is the hub of every
//! conversion: text is parsed into one, and one is formatted into text.
//!
//! # Features
//!
//! - `bibtex` - Enable the BibTeX codec (enabled by default)
//! - `regex` - Use the full `regex` engine (enabled by default)
//! - `lite` - Use `regex-lite` instead, for smaller binaries
//! - `diagnostics` - Render parse errors with source context via `ariadne`
//!
//! ```toml
//! [dependencies]
//! citeswap = { version = "0.1.0", default-features = false, features = ["lite"] }
//! ```
//!
//! # Basic Usage
//!
//! ```rust
//! use citeswap::{Reference, format_reference};
//!
//! let mut reference = Reference::new("article", "doe2020deep");
//! reference.authors = vec!["John Doe".into(), "Jane Smith".into()];
//! reference.title = Some("Deep Learning for Everything".into());
//! reference.journal = Some("Journal of Omniscience".into());
//! reference.year = Some("2020".into());
//! reference.volume = Some("42".into());
//! reference.issue = Some("7".into());
//! reference.pages = Some("1-10".into());
//! reference.doi = Some("10.1000/j.jo.2020.01.001".into());
//!
//! let apa = format_reference("apa", &reference)?;
//! assert_eq!(
//!     apa,
//!     "Doe, J., & Smith, J. (2020). Deep learning for everything. \
//!      Journal of Omniscience, 42(7), 1–10. https://doi.org/10.1000/j.jo.2020.01.001"
//! );
//! # Ok::<(), citeswap::CitationError>(())
//! ```
//!
//! # Converting Between Styles
//!
//! ```rust
//! use citeswap::convert_citation;
//!
//! let apa = "Doe, J., & Smith, J. (2020). Deep learning for everything. \
//!            Journal of Omniscience, 42(7), 1–10. https://doi.org/10.1000/j.jo.2020.01.001";
//! let ieee = convert_citation("apa", "ieee", apa)?;
//! assert!(ieee.starts_with("J. Doe and J. Smith, \"Deep learning for everything,\""));
//! # Ok::<(), citeswap::CitationError>(())
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns a [`Result`] wrapping [`CitationError`].
//! Parsers never guess: a citation missing one of its style's structural
//! anchors is rejected with a [`ParseError`] naming the anchor.
//!
//! ```rust
//! use citeswap::{CitationError, parse_citation};
//!
//! match parse_citation("ieee", "no quoted title here") {
//!     Ok(reference) => println!("Parsed {:?}", reference.title),
//!     Err(e) => eprintln!("Parse error: {}", e),
//! }
//! assert!(matches!(
//!     parse_citation("harvard", "anything"),
//!     Err(CitationError::UnsupportedStyle { .. })
//! ));
//! ```
//!
//! # Thread Safety
//!
//! All formatters, parsers, and the BibTeX codec are pure functions over
//! immutable input and may be called concurrently from any number of threads.

use serde::{Deserialize, Serialize};

pub mod apa;
#[cfg(feature = "bibtex")]
pub mod bibtex;
pub mod chicago;
mod convert;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod error;
pub mod ieee;
pub mod mla;
mod reference;
pub mod style;
pub mod vancouver;

// Reexports
#[cfg(feature = "bibtex")]
pub use bibtex::{parse_bibtex_entry, reference_to_bibtex};
#[cfg(feature = "bibtex")]
pub use convert::citation_to_bibtex;
pub use convert::{convert_citation, format_reference, parse_citation};
#[cfg(feature = "diagnostics")]
pub use diagnostics::parse_with_diagnostics;
pub use error::{CitationError, ConversionStage, ParseError, SourceSpan, ValueError};
pub use reference::Reference;
pub use style::Style;

mod regex;
mod utils;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Grammars a citation can be parsed from.
///
/// APA 6th and 7th share one grammar, so this is coarser than [`Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitationFormat {
    Apa,
    Ieee,
    Mla,
    Chicago,
    Vancouver,
    BibTex,
}

impl CitationFormat {
    /// Convert the format to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationFormat::Apa => "APA",
            CitationFormat::Ieee => "IEEE",
            CitationFormat::Mla => "MLA",
            CitationFormat::Chicago => "Chicago",
            CitationFormat::Vancouver => "Vancouver",
            CitationFormat::BibTex => "BibTeX",
        }
    }
}

impl std::fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for implementing citation parsers.
pub trait CitationParser {
    /// Parse a string containing a single citation.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is malformed
    fn parse(&self, input: &str) -> std::result::Result<Reference, ParseError>;
}

impl CitationParser for CitationFormat {
    fn parse(&self, input: &str) -> std::result::Result<Reference, ParseError> {
        match self {
            CitationFormat::Apa => apa::parse_apa(input),
            CitationFormat::Ieee => ieee::parse_ieee(input),
            CitationFormat::Mla => mla::parse_mla(input),
            CitationFormat::Chicago => chicago::parse_chicago(input),
            CitationFormat::Vancouver => vancouver::parse_vancouver(input),
            #[cfg(feature = "bibtex")]
            CitationFormat::BibTex => bibtex::parse_bibtex_entry(input),
            #[cfg(not(feature = "bibtex"))]
            CitationFormat::BibTex => Err(ParseError::without_position(
                CitationFormat::BibTex,
                ValueError::Syntax("BibTeX support is disabled".to_string()),
            )),
        }
    }
}
