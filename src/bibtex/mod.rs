//! BibTeX entry parsing and serialization.
//!
//! A single entry is read into a [`Reference`] and written back with a
//! canonical field order:
//!
//! ```
//! use citeswap::{parse_bibtex_entry, reference_to_bibtex};
//!
//! let entry = "@article{doe2020deep,
//!   author = {John Doe and Jane Smith},
//!   title = \"Deep Learning for Everything\",
//!   journal = {Journal of Omniscience},
//!   number = 7,
//! }";
//! let reference = parse_bibtex_entry(entry).unwrap();
//! assert_eq!(reference.authors, vec!["John Doe", "Jane Smith"]);
//! assert_eq!(reference.issue.as_deref(), Some("7"));
//! assert!(reference_to_bibtex(&reference).contains("  number = {7},"));
//! ```

mod parse;
mod structure;
mod write;

pub use write::reference_to_bibtex;

use crate::{ParseError, Reference};
use parse::bibtex_parse;

/// Parse a single BibTeX entry.
///
/// # Errors
///
/// Returns `ParseError` naming the broken structural rule, with the line
/// and column of the offending position.
pub fn parse_bibtex_entry(text: &str) -> Result<Reference, ParseError> {
    let raw = bibtex_parse(text)?;
    Ok(raw.into())
}
