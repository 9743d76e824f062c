//! Regex backend selection.
//!
//! The full `regex` engine is used by default; building with
//! `default-features = false, features = ["lite"]` swaps in `regex-lite`,
//! which exposes the same subset of the API this crate relies on.

#[cfg(feature = "regex")]
pub(crate) use regex::{Captures, Regex};

#[cfg(all(feature = "lite", not(feature = "regex")))]
pub(crate) use regex_lite::{Captures, Regex};

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("either the `regex` or the `lite` feature must be enabled");
