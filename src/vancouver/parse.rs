//! Vancouver citation parsing.

use crate::regex::Regex;
use crate::utils::{
    capture, generate_cite_key, locator_fields, non_empty, split_trailing_locator, strip_et_al,
    trimmed_input,
};
use crate::{CitationFormat, ParseError, Reference};
use itertools::Itertools;
use std::sync::LazyLock;

static TIMELINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<year>\d{4}[a-z]?|n\.d\.?)(?:;(?P<volume>[^:(]*)(?:\((?P<issue>[^)]+)\))?)?(?::(?P<pages>\S+))?$",
    )
    .unwrap()
});

static IMPRINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<publisher>.+); (?P<year>\d{4}[a-z]?)$").unwrap());

const FORMAT: CitationFormat = CitationFormat::Vancouver;

/// Parse a Vancouver citation.
///
/// The trailing DOI or URL is split off first so its dots do not count as
/// sentence breaks; the remainder is split on ". " into authors, title,
/// source and the timeline (`YYYY;vol(issue):pages`) or, for books,
/// `Publisher; Year` followed by pages.
///
/// # Errors
///
/// Returns `ParseError` when fewer than three sentences are present.
pub fn parse_vancouver(text: &str) -> Result<Reference, ParseError> {
    let raw = trimmed_input(text, FORMAT)?;

    let (body, locator) = split_trailing_locator(raw.trim_end_matches('.'));
    let body = body.trim().trim_end_matches('.');
    let segments: Vec<&str> = body
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let (authors, title, source, rest) = match segments.as_slice() {
        // No author sentence: the source sits second and the timeline third.
        [title, source, rest @ ..] if starts_like_unattributed(source, rest) => {
            ("", *title, *source, rest)
        }
        [authors, title, source, rest @ ..] => (*authors, *title, *source, rest),
        _ => {
            return Err(ParseError::missing_anchor(
                FORMAT,
                "authors, title, and source separated by \". \"",
            ));
        }
    };

    let mut reference = Reference::new("article", "");
    reference.authors = split_vancouver_authors(authors);
    reference.title = non_empty(title);
    (reference.doi, reference.url) = locator_fields(locator);

    if let Some(caps) = IMPRINT_REGEX.captures(source) {
        reference.entry_type = "book".to_string();
        reference.publisher = capture(&caps, "publisher");
        reference.year = capture(&caps, "year");
        reference.pages = rest.first().and_then(|pages| non_empty(pages));
    } else {
        reference.journal = non_empty(source);
        match rest.first().and_then(|timeline| TIMELINE_REGEX.captures(timeline)) {
            Some(caps) => {
                reference.year = capture(&caps, "year").filter(|y| !y.starts_with("n.d"));
                reference.volume = capture(&caps, "volume");
                reference.issue = capture(&caps, "issue");
                reference.pages = capture(&caps, "pages");
            }
            None => tracing::trace!("Vancouver citation without a timeline: {rest:?}"),
        }
    }

    reference.cite_key = generate_cite_key(
        &reference.authors,
        reference.year.as_deref(),
        reference.title.as_deref(),
    );
    Ok(reference)
}

fn starts_like_unattributed(second: &str, rest: &[&str]) -> bool {
    IMPRINT_REGEX.is_match(second)
        || rest.first().is_some_and(|third| TIMELINE_REGEX.is_match(third))
}

fn split_vancouver_authors(segment: &str) -> Vec<String> {
    strip_et_al(segment)
        .split(',')
        .filter_map(non_empty)
        .map(|name| expand_initials(&name))
        .collect()
}

/// "Doe JR" becomes "Doe, J. R."; names without a trailing initials token
/// are kept as written.
fn expand_initials(name: &str) -> String {
    match name.rsplit_once(' ') {
        Some((last, initials))
            if initials.len() <= 4 && initials.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            let initials = initials.chars().map(|c| format!("{c}.")).join(" ");
            format!("{}, {initials}", last.trim())
        }
        _ => name.to_string(),
    }
}
