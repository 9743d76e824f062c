//! Chicago author-date citation parsing.

use crate::regex::Regex;
use crate::utils::{
    capture, generate_cite_key, locator_fields, non_empty, split_inverted_authors,
    split_trailing_locator, trimmed_input,
};
use crate::{CitationFormat, ParseError, Reference};
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\.\s+)(?P<year>\d{4}[a-z]?|n\.d)\.(?:\s+|$)").unwrap()
});

static QUOTED_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(?P<title>.+?)"(?:\s|$)"#).unwrap());

static ITALIC_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*(?P<title>[^*]+)\*\.?(?:\s|$)").unwrap());

static JOURNAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\*(?P<journal>[^*]+)\*\s*(?P<volume>\d+)?\s*(?:\((?P<issue>[^)]+)\))?(?::\s*(?P<pages>\S+))?",
    )
    .unwrap()
});

static CHAPTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^In \*(?P<booktitle>[^*]+)\*(?:,\s*(?P<pages>[^.]+?))?(?:\.\s+(?P<imprint>.+))?$")
        .unwrap()
});

const FORMAT: CitationFormat = CitationFormat::Chicago;

/// Parse a Chicago author-date citation.
///
/// # Errors
///
/// Returns `ParseError` when the year sentence or the title after it is
/// missing.
pub fn parse_chicago(text: &str) -> Result<Reference, ParseError> {
    let raw = trimmed_input(text, FORMAT)?;

    let year_match = YEAR_REGEX
        .captures(raw)
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "year followed by \".\""))?;
    let (Some(whole), Some(year)) = (year_match.get(0), year_match.name("year")) else {
        return Err(ParseError::missing_anchor(FORMAT, "year followed by \".\""));
    };

    let mut reference = Reference::new("article", "");
    // Keep the period the anchor starts on; it may close an initial.
    let authors_end = whole.start() + usize::from(whole.as_str().starts_with('.'));
    reference.authors = split_inverted_authors(&raw[..authors_end]);
    reference.year = match year.as_str() {
        "n.d" => None,
        year => Some(year.to_string()),
    };

    let rest = &raw[whole.end()..];
    let title_match = QUOTED_TITLE_REGEX
        .captures(rest)
        .or_else(|| ITALIC_TITLE_REGEX.captures(rest))
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "quoted or italic title"))?;
    let (Some(title_whole), Some(title)) = (title_match.get(0), title_match.name("title")) else {
        return Err(ParseError::missing_anchor(FORMAT, "quoted or italic title"));
    };
    reference.title = non_empty(title.as_str().trim().trim_end_matches('.'));

    let after = rest[title_whole.end()..].trim().trim_end_matches('.');
    let (body, locator) = split_trailing_locator(after);
    (reference.doi, reference.url) = locator_fields(locator);
    let body = body.trim().trim_end_matches('.').trim();

    if let Some(caps) = JOURNAL_REGEX.captures(body) {
        reference.journal = capture(&caps, "journal");
        reference.volume = capture(&caps, "volume");
        reference.issue = capture(&caps, "issue");
        reference.pages = capture(&caps, "pages");
    } else if let Some(caps) = CHAPTER_REGEX.captures(body) {
        reference.entry_type = "incollection".to_string();
        reference.booktitle = capture(&caps, "booktitle");
        reference.pages = capture(&caps, "pages");
        if let Some(imprint) = caps.name("imprint") {
            (reference.place, reference.publisher) = split_imprint(imprint.as_str());
        }
    } else if !body.is_empty() {
        reference.entry_type = "book".to_string();
        (reference.place, reference.publisher) = split_imprint(body);
    }

    reference.cite_key = generate_cite_key(
        &reference.authors,
        reference.year.as_deref(),
        reference.title.as_deref(),
    );
    Ok(reference)
}

/// "Place: Publisher", or just the publisher.
fn split_imprint(imprint: &str) -> (Option<String>, Option<String>) {
    match imprint.split_once(": ") {
        Some((place, publisher)) => (non_empty(place), non_empty(publisher)),
        None => (None, non_empty(imprint)),
    }
}
