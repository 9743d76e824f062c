//! APA citation parsing.
//!
//! Anchors are located left to right: the `(year).` marker, the first `". "`
//! closing the title, then a trailing DOI/URL. Whatever sits between the
//! title and the locator is matched as a journal clause, or as a chapter
//! clause when it opens with `In `.

use crate::regex::Regex;
use crate::utils::{
    capture, generate_cite_key, locator_fields, non_empty, split_trailing_locator, trimmed_input,
};
use crate::{CitationFormat, ParseError, Reference};
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?:\d{4}[a-z]?(?:,[^)]*)?|n\.d\.)\)\.").unwrap());

static JOURNAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<container>.+?)(?:,\s*(?P<volume>\d+)(?:\((?P<issue>[^)]+)\))?)?(?:,\s*(?P<pages>[\w\-–]+))?$",
    )
    .unwrap()
});

static CHAPTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^In (?P<booktitle>.+?)(?:, \((?P<edition>[^p)][^)]*)\))?(?:, \(pp\. (?P<pages>[^)]+)\))?(?:, (?P<publisher>.+))?$",
    )
    .unwrap()
});

static REPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.+?)\s*\(Report No\. (?P<number>[^)]+)\)$").unwrap()
});

const FORMAT: CitationFormat = CitationFormat::Apa;

/// Parse a citation written in APA style (6th or 7th edition).
///
/// # Errors
///
/// Returns `ParseError` if the `(year).` marker is missing or the title is
/// not terminated by a period.
pub fn parse_apa(text: &str) -> Result<Reference, ParseError> {
    let raw = trimmed_input(text, FORMAT)?;

    let anchor = YEAR_REGEX
        .find(raw)
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "year segment \"(year).\""))?;
    let year = &raw[anchor.start() + 1..anchor.end() - 2];
    let authors = split_apa_authors(&raw[..anchor.start()]);
    tracing::trace!("APA year anchor at byte {}", anchor.start());

    let remainder = raw[anchor.end()..].trim();
    // "(Report No. N)" belongs to the title even though it holds ". "
    let search_from = remainder
        .find("(Report No. ")
        .and_then(|start| remainder[start..].find(')').map(|end| start + end))
        .unwrap_or(0);
    let (title_part, rest) = match remainder[search_from..].find(". ") {
        Some(end) => {
            let end = search_from + end;
            (&remainder[..end], &remainder[end + 2..])
        }
        None => match remainder.strip_suffix('.') {
            Some(title) => (title, ""),
            None => {
                return Err(ParseError::missing_anchor(
                    FORMAT,
                    "title terminated by \". \"",
                ));
            }
        },
    };

    let mut reference = Reference::new("article", "");
    reference.authors = authors;
    reference.year = non_empty(year).filter(|y| y != "n.d.");
    match REPORT_REGEX.captures(title_part.trim()) {
        Some(caps) => {
            reference.title = capture(&caps, "title");
            reference.report_number = capture(&caps, "number");
        }
        None => reference.title = non_empty(title_part),
    }

    let (body, locator) = split_trailing_locator(rest);
    (reference.doi, reference.url) = locator_fields(locator);
    let body = body.trim().trim_end_matches('.').trim();

    if reference.report_number.is_some() {
        reference.entry_type = "techreport".to_string();
        reference.publisher = non_empty(body);
    } else if body.starts_with("In ")
        && let Some(caps) = CHAPTER_REGEX.captures(body)
    {
        reference.entry_type = "incollection".to_string();
        reference.booktitle = capture(&caps, "booktitle");
        reference.edition = capture(&caps, "edition");
        reference.pages = capture(&caps, "pages");
        reference.publisher = capture(&caps, "publisher");
    } else if let Some(caps) = JOURNAL_REGEX.captures(body) {
        reference.journal = capture(&caps, "container");
        reference.volume = capture(&caps, "volume");
        reference.issue = capture(&caps, "issue");
        reference.pages = capture(&caps, "pages");
    } else {
        reference.journal = non_empty(body);
    }

    reference.cite_key = generate_cite_key(
        &reference.authors,
        reference.year.as_deref(),
        reference.title.as_deref(),
    );
    Ok(reference)
}

/// Splits "Doe, J., Roe, R. A., & Li, B." into "Last, I." names. `&` and
/// " and " both separate names.
///
/// Initials-only tokens are attached to the surname before them; an
/// ellipsis marking a truncated list is dropped.
fn split_apa_authors(segment: &str) -> Vec<String> {
    let tokens = segment
        .split('&')
        .flat_map(|chunk| chunk.split(" and "))
        .flat_map(|chunk| chunk.split(','))
        .map(|token| token.trim().trim_start_matches("...").trim())
        .filter(|token| !token.is_empty());

    let mut authors: Vec<String> = Vec::new();
    for token in tokens {
        match authors.last_mut() {
            Some(last) if is_initials(token) && !last.contains(',') => {
                last.push_str(", ");
                last.push_str(token);
            }
            _ => authors.push(token.to_string()),
        }
    }
    authors
}

fn is_initials(token: &str) -> bool {
    token.split_whitespace().all(|word| {
        word.ends_with('.')
            && word.chars().next().is_some_and(char::is_uppercase)
            && word.chars().filter(|c| c.is_alphabetic()).count() <= 2
    })
}
