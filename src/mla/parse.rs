//! MLA citation parsing.

use crate::regex::Regex;
use crate::utils::{
    generate_cite_key, locator_fields, non_empty, split_inverted_authors, split_trailing_locator,
    trimmed_input,
};
use crate::{CitationFormat, ParseError, Reference};
use std::sync::LazyLock;

static QUOTED_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?P<title>.+?)"(?:\s|$)"#).unwrap());

static ITALIC_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(?P<title>[^*]+)\*\.?(?:\s|$)").unwrap());

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}[a-z]?$").unwrap());

const FORMAT: CitationFormat = CitationFormat::Mla;

/// Parse a citation written in MLA style.
///
/// The quoted title (or, for stand-alone works, the italic title) splits
/// the authors from the detail clause. A detail clause headed by an
/// italic container is a journal when it carries `vol.`/`no.` and a book
/// chapter otherwise; a plain one is a book imprint.
///
/// # Errors
///
/// Returns `ParseError` if neither a quoted nor an italic title is found.
pub fn parse_mla(text: &str) -> Result<Reference, ParseError> {
    let raw = trimmed_input(text, FORMAT)?;

    let title_match = QUOTED_TITLE_REGEX
        .captures(raw)
        .or_else(|| ITALIC_TITLE_REGEX.captures(raw))
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "quoted or italic title"))?;
    let (Some(whole), Some(title)) = (title_match.get(0), title_match.name("title")) else {
        return Err(ParseError::missing_anchor(FORMAT, "quoted or italic title"));
    };

    let mut reference = Reference::new("article", "");
    reference.authors = split_inverted_authors(&raw[..whole.start()]);
    reference.title = non_empty(title.as_str().trim().trim_end_matches('.'));

    let after = raw[whole.end()..].trim().trim_end_matches('.');
    let (body, locator) = split_trailing_locator(after);
    (reference.doi, reference.url) = locator_fields(locator);
    let body = body.trim().trim_end_matches('.').trim();

    let (container, clauses) = match body.strip_prefix('*').and_then(|b| b.split_once('*')) {
        Some((container, rest)) => (non_empty(container), rest),
        None => (None, body),
    };

    let mut unclassified = Vec::new();
    for clause in clauses.split(", ").map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(volume) = clause.strip_prefix("vol.") {
            reference.volume = non_empty(volume);
        } else if let Some(issue) = clause.strip_prefix("no.") {
            reference.issue = non_empty(issue);
        } else if let Some(pages) = clause.strip_prefix("pp.") {
            reference.pages = non_empty(pages);
        } else if YEAR_REGEX.is_match(clause) {
            reference.year = Some(clause.to_string());
        } else {
            unclassified.push(clause.trim_start_matches(',').trim());
        }
    }

    match container {
        Some(container) if reference.volume.is_some() || reference.issue.is_some() => {
            reference.journal = Some(container);
        }
        Some(container) => {
            reference.entry_type = "incollection".to_string();
            reference.booktitle = Some(container);
        }
        None if !unclassified.is_empty() => reference.entry_type = "book".to_string(),
        None => {}
    }
    if let Some((publisher, leading)) = unclassified.split_last() {
        reference.publisher = non_empty(publisher);
        if reference.entry_type == "book" {
            reference.place = leading.first().and_then(|place| non_empty(place));
        }
    }

    reference.cite_key = generate_cite_key(
        &reference.authors,
        reference.year.as_deref(),
        reference.title.as_deref(),
    );
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_journal_article() {
        let reference = parse_mla(
            "Doe, John, and Jane Smith. \"Deep Learning For Everything.\" \
             *Journal of Omniscience*, vol. 42, no. 7, 2020, pp. 1–10. \
             https://doi.org/10.1000/j.jo.2020.01.001.",
        )
        .unwrap();

        assert_eq!(reference.entry_type, "article");
        assert_eq!(reference.authors, vec!["Doe, John", "Jane Smith"]);
        assert_eq!(reference.title.as_deref(), Some("Deep Learning For Everything"));
        assert_eq!(reference.journal.as_deref(), Some("Journal of Omniscience"));
        assert_eq!(reference.volume.as_deref(), Some("42"));
        assert_eq!(reference.issue.as_deref(), Some("7"));
        assert_eq!(reference.year.as_deref(), Some("2020"));
        assert_eq!(reference.pages.as_deref(), Some("1–10"));
        assert_eq!(reference.doi.as_deref(), Some("10.1000/j.jo.2020.01.001"));
    }

    #[test]
    fn test_parse_chapter() {
        let reference =
            parse_mla("Doe, John. \"A Chapter.\" *The Big Book*, Acme, 2019, pp. 5–9.").unwrap();
        assert_eq!(reference.entry_type, "incollection");
        assert_eq!(reference.booktitle.as_deref(), Some("The Big Book"));
        assert_eq!(reference.publisher.as_deref(), Some("Acme"));
        assert_eq!(reference.pages.as_deref(), Some("5–9"));
        assert_eq!(reference.journal, None);
    }

    #[test]
    fn test_parse_book_imprint() {
        let reference = parse_mla("Plato. \"The Republic.\" Athens, Academy, 1999.").unwrap();
        assert_eq!(reference.entry_type, "book");
        assert_eq!(reference.authors, vec!["Plato"]);
        assert_eq!(reference.place.as_deref(), Some("Athens"));
        assert_eq!(reference.publisher.as_deref(), Some("Academy"));
        assert_eq!(reference.year.as_deref(), Some("1999"));
    }

    #[test]
    fn test_parse_italic_title_with_url() {
        let reference = parse_mla("*Web Page*. https://example.org.").unwrap();
        assert_eq!(reference.title.as_deref(), Some("Web Page"));
        assert_eq!(reference.url.as_deref(), Some("https://example.org"));
        assert!(reference.authors.is_empty());
    }

    #[test]
    fn test_parse_et_al() {
        let reference = parse_mla("Doe, John, et al. \"Title.\" *J*, vol. 1, 2000.").unwrap();
        assert_eq!(reference.authors, vec!["Doe, John"]);
        assert_eq!(reference.journal.as_deref(), Some("J"));
    }

    #[test]
    fn test_missing_title() {
        let err = parse_mla("Doe, John. Untitled. Journal, 2020.").unwrap_err();
        assert_eq!(err.format, CitationFormat::Mla);
        assert!(matches!(err.error, ValueError::MissingAnchor { .. }));
    }

    #[test]
    fn test_initial_keeps_its_period() {
        let mut original = crate::reference::fixtures::journal_article();
        original.authors = vec!["Doe, J.".into()];
        let reference = parse_mla(&crate::mla::format_mla(&original)).unwrap();
        assert_eq!(reference.authors, vec!["Doe, J."]);
        assert_eq!(reference.year, original.year);
    }
}
