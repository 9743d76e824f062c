//! IEEE citation parsing.

use crate::regex::Regex;
use crate::utils::{
    capture, classify_locator, generate_cite_key, locator_fields, non_empty, strip_et_al, trimmed_input,
};
use crate::{CitationFormat, ParseError, Reference};
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}[a-z]?$").unwrap());

static DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^doi:?\s*(?P<doi>10\.\S+)$").unwrap());

const FORMAT: CitationFormat = CitationFormat::Ieee;

/// Parse a citation written in IEEE style.
///
/// The first quoted string is the title; the authors precede it and the
/// comma-separated clauses after it are classified by their prefix
/// (`vol.`, `no.`, `pp.`, `doi: 10.*`, a URL, or a bare year). The first clause
/// matching none of these is the container.
///
/// # Errors
///
/// Returns `ParseError` if no quoted title is present.
pub fn parse_ieee(text: &str) -> Result<Reference, ParseError> {
    let raw = trimmed_input(text, FORMAT)?;

    let open = raw
        .find('"')
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "quoted title"))?;
    let close = raw[open + 1..]
        .find('"')
        .map(|i| open + 1 + i)
        .ok_or_else(|| ParseError::missing_anchor(FORMAT, "closing quote after the title"))?;

    let mut reference = Reference::new("article", "");
    reference.title = non_empty(raw[open + 1..close].trim().trim_end_matches(','));
    reference.authors = split_ieee_authors(raw[..open].trim().trim_end_matches(','));

    let rest = raw[close + 1..].trim().trim_end_matches('.');
    for token in rest.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(volume) = token.strip_prefix("vol.") {
            reference.volume = non_empty(volume);
        } else if let Some(issue) = token.strip_prefix("no.") {
            reference.issue = non_empty(issue);
        } else if let Some(pages) = token.strip_prefix("pp.") {
            reference.pages = non_empty(pages);
        } else if let Some(caps) = DOI_REGEX.captures(token) {
            reference.doi = capture(&caps, "doi");
        } else if token.to_lowercase().starts_with("http") {
            let (doi, url) = locator_fields(classify_locator(token));
            reference.doi = reference.doi.or(doi);
            reference.url = reference.url.or(url);
        } else if YEAR_REGEX.is_match(token) {
            reference.year = Some(token.to_string());
        } else if reference.journal.is_none() {
            reference.journal = Some(token.to_string());
        } else {
            tracing::trace!("IEEE clause {token:?} left unclassified");
        }
    }

    reference.cite_key = generate_cite_key(
        &reference.authors,
        reference.year.as_deref(),
        reference.title.as_deref(),
    );
    Ok(reference)
}

/// Splits "A. One, B. Two, and C. Three" into names, dropping "et al.".
fn split_ieee_authors(segment: &str) -> Vec<String> {
    strip_et_al(segment)
        .replace(", and ", ", ")
        .replace(" and ", ", ")
        .split(',')
        .filter_map(non_empty)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_journal_article() {
        let reference = parse_ieee(
            "J. Doe and J. Smith, \"Deep Learning for Everything,\" Journal of Omniscience, \
             vol. 42, no. 7, pp. 1–10, 2020, doi: 10.1000/j.jo.2020.01.001.",
        )
        .unwrap();

        assert_eq!(reference.authors, vec!["J. Doe", "J. Smith"]);
        assert_eq!(reference.title.as_deref(), Some("Deep Learning for Everything"));
        assert_eq!(reference.journal.as_deref(), Some("Journal of Omniscience"));
        assert_eq!(reference.volume.as_deref(), Some("42"));
        assert_eq!(reference.issue.as_deref(), Some("7"));
        assert_eq!(reference.pages.as_deref(), Some("1–10"));
        assert_eq!(reference.year.as_deref(), Some("2020"));
        assert_eq!(reference.doi.as_deref(), Some("10.1000/j.jo.2020.01.001"));
        assert_eq!(reference.cite_key, "doe2020deeplearningforeverything");
    }

    #[test]
    fn test_parse_url_and_extra_clauses() {
        let reference = parse_ieee(
            "J. Doe, \"A Chapter,\" The Big Book, Berlin, Acme, pp. 5–9, 2019, https://example.org/c.",
        )
        .unwrap();
        assert_eq!(reference.journal.as_deref(), Some("The Big Book"));
        assert_eq!(reference.url.as_deref(), Some("https://example.org/c"));
        assert_eq!(reference.doi, None);
        assert_eq!(reference.year.as_deref(), Some("2019"));
    }

    #[test]
    fn test_parse_doi_url() {
        let reference = parse_ieee("\"T,\" J, 2001, https://doi.org/10.5/abc.").unwrap();
        assert_eq!(reference.doi.as_deref(), Some("10.5/abc"));
        assert_eq!(reference.authors, Vec::<String>::new());
    }

    #[test]
    fn test_parse_title_only() {
        let reference = parse_ieee("J. Doe, \"Just a Title,\".").unwrap();
        assert_eq!(reference.title.as_deref(), Some("Just a Title"));
        assert_eq!(reference.journal, None);
    }

    #[rstest]
    #[case("Doing Business Review", Some("Doing Business Review"), Some("10.1/x"))]
    #[case("DOİX", Some("DOİX"), Some("10.1/x"))]
    #[case("Doi Studies", Some("Doi Studies"), Some("10.1/x"))]
    fn test_container_starting_with_doi(
        #[case] container: &str,
        #[case] journal: Option<&str>,
        #[case] doi: Option<&str>,
    ) {
        let reference =
            parse_ieee(&format!("J. Doe, \"T,\" {container}, vol. 2, 2001, DOI: 10.1/x.")).unwrap();
        assert_eq!(reference.journal.as_deref(), journal);
        assert_eq!(reference.doi.as_deref(), doi);
        assert_eq!(reference.volume.as_deref(), Some("2"));
    }

    #[test]
    fn test_doing_business_review_survives_round_trip() {
        let mut original = crate::reference::fixtures::journal_article();
        original.journal = Some("Doing Business Review".to_string());
        let reference = parse_ieee(&crate::ieee::format_ieee(&original)).unwrap();
        assert_eq!(reference.journal, original.journal);
        assert_eq!(reference.doi, original.doi);
    }

    #[rstest]
    #[case("J. Doe", &["J. Doe"])]
    #[case("J. Doe and J. Smith", &["J. Doe", "J. Smith"])]
    #[case("A. One, B. Two, and C. Three", &["A. One", "B. Two", "C. Three"])]
    #[case("F. Last1 et al.", &["F. Last1"])]
    #[case("", &[])]
    fn test_split_ieee_authors(#[case] segment: &str, #[case] expected: &[&str]) {
        assert_eq!(split_ieee_authors(segment), expected.to_vec());
    }

    #[rstest]
    #[case("J. Doe, Untitled, Journal, 2020.", "quoted title")]
    #[case("J. Doe, \"Untitled, Journal, 2020.", "closing quote")]
    fn test_missing_title_anchor(#[case] input: &str, #[case] anchor_hint: &str) {
        let err = parse_ieee(input).unwrap_err();
        assert_eq!(err.format, CitationFormat::Ieee);
        assert!(matches!(err.error, ValueError::MissingAnchor { anchor } if anchor.contains(anchor_hint)));
    }
}
