//! APA 6th and 7th edition reference list formatting.
//!
//! Both editions share a single grammar:
//!
//! ```text
//! Authors (Year). Title (Report No. N). Container, Volume(Issue), Pages. Locator
//! ```
//!
//! and differ only in how long an author list may grow before it is
//! truncated and in how a DOI is rendered.
//!
//! # Example
//!
//! ```
//! use citeswap::Reference;
//! use citeswap::apa::{format_apa, parse_apa};
//!
//! let mut reference = Reference::new("article", "key");
//! reference.authors = vec!["Ada Lovelace".into()];
//! reference.title = Some("Notes on the Analytical Engine".into());
//! reference.journal = Some("Scientific Memoirs".into());
//! reference.year = Some("1843".into());
//!
//! let citation = format_apa(&reference);
//! assert_eq!(
//!     citation,
//!     "Lovelace, A. (1843). Notes on the analytical engine. Scientific Memoirs."
//! );
//! assert_eq!(parse_apa(&citation).unwrap().year.as_deref(), Some("1843"));
//! ```

mod parse;

pub use parse::parse_apa;

use crate::Reference;
use crate::reference::present;
use crate::utils::{
    author_initials, close_sentence, join_clauses, page_range, preferred_locator, sentence_case,
};
use itertools::Itertools;

/// Rules that differ between APA editions.
#[derive(Debug, Clone, Copy)]
struct ApaEdition {
    /// Longest author list rendered in full.
    max_authors: usize,
    /// Names kept before the ellipsis once the list is truncated.
    leading_authors: usize,
    /// Render any non-URL DOI as a doi.org link, not only `10.` DOIs.
    doi_always_linked: bool,
    doi_prefix: &'static str,
}

const SIXTH: ApaEdition = ApaEdition {
    max_authors: 7,
    leading_authors: 6,
    doi_always_linked: true,
    doi_prefix: "",
};

const SEVENTH: ApaEdition = ApaEdition {
    max_authors: 20,
    leading_authors: 19,
    doi_always_linked: false,
    doi_prefix: "https://doi.org/",
};

/// Format a reference using simplified APA 6th edition rules.
pub fn format_apa(reference: &Reference) -> String {
    format_edition(reference, &SIXTH)
}

/// Format a reference using simplified APA 7th edition rules.
pub fn format_apa7(reference: &Reference) -> String {
    format_edition(reference, &SEVENTH)
}

fn format_edition(reference: &Reference, edition: &ApaEdition) -> String {
    let year = present(&reference.year).map(|year| format!("({year})."));
    // Without a year section the author list closes its own sentence.
    let authors = author_section(&reference.normalized_authors(), edition)
        .map(|authors| if year.is_some() { authors } else { close_sentence(&authors) });
    let sections = [
        authors,
        year,
        title_section(reference),
        container_section(reference),
        locator_section(reference, edition),
    ];
    sections.into_iter().flatten().join(" ")
}

fn author_section(authors: &[&str], edition: &ApaEdition) -> Option<String> {
    let formatted = author_initials(authors);
    let (last, leading) = formatted.split_last()?;
    let text = match leading.len() + 1 {
        1 => last.clone(),
        count if count <= edition.max_authors => format!("{}, & {}", leading.join(", "), last),
        _ => format!(
            "{}, ... {}",
            leading[..edition.leading_authors].join(", "),
            last
        ),
    };
    Some(text)
}

fn title_section(reference: &Reference) -> Option<String> {
    let title = sentence_case(present(&reference.title)?);
    let text = match present(&reference.report_number) {
        Some(number) => format!("{title} (Report No. {number})."),
        None => close_sentence(&title),
    };
    Some(text)
}

fn container_section(reference: &Reference) -> Option<String> {
    let container = reference.primary_container()?;
    let pages = page_range(reference).unwrap_or_default();
    let publisher = present(&reference.publisher).unwrap_or_default();

    let body = if present(&reference.journal).is_some() {
        let volume_issue = match (present(&reference.volume), present(&reference.issue)) {
            (Some(volume), Some(issue)) => format!("{volume}({issue})"),
            (Some(volume), None) => volume.to_string(),
            _ => String::new(),
        };
        join_clauses([container, volume_issue.as_str(), pages.as_str()], ", ")
    } else if let Some(booktitle) = present(&reference.booktitle) {
        let edition = present(&reference.edition)
            .map(|e| format!("({e})"))
            .unwrap_or_default();
        join_clauses(
            [
                format!("In {booktitle}").as_str(),
                edition.as_str(),
                chapter_pages(&pages).as_str(),
                publisher,
            ],
            ", ",
        )
    } else if let Some(event) = present(&reference.event_title) {
        let location = present(&reference.event_location)
            .or_else(|| present(&reference.place))
            .unwrap_or_default();
        join_clauses(
            [
                format!("In {event}").as_str(),
                chapter_pages(&pages).as_str(),
                location,
                publisher,
            ],
            ", ",
        )
    } else {
        let imprint = match present(&reference.place) {
            Some(place) => format!("{place}: {publisher}"),
            None => publisher.to_string(),
        };
        let retrieved = present(&reference.accessed_date)
            .map(|date| format!("Retrieved {date}"))
            .unwrap_or_default();
        join_clauses(
            [
                present(&reference.edition).unwrap_or_default(),
                imprint.as_str(),
                pages.as_str(),
                retrieved.as_str(),
            ],
            ", ",
        )
    };
    Some(format!("{body}."))
}

fn chapter_pages(pages: &str) -> String {
    if pages.is_empty() {
        String::new()
    } else {
        format!("(pp. {pages})")
    }
}

fn locator_section(reference: &Reference, edition: &ApaEdition) -> Option<String> {
    if edition.doi_always_linked
        && let Some(doi) = present(&reference.doi)
        && !doi.trim().to_lowercase().starts_with("http")
    {
        return Some(format!("https://doi.org/{}", doi.trim()));
    }
    preferred_locator(reference, edition.doi_prefix)
}
