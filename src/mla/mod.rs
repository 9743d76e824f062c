//! MLA 9th edition Works Cited formatting.
//!
//! ```text
//! Last, First, and First Last. "Title." *Container*, vol. N, no. M, Year, pp. X–Y. Locator.
//! ```
//!
//! Titles of works without a container are italicized instead of quoted;
//! books without a journal or book container list their imprint instead.

mod parse;

pub use parse::parse_mla;

use crate::Reference;
use crate::reference::present;
use crate::utils::{
    AuthorListStyle, close_sentence, format_author_list, join_clauses, page_range,
    preferred_locator, title_case,
};
use itertools::Itertools;

pub(crate) const AUTHORS: AuthorListStyle = AuthorListStyle {
    invert_first: true,
    conjunction: "and",
    separator: ",",
    final_separator: ",",
    max_names: Some(2),
    et_al: "et al.",
    et_al_after_first: true,
    et_al_separator: ", ",
};

/// Format a reference as an MLA Works Cited entry.
pub fn format_mla(reference: &Reference) -> String {
    let sections = [
        author_section(reference),
        title_section(reference),
        detail_section(reference),
    ];
    close_sentence(&sections.into_iter().flatten().join(" "))
}

fn author_section(reference: &Reference) -> Option<String> {
    let authors = format_author_list(&reference.normalized_authors(), &AUTHORS);
    (!authors.is_empty()).then(|| close_sentence(&authors))
}

fn title_section(reference: &Reference) -> Option<String> {
    let title = title_case(present(&reference.title)?);
    let title = title.trim_end_matches('.');
    Some(match reference.primary_container() {
        Some(_) => format!("\"{title}.\""),
        None => format!("*{title}*."),
    })
}

fn detail_section(reference: &Reference) -> Option<String> {
    let journal = present(&reference.journal);
    let booktitle = present(&reference.booktitle);
    let publisher = present(&reference.publisher).unwrap_or_default();
    let year = present(&reference.year).unwrap_or_default();
    let pages = page_range(reference)
        .map(|p| format!("pp. {p}"))
        .unwrap_or_default();

    let detail = match journal.or(booktitle) {
        Some(container) => {
            let volume_issue = [
                present(&reference.volume).map(|v| format!("vol. {v}")),
                present(&reference.issue).map(|i| format!("no. {i}")),
            ]
            .into_iter()
            .flatten()
            .join(", ");
            let publisher = if journal.is_none() { publisher } else { "" };
            join_clauses(
                [
                    format!("*{container}*").as_str(),
                    volume_issue.as_str(),
                    publisher,
                    year,
                    pages.as_str(),
                ],
                ", ",
            )
        }
        None => join_clauses(
            [
                present(&reference.place).unwrap_or_default(),
                publisher,
                year,
                pages.as_str(),
            ],
            ", ",
        ),
    };

    let text = match preferred_locator(reference, "https://doi.org/") {
        Some(locator) if detail.is_empty() => locator,
        Some(locator) => format!("{} {locator}", close_sentence(&detail)),
        None => detail,
    };
    (!text.is_empty()).then(|| close_sentence(&text))
}
