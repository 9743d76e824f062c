//! Chicago author-date reference list formatting.
//!
//! Pieces are joined as sentences:
//!
//! ```text
//! Last, First, and First Last. Year. "Title." *Journal* V (I): X–Y. Locator.
//! Last, First. Year. "Title." In *Booktitle*, X–Y. Place: Publisher.
//! Last, First. Year. *Title*. Place: Publisher.
//! ```

mod parse;

pub use parse::parse_chicago;

use crate::Reference;
use crate::reference::present;
use crate::utils::{
    AuthorListStyle, format_author_list, join_with_period, page_range, preferred_locator,
    title_case,
};

pub(crate) const AUTHORS: AuthorListStyle = AuthorListStyle {
    invert_first: true,
    conjunction: "and",
    separator: ",",
    final_separator: ",",
    max_names: Some(3),
    et_al: "et al.",
    et_al_after_first: true,
    et_al_separator: ", ",
};

/// Format a reference as a Chicago author-date reference list entry.
pub fn format_chicago(reference: &Reference) -> String {
    let authors = format_author_list(&reference.normalized_authors(), &AUTHORS);
    let year = present(&reference.year).unwrap_or("n.d.");
    let title = title_segment(reference).unwrap_or_default();
    let (detail, imprint) = detail_segments(reference);
    let locator = preferred_locator(reference, "https://doi.org/").unwrap_or_default();

    join_with_period([
        authors.as_str(),
        year,
        title.as_str(),
        detail.as_str(),
        imprint.as_str(),
        locator.as_str(),
    ])
}

fn title_segment(reference: &Reference) -> Option<String> {
    let title = title_case(present(&reference.title)?);
    let title = title.trim_end_matches('.');
    Some(match reference.primary_container() {
        Some(_) => format!("\"{title}.\""),
        None => format!("*{title}*"),
    })
}

/// The container clause and the "Place: Publisher" imprint.
fn detail_segments(reference: &Reference) -> (String, String) {
    let pages = page_range(reference);

    if let Some(journal) = present(&reference.journal) {
        let mut detail = format!("*{journal}*");
        if let Some(volume) = present(&reference.volume) {
            detail.push_str(&format!(" {volume}"));
        }
        if let Some(issue) = present(&reference.issue) {
            detail.push_str(&format!(" ({issue})"));
        }
        if let Some(pages) = pages {
            detail.push_str(&format!(": {pages}"));
        }
        return (detail, String::new());
    }

    let detail = match present(&reference.booktitle) {
        Some(booktitle) => match pages {
            Some(pages) => format!("In *{booktitle}*, {pages}"),
            None => format!("In *{booktitle}*"),
        },
        None => String::new(),
    };
    let imprint = match (present(&reference.place), present(&reference.publisher)) {
        (Some(place), Some(publisher)) => format!("{place}: {publisher}"),
        (None, Some(publisher)) => publisher.to_string(),
        _ => String::new(),
    };
    (detail, imprint)
}
