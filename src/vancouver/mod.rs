//! Vancouver (NLM) reference formatting.
//!
//! ```text
//! Last I, Last II. Title in sentence case. Journal. Year;Vol(Issue):X–Y. doi:D.
//! Last I. Title. Publisher; Year. X–Y.
//! ```

mod parse;

pub use parse::parse_vancouver;

use crate::Reference;
use crate::reference::present;
use crate::utils::{close_sentence, name_parts, page_range, preferred_locator, sentence_case};
use itertools::Itertools;

/// Format a reference in Vancouver style.
pub fn format_vancouver(reference: &Reference) -> String {
    let mut sections = vec![author_section(reference), title_section(reference)];
    if present(&reference.journal).is_some() {
        sections.extend(journal_sections(reference));
    } else {
        sections.extend(book_sections(reference));
    }
    sections.push(preferred_locator(reference, "doi:").map(|l| close_sentence(&l)));

    close_sentence(&sections.into_iter().flatten().join(" "))
}

/// "Last II": surname followed by unpunctuated initials.
fn vancouver_name(author: &str) -> String {
    let (last, given) = name_parts(author);
    if last.is_empty() {
        return author.trim().to_string();
    }
    let initials: String = given
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    format!("{last} {initials}").trim().to_string()
}

fn author_section(reference: &Reference) -> Option<String> {
    let authors = reference
        .normalized_authors()
        .into_iter()
        .map(vancouver_name)
        .join(", ");
    (!authors.is_empty()).then(|| format!("{authors}."))
}

fn title_section(reference: &Reference) -> Option<String> {
    let title = sentence_case(present(&reference.title)?);
    Some(close_sentence(&title))
}

fn journal_sections(reference: &Reference) -> Vec<Option<String>> {
    let mut timeline = present(&reference.year).unwrap_or("n.d.").to_string();
    match (present(&reference.volume), present(&reference.issue)) {
        (Some(volume), Some(issue)) => timeline.push_str(&format!(";{volume}({issue})")),
        (Some(volume), None) => timeline.push_str(&format!(";{volume}")),
        (None, Some(issue)) => timeline.push_str(&format!(";({issue})")),
        (None, None) => {}
    }
    if let Some(pages) = page_range(reference) {
        timeline.push_str(&format!(":{pages}"));
    }
    vec![
        present(&reference.journal).map(close_sentence),
        Some(close_sentence(&timeline)),
    ]
}

fn book_sections(reference: &Reference) -> Vec<Option<String>> {
    let imprint = [present(&reference.publisher), present(&reference.year)]
        .into_iter()
        .flatten()
        .join("; ");
    vec![
        (!imprint.is_empty()).then(|| format!("{imprint}.")),
        page_range(reference).map(|pages| format!("{pages}.")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::fixtures::journal_article;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_format_vancouver_journal_article() {
        assert_eq!(
            format_vancouver(&journal_article()),
            "Doe J, Smith J. Deep learning for everything. Journal of Omniscience. \
             2020;42(7):1–10. doi:10.1000/j.jo.2020.01.001."
        );
    }

    #[rstest]
    #[case(Some("42"), Some("7"), "2020;42(7):1–10.")]
    #[case(Some("42"), None, "2020;42:1–10.")]
    #[case(None, Some("7"), "2020;(7):1–10.")]
    #[case(None, None, "2020:1–10.")]
    fn test_timeline_variants(
        #[case] volume: Option<&str>,
        #[case] issue: Option<&str>,
        #[case] timeline: &str,
    ) {
        let mut reference = journal_article();
        reference.volume = volume.map(String::from);
        reference.issue = issue.map(String::from);
        assert!(format_vancouver(&reference).contains(&format!("Omniscience. {timeline} doi:")));
    }

    #[test]
    fn test_missing_year_is_nd() {
        let mut reference = journal_article();
        reference.year = None;
        assert!(format_vancouver(&reference).contains("Omniscience. n.d.;42(7):1–10. doi:"));
    }

    #[test]
    fn test_names_with_several_given_names() {
        let mut reference = journal_article();
        reference.authors = vec!["Doe, John Ronald".into(), "Plato".into()];
        assert!(format_vancouver(&reference).starts_with("Doe JR, Plato. Deep"));
    }

    #[test]
    fn test_book_form() {
        let mut reference = Reference::new("book", "key");
        reference.authors = vec!["Plato".into()];
        reference.title = Some("The Republic".into());
        reference.publisher = Some("Academy".into());
        reference.year = Some("1999".into());
        reference.pages = Some("12-15".into());
        reference.url = Some("https://example.org/republic".into());
        assert_eq!(
            format_vancouver(&reference),
            "Plato. The republic. Academy; 1999. 12–15. https://example.org/republic."
        );
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(format_vancouver(&Reference::default()), "");
    }
}
