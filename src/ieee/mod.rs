//! IEEE reference formatting.
//!
//! An IEEE citation is a single comma-joined clause:
//!
//! ```text
//! I. Last and I. Last, "Title," Container, vol. N, no. M, pp. X–Y, Year, doi: D.
//! ```
//!
//! The comma after the quoted title sits inside the quotes, so the clause
//! following it is joined with a plain space.

mod parse;

pub use parse::parse_ieee;

use crate::Reference;
use crate::reference::present;
use crate::utils::{page_range, preferred_locator, split_name_with_initials};
use itertools::Itertools;

/// Longest author list rendered before collapsing to "et al.".
const MAX_AUTHORS: usize = 6;

/// Format a reference using simplified IEEE rules.
pub fn format_ieee(reference: &Reference) -> String {
    let journal_like = present(&reference.journal).is_some()
        || present(&reference.volume).is_some()
        || present(&reference.issue).is_some();

    let mut segments = vec![
        author_segment(&reference.normalized_authors()),
        present(&reference.title).map(|title| format!("\"{title},\"")),
    ];
    if journal_like {
        segments.push(reference.primary_container().map(str::to_string));
        segments.push(volume_issue_segment(reference));
    } else {
        let container = present(&reference.booktitle).or_else(|| reference.primary_container());
        segments.push(container.map(str::to_string));
        segments.push(present(&reference.place).map(str::to_string));
        if present(&reference.booktitle).is_some() {
            segments.push(present(&reference.publisher).map(str::to_string));
        }
    }
    segments.push(page_range(reference).map(|pages| format!("pp. {pages}")));
    segments.push(present(&reference.year).map(str::to_string));
    segments.push(preferred_locator(reference, "doi: "));

    let sentence = join_segments(segments.into_iter().flatten());
    if sentence.is_empty() {
        sentence
    } else {
        format!("{sentence}.")
    }
}

fn ieee_name(author: &str) -> String {
    let (last, initials) = split_name_with_initials(author);
    match (last.is_empty(), initials.is_empty()) {
        (true, _) => author.trim().to_string(),
        (false, true) => last.to_string(),
        (false, false) => format!("{} {}", initials.iter().join(" "), last),
    }
}

fn author_segment(authors: &[&str]) -> Option<String> {
    let names: Vec<String> = authors.iter().map(|a| ieee_name(a)).collect();
    let text = match names.as_slice() {
        [] => return None,
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [first, ..] if names.len() > MAX_AUTHORS => format!("{first} et al."),
        [leading @ .., last] => format!("{}, and {}", leading.join(", "), last),
    };
    Some(text)
}

fn volume_issue_segment(reference: &Reference) -> Option<String> {
    let volume = present(&reference.volume).map(|v| format!("vol. {v}"));
    let issue = present(&reference.issue).map(|i| format!("no. {i}"));
    let text = [volume, issue].into_iter().flatten().join(", ");
    (!text.is_empty()).then_some(text)
}

fn join_segments(segments: impl Iterator<Item = String>) -> String {
    let mut sentence = String::new();
    for segment in segments.filter(|s| !s.trim().is_empty()) {
        if !sentence.is_empty() {
            sentence.push_str(if sentence.ends_with(",\"") { " " } else { ", " });
        }
        sentence.push_str(segment.trim());
    }
    sentence
}
