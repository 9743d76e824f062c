//! The normalized reference record shared by every formatter and parser.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single citable work.
///
/// Every scalar field is optional; a `None` (or blank) value means the field
/// is omitted from rendered output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Free-form entry type such as `article`, `book`, or `misc`
    pub entry_type: String,
    /// Identifier used as the BibTeX entry handle
    pub cite_key: String,
    pub title: Option<String>,
    /// Author names in any of "Last, First", "First Last", or single-token form
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub booktitle: Option<String>,
    pub publisher: Option<String>,
    /// Place of publication (BibTeX `address`)
    pub place: Option<String>,
    pub institution: Option<String>,
    pub edition: Option<String>,
    pub report_number: Option<String>,
    pub event_title: Option<String>,
    pub event_location: Option<String>,
    pub editors: Vec<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    /// Date the online resource was accessed (BibTeX `urldate`)
    pub accessed_date: Option<String>,
    pub medium: Option<String>,
    pub year: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    /// Unrecognized BibTeX fields, kept only through the BibTeX codec
    pub extra_fields: BTreeMap<String, String>,
}

/// Returns the value if it is present and not blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Reference {
    /// Create an empty Reference with the given entry type and cite key.
    pub fn new(entry_type: impl Into<String>, cite_key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            cite_key: cite_key.into(),
            ..Default::default()
        }
    }

    /// The larger work this reference is part of: the first non-empty of
    /// journal, booktitle, and publisher.
    pub fn primary_container(&self) -> Option<&str> {
        present(&self.journal)
            .or_else(|| present(&self.booktitle))
            .or_else(|| present(&self.publisher))
    }

    /// Author names with surrounding whitespace removed and blanks dropped.
    pub fn normalized_authors(&self) -> Vec<&str> {
        self.authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// The BibTeX view of this reference, keyed by lowercase field name.
    ///
    /// `issue` takes the `number` slot over `report_number`; extra fields
    /// never replace a standard field of the same name.
    pub fn bibtex_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        let authors = self.normalized_authors();
        if !authors.is_empty() {
            fields.insert("author".to_string(), authors.iter().join(" and "));
        }
        let editors = self
            .editors
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .join(" and ");
        if !editors.is_empty() {
            fields.insert("editor".to_string(), editors);
        }

        let scalars = [
            ("title", &self.title),
            ("journal", &self.journal),
            ("booktitle", &self.booktitle),
            ("publisher", &self.publisher),
            ("address", &self.place),
            ("institution", &self.institution),
            ("edition", &self.edition),
            ("number", &self.report_number),
            ("number", &self.issue),
            ("eventtitle", &self.event_title),
            ("eventlocation", &self.event_location),
            ("month", &self.month),
            ("day", &self.day),
            ("urldate", &self.accessed_date),
            ("medium", &self.medium),
            ("year", &self.year),
            ("volume", &self.volume),
            ("pages", &self.pages),
            ("doi", &self.doi),
            ("url", &self.url),
        ];
        for (name, value) in scalars {
            if let Some(value) = present(value) {
                fields.insert(name.to_string(), value.to_string());
            }
        }

        for (name, value) in &self.extra_fields {
            if !value.trim().is_empty() {
                fields
                    .entry(name.to_lowercase())
                    .or_insert_with(|| value.clone());
            }
        }
        fields
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Reference;

    /// The two-author journal article used across the formatter tests.
    pub(crate) fn journal_article() -> Reference {
        let mut reference = Reference::new("article", "doe2020deep");
        reference.authors = vec!["John Doe".into(), "Jane Smith".into()];
        reference.title = Some("Deep Learning for Everything".into());
        reference.journal = Some("Journal of Omniscience".into());
        reference.year = Some("2020".into());
        reference.volume = Some("42".into());
        reference.issue = Some("7".into());
        reference.pages = Some("1-10".into());
        reference.doi = Some("10.1000/j.jo.2020.01.001".into());
        reference
    }

    /// A reference with `count` authors named "First{i} Last{i}".
    pub(crate) fn with_authors(count: usize) -> Reference {
        let mut reference = journal_article();
        reference.authors = (1..=count).map(|i| format!("First{i} Last{i}")).collect();
        reference
    }
}
