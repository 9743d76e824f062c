//! BibTeX entry data structures.
//!
//! The scanner collects raw `name = value` pairs into [`RawBibtexEntry`];
//! the conversion into [`Reference`] decides what each field means.
//!
//! - **Last-wins**: a repeated field name keeps its final value
//! - **Blank is absent**: empty values never populate a field
//! - **`number`** is an issue for journal-like entries and a report number
//!   for reports

use crate::Reference;
use crate::utils::non_empty;
use std::collections::BTreeMap;

/// Structured raw data from a single BibTeX entry.
#[derive(Debug, Clone)]
pub(crate) struct RawBibtexEntry {
    /// Entry type as written, e.g. `article`.
    pub(crate) entry_type: String,
    pub(crate) cite_key: String,
    /// Lowercased field names and cleaned values.
    pub(crate) fields: BTreeMap<String, String>,
}

impl RawBibtexEntry {
    pub(crate) fn new(entry_type: &str, cite_key: &str) -> Self {
        Self {
            entry_type: entry_type.to_string(),
            cite_key: cite_key.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field, replacing any earlier value of the same name.
    pub(crate) fn add_field(&mut self, name: String, value: String) {
        if let Some(previous) = self.fields.insert(name, value) {
            tracing::trace!("BibTeX field repeated; dropping earlier value {previous:?}");
        }
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name).and_then(|value| non_empty(&value))
    }

    /// Remove a name-list field, split on " and ".
    fn take_names(&mut self, name: &str) -> Vec<String> {
        self.take(name)
            .map(|names| names.split(" and ").filter_map(non_empty).collect())
            .unwrap_or_default()
    }

    fn has(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// Decide whether `number` is an issue (`true`) or a report number.
    fn number_is_issue(&self) -> bool {
        let entry_type = self.entry_type.to_lowercase();
        if self.has("journal")
            || matches!(entry_type.as_str(), "article" | "inproceedings" | "incollection")
        {
            return true;
        }
        !(matches!(entry_type.as_str(), "techreport" | "report") || self.has("institution"))
    }
}

impl From<RawBibtexEntry> for Reference {
    fn from(mut raw: RawBibtexEntry) -> Self {
        let number_is_issue = raw.number_is_issue();
        let mut reference = Reference::new(raw.entry_type.clone(), raw.cite_key.clone());

        reference.authors = raw.take_names("author");
        reference.editors = raw.take_names("editor");
        reference.title = raw.take("title");
        reference.journal = raw.take("journal");
        reference.booktitle = raw.take("booktitle");
        reference.publisher = raw.take("publisher");
        reference.place = raw.take("address");
        reference.institution = raw.take("institution");
        reference.edition = raw.take("edition");
        reference.month = raw.take("month");
        reference.day = raw.take("day");
        reference.accessed_date = raw.take("urldate");
        reference.medium = raw.take("medium");
        reference.event_title = raw.take("eventtitle");
        reference.event_location = raw.take("eventlocation");
        reference.year = raw.take("year");
        reference.volume = raw.take("volume");
        reference.pages = raw.take("pages");
        reference.doi = raw.take("doi");
        reference.url = raw.take("url");

        if let Some(number) = raw.take("number") {
            let reading = if number_is_issue { "issue" } else { "report number" };
            tracing::debug!(
                "BibTeX number {number:?} of {} entry read as {reading}",
                raw.entry_type
            );
            if number_is_issue {
                reference.issue = Some(number);
            } else {
                reference.report_number = Some(number);
            }
        }

        reference.extra_fields = raw
            .fields
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        reference
    }
}
