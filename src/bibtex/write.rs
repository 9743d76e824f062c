//! BibTeX entry serialization.

use crate::Reference;
use crate::utils::generate_cite_key;
use itertools::Itertools;
use std::borrow::Cow;

/// Fields written first, in this order; everything else follows sorted by name.
const FIELD_ORDER: [&str; 11] = [
    "author",
    "title",
    "journal",
    "booktitle",
    "publisher",
    "year",
    "volume",
    "number",
    "pages",
    "doi",
    "url",
];

/// Serialize a reference as a BibTeX entry.
///
/// Values are always brace-delimited; a value whose braces do not pair up
/// has them escaped as `\{` and `\}`. A blank cite key is replaced by a
/// generated one and a blank entry type by `misc`.
///
/// # Examples
///
/// ```
/// use citeswap::{Reference, reference_to_bibtex};
///
/// let mut reference = Reference::new("book", "plato");
/// reference.title = Some("The Republic".into());
/// reference.year = Some("1999".into());
/// assert_eq!(
///     reference_to_bibtex(&reference),
///     "@book{plato,\n  title = {The Republic},\n  year = {1999}\n}"
/// );
/// ```
pub fn reference_to_bibtex(reference: &Reference) -> String {
    let mut fields = reference.bibtex_fields();
    let ordered = FIELD_ORDER
        .iter()
        .filter_map(|name| fields.remove_entry(*name))
        .collect::<Vec<_>>();

    let entry_type = match reference.entry_type.trim() {
        "" => "misc",
        entry_type => entry_type,
    };
    let cite_key = match reference.cite_key.trim() {
        "" => generate_cite_key(
            &reference.authors,
            reference.year.as_deref(),
            reference.title.as_deref(),
        ),
        cite_key => cite_key.to_string(),
    };

    let body = ordered
        .into_iter()
        .chain(fields)
        .map(|(name, value)| format!("  {name} = {{{}}}", escape_braces(&value)))
        .join(",\n");
    if body.is_empty() {
        format!("@{entry_type}{{{cite_key},}}")
    } else {
        format!("@{entry_type}{{{cite_key},\n{body}\n}}")
    }
}

fn escape_braces(value: &str) -> Cow<'_, str> {
    if braces_balanced(value) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.replace('{', "\\{").replace('}', "\\}"))
    }
}

/// Whether the value reads back as a single braced group.
fn braces_balanced(value: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some('{' | '}')) => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
