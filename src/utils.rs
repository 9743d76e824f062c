use crate::reference::present;
use crate::regex::{Captures, Regex};
use crate::{CitationFormat, ParseError, Reference, ValueError};
use compact_str::CompactString;
use either::{Either, Left, Right};
use itertools::Itertools;
use std::sync::LazyLock;

static DOI_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:dx\.)?doi\.org/(.+)$").unwrap());

static TRAILING_LOCATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(https?://\S+|(?:doi:\s*)?10\.\S+)$").unwrap());

/// Suffixes after which a sentence needs no extra period.
const TERMINALS: [&str; 9] = [".", "!", "?", ".\"", "!\"", "?\"", ".'", "!'", "?'"];

/// Splits a name into its surname and the given-name tokens.
///
/// Text before a comma is the surname; without a comma the final
/// whitespace-separated token is.
///
/// # Examples
///
/// "Doe, John Q." gives ("Doe", ["John", "Q."]) and "John Doe" gives
/// ("Doe", ["John"]).
pub fn name_parts(name: &str) -> (&str, Vec<&str>) {
    let raw = name.trim();
    if raw.is_empty() {
        return ("", Vec::new());
    }
    if let Some((last, given)) = raw.split_once(',') {
        return (last.trim(), given.split_whitespace().collect());
    }
    let mut parts: Vec<&str> = raw.split_whitespace().collect();
    let last = parts.pop().unwrap_or_default();
    (last, parts)
}

/// Like [`name_parts`], with each given name reduced to an initial such as `J.`.
pub fn split_name_with_initials(name: &str) -> (&str, Vec<CompactString>) {
    let (last, given) = name_parts(name);
    let initials = given.into_iter().filter_map(initial_of).collect();
    (last, initials)
}

fn initial_of(part: &str) -> Option<CompactString> {
    let first = part.chars().next()?;
    let mut initial: CompactString = first.to_uppercase().collect();
    initial.push('.');
    Some(initial)
}

/// Formats a full name as "Given Last", or "Last, Given" when inverted.
pub fn format_name(name: &str, invert: bool) -> String {
    let (last, given) = name_parts(name);
    if last.is_empty() {
        return name.trim().to_string();
    }
    let given = given.join(" ");
    match (given.is_empty(), invert) {
        (true, _) => last.to_string(),
        (false, true) => format!("{last}, {given}"),
        (false, false) => format!("{given} {last}"),
    }
}

/// Authors as "Last, I. I.", falling back to the raw name when no surname
/// can be found.
pub fn author_initials(authors: &[&str]) -> Vec<String> {
    authors
        .iter()
        .map(|author| {
            let (last, initials) = split_name_with_initials(author);
            match (last.is_empty(), initials.is_empty()) {
                (true, _) => author.trim().to_string(),
                (false, true) => last.to_string(),
                (false, false) => format!("{}, {}", last, initials.iter().join(" ")),
            }
        })
        .collect()
}

/// How a style joins and truncates its author list.
#[derive(Debug, Clone, Copy)]
pub struct AuthorListStyle {
    /// Render the first author as "Last, First"
    pub invert_first: bool,
    pub conjunction: &'static str,
    /// Placed between all names but the last pair
    pub separator: &'static str,
    /// Placed before the conjunction; empty for "A and B"
    pub final_separator: &'static str,
    pub max_names: Option<usize>,
    pub et_al: &'static str,
    /// Collapse to "First, et al." instead of keeping `max_names` names
    pub et_al_after_first: bool,
    pub et_al_separator: &'static str,
}

/// Joins author names according to `style`.
pub fn format_author_list(authors: &[&str], style: &AuthorListStyle) -> String {
    let mut formatted: Vec<String> = authors
        .iter()
        .enumerate()
        .map(|(index, name)| format_name(name, style.invert_first && index == 0))
        .filter(|name| !name.is_empty())
        .collect();

    if let Some(max) = style.max_names
        && formatted.len() > max
    {
        if style.et_al_after_first {
            return format!("{}{}{}", formatted[0], style.et_al_separator, style.et_al)
                .trim()
                .to_string();
        }
        formatted.truncate(max);
        formatted.push(style.et_al.to_string());
    }

    let tail = if style.final_separator.is_empty() {
        format!(" {} ", style.conjunction)
    } else {
        format!("{} {} ", style.final_separator, style.conjunction)
    };
    match formatted.split_last() {
        None => String::new(),
        Some((only, [])) => only.clone(),
        Some((last, body)) => {
            let body = body.join(&format!("{} ", style.separator));
            format!("{body}{tail}{last}")
        }
    }
}

/// Picks the locator for a reference: DOI before URL.
///
/// A bare `10.` DOI is prefixed with `doi_prefix`, separated by a space
/// unless the prefix already ends in a space, colon, or slash. A DOI that is
/// already a URL is returned unchanged.
pub fn preferred_locator(reference: &Reference, doi_prefix: &str) -> Option<String> {
    if let Some(doi) = present(&reference.doi) {
        let doi = doi.trim();
        let lowered = doi.to_lowercase();
        if lowered.starts_with("10.") && !doi_prefix.is_empty() {
            let glue = if doi_prefix.ends_with([' ', ':', '/']) {
                ""
            } else {
                " "
            };
            return Some(format!("{doi_prefix}{glue}{doi}"));
        }
        return Some(doi.to_string());
    }
    present(&reference.url).map(str::to_string)
}

/// Replaces a hyphen between two digits with an en dash.
pub fn normalize_page_range(pages: &str) -> String {
    let chars: Vec<char> = pages.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if c == '-' && between_digits { '–' } else { c }
        })
        .collect()
}

/// The reference's page range with en dashes, if it has one.
pub fn page_range(reference: &Reference) -> Option<String> {
    present(&reference.pages).map(normalize_page_range)
}

/// Applies `f` to each word of the trimmed text, keeping whitespace runs.
fn map_words(text: &str, mut f: impl FnMut(usize, &str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text.trim();
    let mut index = 0;
    while !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        out.push_str(&f(index, word));
        index += 1;
        let gap = tail.find(|c: char| !c.is_whitespace()).unwrap_or(tail.len());
        out.push_str(&tail[..gap]);
        rest = &tail[gap..];
    }
    out
}

fn capitalize(word: &str, lower_rest: bool) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let rest = chars.as_str();
            let rest = if lower_rest {
                rest.to_lowercase()
            } else {
                rest.to_string()
            };
            first.to_uppercase().chain(rest.chars()).collect()
        }
    }
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Capitalizes the first word and lowercases the rest, keeping acronyms.
pub fn sentence_case(text: &str) -> String {
    map_words(text, |index, word| match index {
        0 => capitalize(word, true),
        _ if is_all_caps(word) => word.to_string(),
        _ => word.to_lowercase(),
    })
}

/// Capitalizes the first letter of every word.
pub fn title_case(text: &str) -> String {
    map_words(text, |_, word| capitalize(word, false))
}

fn ends_with_terminal(text: &str) -> bool {
    TERMINALS.iter().any(|t| text.ends_with(t))
}

/// Joins pieces as sentences: ". " between them unless the previous piece
/// already ends a sentence, and a closing period if needed.
pub fn join_with_period<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut sentence = String::new();
    for part in parts.into_iter().map(str::trim).filter(|p| !p.is_empty()) {
        if !sentence.is_empty() {
            sentence.push_str(if ends_with_terminal(&sentence) { " " } else { ". " });
        }
        sentence.push_str(part);
    }
    if !sentence.is_empty() && !sentence.ends_with(['.', '!', '?', '"']) {
        sentence.push('.');
    }
    sentence
}

/// Joins the non-empty pieces with `separator`.
pub fn join_clauses<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .join(separator)
}

/// Appends a period unless the text already ends with one.
pub fn close_sentence(text: &str) -> String {
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

fn slug(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Builds a cite key from the first author's surname, the year, and the title.
///
/// Missing parts fall back to `anon` and `nd`; the key is not guaranteed to
/// be unique.
pub fn generate_cite_key(authors: &[String], year: Option<&str>, title: Option<&str>) -> String {
    let surname = authors
        .iter()
        .map(|a| a.trim())
        .find(|a| !a.is_empty())
        .map(|a| match a.split_once(',') {
            Some((last, _)) => last.trim(),
            None => a.split_whitespace().last().unwrap_or_default(),
        })
        .filter(|s| !s.is_empty())
        .unwrap_or("anon");
    let year = year.map(str::trim).filter(|y| !y.is_empty()).unwrap_or("nd");
    let key = format!("{}{}{}", slug(surname), slug(year), slug(title.unwrap_or_default()));
    if key.is_empty() {
        "reference".to_string()
    } else {
        key
    }
}

/// Trims the input, rejecting blank text.
pub(crate) fn trimmed_input(text: &str, format: CitationFormat) -> Result<&str, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::without_position(format, ValueError::Empty));
    }
    Ok(trimmed)
}

/// A named capture group, trimmed, if it matched something.
pub(crate) fn capture(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Returns the trimmed text as an owned value if it is not empty.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Classifies a locator as a DOI (`Left`) or a URL (`Right`).
///
/// `doi:` prefixes and `doi.org` resolver URLs both yield the bare DOI. A
/// trailing sentence period is not part of the locator.
pub fn classify_locator(locator: &str) -> Option<Either<String, String>> {
    let locator = locator.trim().trim_end_matches('.');
    if locator.is_empty() {
        return None;
    }
    if locator.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("doi:")) {
        return non_empty(&locator[4..]).map(Left);
    }
    if locator.starts_with("10.") {
        return Some(Left(locator.to_string()));
    }
    if let Some(doi) = DOI_URL_REGEX.captures(locator).and_then(|c| c.get(1)) {
        return Some(Left(doi.as_str().to_string()));
    }
    if locator.to_lowercase().starts_with("http") {
        return Some(Right(locator.to_string()));
    }
    None
}

/// Splits a DOI or URL off the end of a citation, returning the rest.
pub(crate) fn split_trailing_locator(text: &str) -> (&str, Option<Either<String, String>>) {
    let text = text.trim_end();
    match TRAILING_LOCATOR_REGEX.find(text) {
        Some(m) => (text[..m.start()].trim_end(), classify_locator(m.as_str())),
        None => (text, None),
    }
}

/// Spreads a classified locator over `(doi, url)`.
pub(crate) fn locator_fields(
    locator: Option<Either<String, String>>,
) -> (Option<String>, Option<String>) {
    (locator.clone().and_then(Either::left), locator.and_then(Either::right))
}

/// Removes a trailing "et al." from an author list.
pub(crate) fn strip_et_al(segment: &str) -> &str {
    let segment = segment.trim();
    match segment.strip_suffix("et al.").or_else(|| segment.strip_suffix("et al")) {
        Some(rest) => rest.trim_end().trim_end_matches(',').trim_end(),
        None => segment,
    }
}

/// Drops the period closing the author sentence, unless it belongs to a
/// trailing initial ("Doe, J.").
fn strip_sentence_period(segment: &str) -> &str {
    let segment = segment.trim();
    match segment.strip_suffix('.') {
        Some(rest) if !ends_with_initial(rest) => rest.trim_end(),
        _ => segment,
    }
}

fn ends_with_initial(text: &str) -> bool {
    let last_word = text.rsplit([' ', ',', '.']).next().unwrap_or_default();
    let mut chars = last_word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// Parses an author list whose first name is inverted, as written by the
/// MLA and Chicago formatters: "Doe, John, Jane Roe, and Bo Li".
pub(crate) fn split_inverted_authors(segment: &str) -> Vec<String> {
    let segment = strip_et_al(strip_sentence_period(segment));
    if segment.is_empty() {
        return Vec::new();
    }
    let segment = segment.replace(", and ", " and ");
    let mut groups = segment.split(" and ").map(str::trim);
    let head = groups.next().unwrap_or_default();

    let mut authors = Vec::new();
    let mut head_parts = head.split(',').map(str::trim).filter(|p| !p.is_empty());
    match (head_parts.next(), head_parts.next()) {
        (Some(last), Some(given)) => authors.push(format!("{last}, {given}")),
        (Some(only), None) => authors.push(only.to_string()),
        _ => {}
    }
    authors.extend(head_parts.map(str::to_string));
    authors.extend(groups.filter(|g| !g.is_empty()).map(str::to_string));
    authors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const MLA_LIKE: AuthorListStyle = AuthorListStyle {
        invert_first: true,
        conjunction: "and",
        separator: ",",
        final_separator: ",",
        max_names: Some(2),
        et_al: "et al.",
        et_al_after_first: true,
        et_al_separator: ", ",
    };

    #[rstest]
    #[case("", "", &[])]
    #[case("John Doe", "Doe", &["J."])]
    #[case("Doe, John Quincy", "Doe", &["J.", "Q."])]
    #[case("doe, jane", "doe", &["J."])]
    #[case("Plato", "Plato", &[])]
    #[case("  Smith-Jones,   Ann  ", "Smith-Jones", &["A."])]
    fn test_split_name_with_initials(
        #[case] name: &str,
        #[case] last: &str,
        #[case] initials: &[&str],
    ) {
        let (found_last, found_initials) = split_name_with_initials(name);
        assert_eq!(found_last, last);
        assert_eq!(found_initials, initials.to_vec());
    }

    #[rstest]
    #[case("John Doe", false, "John Doe")]
    #[case("John Doe", true, "Doe, John")]
    #[case("Doe, John", false, "John Doe")]
    #[case("Plato", true, "Plato")]
    #[case("   ", true, "")]
    fn test_format_name(#[case] name: &str, #[case] invert: bool, #[case] expected: &str) {
        assert_eq!(format_name(name, invert), expected);
    }

    #[test]
    fn test_author_initials() {
        assert_eq!(
            author_initials(&["John Doe", "Smith, Jane Ann", "Plato"]),
            vec!["Doe, J.", "Smith, J. A.", "Plato"]
        );
    }

    #[rstest]
    #[case(&["John Doe"], "Doe, John")]
    #[case(&["John Doe", "Jane Smith"], "Doe, John, and Jane Smith")]
    #[case(&["John Doe", "Jane Smith", "Bo Li"], "Doe, John, et al.")]
    fn test_format_author_list_et_al_after_first(#[case] authors: &[&str], #[case] expected: &str) {
        assert_eq!(format_author_list(authors, &MLA_LIKE), expected);
    }

    #[test]
    fn test_format_author_list_keeps_max_names() {
        let style = AuthorListStyle {
            invert_first: false,
            final_separator: "",
            et_al_after_first: false,
            ..MLA_LIKE
        };
        assert_eq!(
            format_author_list(&["A One", "B Two", "C Three"], &style),
            "A One, B Two and et al."
        );
        assert_eq!(format_author_list(&["A One", "B Two"], &style), "A One and B Two");
    }

    #[test]
    fn test_format_author_list_three_names() {
        let style = AuthorListStyle {
            max_names: None,
            ..MLA_LIKE
        };
        assert_eq!(
            format_author_list(&["John Doe", "Jane Smith", "Bo Li"], &style),
            "Doe, John, Jane Smith, and Bo Li"
        );
        assert_eq!(format_author_list(&[], &style), "");
    }

    #[rstest]
    #[case(Some("10.1000/xyz"), None, "https://doi.org/", Some("https://doi.org/10.1000/xyz"))]
    #[case(Some("10.1000/xyz"), None, "doi: ", Some("doi: 10.1000/xyz"))]
    #[case(Some("10.1000/xyz"), None, "doi", Some("doi 10.1000/xyz"))]
    #[case(Some("10.1000/xyz"), None, "", Some("10.1000/xyz"))]
    #[case(Some("HTTPS://doi.org/10.1/a"), None, "doi:", Some("HTTPS://doi.org/10.1/a"))]
    #[case(Some("ark:/1234"), Some("https://x.org"), "doi:", Some("ark:/1234"))]
    #[case(None, Some("https://x.org"), "doi:", Some("https://x.org"))]
    #[case(Some(" "), None, "doi:", None)]
    fn test_preferred_locator(
        #[case] doi: Option<&str>,
        #[case] url: Option<&str>,
        #[case] prefix: &str,
        #[case] expected: Option<&str>,
    ) {
        let mut reference = Reference::default();
        reference.doi = doi.map(String::from);
        reference.url = url.map(String::from);
        assert_eq!(preferred_locator(&reference, prefix).as_deref(), expected);
    }

    #[test]
    fn test_preferred_locator_is_idempotent() {
        let mut reference = Reference::default();
        reference.doi = Some("10.1000/j.jo.2020.01.001".into());
        reference.url = Some("https://example.org".into());
        let first = preferred_locator(&reference, "https://doi.org/");
        let second = preferred_locator(&reference, "https://doi.org/");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("1-10", "1–10")]
    #[case("e1-e10", "e1-e10")]
    #[case("12", "12")]
    #[case("A-1", "A-1")]
    #[case("100-110, 200-210", "100–110, 200–210")]
    #[case("1–10", "1–10")]
    fn test_normalize_page_range(#[case] pages: &str, #[case] expected: &str) {
        assert_eq!(normalize_page_range(pages), expected);
    }

    #[rstest]
    #[case("Deep Learning for Everything", "Deep learning for everything")]
    #[case("the NASA Mission  to MARS", "The NASA mission  to MARS")]
    #[case("  padded title ", "Padded title")]
    #[case("", "")]
    fn test_sentence_case(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(sentence_case(text), expected);
    }

    #[rstest]
    #[case("deep learning for everything", "Deep Learning For Everything")]
    #[case("keeps iPhone casing", "Keeps IPhone Casing")]
    #[case("tabs\tstay", "Tabs\tStay")]
    fn test_title_case(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(title_case(text), expected);
    }

    #[test]
    fn test_join_with_period() {
        assert_eq!(join_with_period(["Doe, John", "2020", "Title"]), "Doe, John. 2020. Title.");
        assert_eq!(join_with_period(["n.d.", "\"Title.\"", ""]), "n.d. \"Title.\"");
        assert_eq!(join_with_period(["Is it?", "Yes"]), "Is it? Yes.");
        assert_eq!(join_with_period(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_join_clauses() {
        assert_eq!(join_clauses(["In Book", "", " (pp. 1–2) ", "Pub"], ", "), "In Book, (pp. 1–2), Pub");
    }

    #[rstest]
    #[case(&["John Doe"], Some("2020"), Some("Deep Learning!"), "doe2020deeplearning")]
    #[case(&["Doe, J."], None, Some("T"), "doendt")]
    #[case(&[], Some("1999"), None, "anon1999")]
    #[case(&["", "Jane Smith"], Some("2001"), None, "smith2001")]
    fn test_generate_cite_key(
        #[case] authors: &[&str],
        #[case] year: Option<&str>,
        #[case] title: Option<&str>,
        #[case] expected: &str,
    ) {
        let authors: Vec<String> = authors.iter().map(|a| a.to_string()).collect();
        assert_eq!(generate_cite_key(&authors, year, title), expected);
    }

    #[rstest]
    #[case("10.1000/xyz", Some(Left("10.1000/xyz")))]
    #[case("doi:10.1000/xyz.", Some(Left("10.1000/xyz")))]
    #[case("DOI: 10.1000/xyz", Some(Left("10.1000/xyz")))]
    #[case("https://doi.org/10.1000/xyz", Some(Left("10.1000/xyz")))]
    #[case("http://dx.doi.org/10.1000/xyz", Some(Left("10.1000/xyz")))]
    #[case("https://example.org/paper.", Some(Right("https://example.org/paper")))]
    #[case("pp. 1-10", None)]
    fn test_classify_locator(#[case] locator: &str, #[case] expected: Option<Either<&str, &str>>) {
        let expected = expected.map(|e| e.map_either(String::from, String::from));
        assert_eq!(classify_locator(locator), expected);
    }

    #[test]
    fn test_split_trailing_locator() {
        let (rest, locator) = split_trailing_locator("Journal, 4(2), 1–9. https://doi.org/10.1/x ");
        assert_eq!(rest, "Journal, 4(2), 1–9.");
        assert_eq!(locator_fields(locator), (Some("10.1/x".to_string()), None));

        let (rest, locator) = split_trailing_locator("Journal, 4(2), 1–9.");
        assert_eq!(rest, "Journal, 4(2), 1–9.");
        assert_eq!(locator, None);
    }

    #[rstest]
    #[case("Doe, John", &["Doe, John"])]
    #[case("Doe, John, and Jane Smith.", &["Doe, John", "Jane Smith"])]
    #[case("Doe, J., and J. Smith", &["Doe, J.", "J. Smith"])]
    #[case("Doe, John, Jane Smith, and Bo Li", &["Doe, John", "Jane Smith", "Bo Li"])]
    #[case("Doe, John, et al.", &["Doe, John"])]
    #[case("Plato", &["Plato"])]
    #[case("Doe, J.", &["Doe, J."])]
    #[case("Doe, J. R.", &["Doe, J. R."])]
    #[case("Doe, J.R.", &["Doe, J.R."])]
    #[case("Doe, John.", &["Doe, John"])]
    #[case("Doe, John, and J. Smith.", &["Doe, John", "J. Smith"])]
    #[case("", &[])]
    fn test_split_inverted_authors(#[case] segment: &str, #[case] expected: &[&str]) {
        assert_eq!(split_inverted_authors(segment), expected.to_vec());
    }
}
