//! Style lookup and parse-then-format conversion.

use crate::error::{CitationError, ConversionStage};
use crate::{CitationParser, Reference, Result, Style};

/// Format `reference` in the named style.
///
/// Style names are case-insensitive; `apa` and `apa6` select APA 6th
/// edition and `apa7` the 7th.
///
/// # Errors
///
/// Returns [`CitationError::UnsupportedStyle`] for an unknown style name.
pub fn format_reference(style: &str, reference: &Reference) -> Result<String> {
    let style: Style = style.parse()?;
    Ok(style.format(reference))
}

/// Parse citation text written in the named style.
///
/// # Errors
///
/// Returns [`CitationError::UnsupportedStyle`] for an unknown style name and
/// [`CitationError::Parse`] when the text lacks one of the style's anchors.
pub fn parse_citation(style: &str, text: &str) -> Result<Reference> {
    let style: Style = style.parse()?;
    Ok(style.citation_format().parse(text)?)
}

/// Parse `text` as `from_style` and format the result as `to_style`.
///
/// # Errors
///
/// Returns [`CitationError::Conversion`] naming the failed stage, with the
/// underlying error as its source.
///
/// # Examples
///
/// ```
/// use citeswap::convert_citation;
///
/// let ieee = "J. Doe, \"A Study,\" Nature, vol. 1, 2001.";
/// let mla = convert_citation("ieee", "mla", ieee)?;
/// assert_eq!(mla, "Doe, J. \"A Study.\" *Nature*, vol. 1, 2001.");
/// # Ok::<(), citeswap::CitationError>(())
/// ```
pub fn convert_citation(from_style: &str, to_style: &str, text: &str) -> Result<String> {
    tracing::debug!("Converting citation from {from_style} to {to_style}");
    let reference = parse_citation(from_style, text)
        .map_err(|e| conversion_error(ConversionStage::Parse, from_style, e))?;
    format_reference(to_style, &reference)
        .map_err(|e| conversion_error(ConversionStage::Format, to_style, e))
}

/// Parse `text` as `style` and serialize the result as a BibTeX entry.
///
/// # Errors
///
/// Returns [`CitationError::Conversion`] when the citation cannot be parsed.
#[cfg(feature = "bibtex")]
pub fn citation_to_bibtex(style: &str, text: &str) -> Result<String> {
    tracing::debug!("Converting {style} citation to BibTeX");
    let reference =
        parse_citation(style, text).map_err(|e| conversion_error(ConversionStage::Parse, style, e))?;
    Ok(crate::reference_to_bibtex(&reference))
}

fn conversion_error(stage: ConversionStage, style: &str, source: CitationError) -> CitationError {
    CitationError::Conversion {
        stage,
        style: style.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::fixtures::journal_article;
    use crate::style::SUPPORTED_STYLES;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_format_reference_is_case_insensitive() {
        let reference = journal_article();
        assert_eq!(
            format_reference("APA", &reference).unwrap(),
            format_reference("apa6", &reference).unwrap()
        );
        assert_eq!(
            format_reference(" Vancouver ", &reference).unwrap(),
            crate::vancouver::format_vancouver(&reference)
        );
    }

    #[test]
    fn test_unsupported_style() {
        let err = format_reference("unsupported", &journal_article()).unwrap_err();
        assert!(matches!(err, CitationError::UnsupportedStyle { ref style } if style == "unsupported"));
        let message = err.to_string();
        for style in SUPPORTED_STYLES {
            assert!(message.contains(style), "{message} should list {style}");
        }
    }

    #[rstest]
    #[case("apa6")]
    #[case("apa7")]
    #[case("ieee")]
    #[case("mla")]
    #[case("chicago")]
    #[case("vancouver")]
    fn test_same_style_round_trip(#[case] style: &str) {
        let original = journal_article();
        let citation = format_reference(style, &original).unwrap();
        let parsed = parse_citation(style, &citation).unwrap();

        assert_eq!(parsed.year, original.year, "{style}: {citation}");
        assert_eq!(parsed.volume, original.volume, "{style}: {citation}");
        assert_eq!(parsed.issue, original.issue, "{style}: {citation}");
        assert_eq!(parsed.doi, original.doi, "{style}: {citation}");
        assert_eq!(
            parsed.title.map(|t| t.to_lowercase()),
            original.title.map(|t| t.to_lowercase()),
            "{style}: {citation}"
        );
        assert_eq!(
            parsed.journal.map(|j| j.to_lowercase()),
            original.journal.map(|j| j.to_lowercase()),
            "{style}: {citation}"
        );
        assert_eq!(parsed.authors.len(), 2, "{style}: {citation}");
    }

    #[test]
    fn test_conversion_symmetry() {
        let apa = format_reference("apa", &journal_article()).unwrap();
        let ieee = convert_citation("apa", "ieee", &apa).unwrap();
        assert_eq!(convert_citation("ieee", "apa", &ieee).unwrap(), apa);
    }

    #[rstest]
    #[case("apa", "ieee", "no anchors", "Failed to parse citation as apa style")]
    #[case("mla", "ieee", "", "Failed to parse citation as mla style: Error in MLA format: Empty input")]
    #[case("harvard", "ieee", "x", "Failed to parse citation as harvard style: Unsupported style")]
    #[case("ieee", "harvard", "\"T,\" J, 2001.", "Failed to format citation as harvard style")]
    fn test_conversion_errors_name_the_stage(
        #[case] from: &str,
        #[case] to: &str,
        #[case] text: &str,
        #[case] prefix: &str,
    ) {
        let err = convert_citation(from, to, text).unwrap_err();
        assert!(matches!(err, CitationError::Conversion { .. }));
        assert!(err.to_string().starts_with(prefix), "{err}");
    }

    #[test]
    fn test_citation_to_bibtex() {
        let apa = format_reference("apa7", &journal_article()).unwrap();
        let bibtex = citation_to_bibtex("apa7", &apa).unwrap();
        assert!(bibtex.starts_with("@article{doe2020deeplearningforeverything,\n"));
        assert!(bibtex.contains("  number = {7},\n"));
        assert!(bibtex.contains("  doi = {10.1000/j.jo.2020.01.001}\n"));
    }
}
