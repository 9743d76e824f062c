//! Citation styles and their dispatch to formatters and parsers.

use crate::{CitationError, CitationFormat, Reference, apa, chicago, ieee, mla, vancouver};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Style tokens accepted by [`Style::from_str`], in sorted order.
pub const SUPPORTED_STYLES: &[&str] = &["apa", "apa6", "apa7", "chicago", "ieee", "mla", "vancouver"];

/// A citation style that a [`Reference`] can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// APA 6th edition
    Apa6,
    /// APA 7th edition
    Apa7,
    Ieee,
    /// MLA 9th edition Works Cited
    Mla,
    /// Chicago author-date
    Chicago,
    /// Vancouver / NLM
    Vancouver,
}

impl Style {
    /// All styles, in declaration order.
    pub const ALL: [Style; 6] = [
        Style::Apa6,
        Style::Apa7,
        Style::Ieee,
        Style::Mla,
        Style::Chicago,
        Style::Vancouver,
    ];

    /// Canonical lowercase token for the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Apa6 => "apa6",
            Style::Apa7 => "apa7",
            Style::Ieee => "ieee",
            Style::Mla => "mla",
            Style::Chicago => "chicago",
            Style::Vancouver => "vancouver",
        }
    }

    /// Render a reference in this style.
    pub fn format(&self, reference: &Reference) -> String {
        match self {
            Style::Apa6 => apa::format_apa(reference),
            Style::Apa7 => apa::format_apa7(reference),
            Style::Ieee => ieee::format_ieee(reference),
            Style::Mla => mla::format_mla(reference),
            Style::Chicago => chicago::format_chicago(reference),
            Style::Vancouver => vancouver::format_vancouver(reference),
        }
    }

    /// The grammar used to parse citations written in this style.
    pub fn citation_format(&self) -> CitationFormat {
        match self {
            Style::Apa6 | Style::Apa7 => CitationFormat::Apa,
            Style::Ieee => CitationFormat::Ieee,
            Style::Mla => CitationFormat::Mla,
            Style::Chicago => CitationFormat::Chicago,
            Style::Vancouver => CitationFormat::Vancouver,
        }
    }
}

impl FromStr for Style {
    type Err = CitationError;

    /// Case-insensitive lookup; `apa` is an alias of `apa6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apa" | "apa6" => Ok(Style::Apa6),
            "apa7" => Ok(Style::Apa7),
            "ieee" => Ok(Style::Ieee),
            "mla" => Ok(Style::Mla),
            "chicago" => Ok(Style::Chicago),
            "vancouver" => Ok(Style::Vancouver),
            _ => Err(CitationError::UnsupportedStyle {
                style: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
