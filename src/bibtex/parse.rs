//! Low-level scanning of a single BibTeX entry.
//!
//! Every structural failure is reported at a byte offset of the original
//! input, so line and column refer to what the caller passed in.

use crate::bibtex::structure::RawBibtexEntry;
use crate::error::fields;
use crate::{CitationFormat, ParseError, ValueError};
use itertools::Itertools;

const FORMAT: CitationFormat = CitationFormat::BibTex;

fn syntax_error(source: &str, offset: usize, message: impl Into<String>) -> ParseError {
    ParseError::at_offset(source, offset, FORMAT, ValueError::Syntax(message.into()))
}

/// Parse the text of one `@type{key, name = value, ...}` entry.
pub(crate) fn bibtex_parse(text: &str) -> Result<RawBibtexEntry, ParseError> {
    let Some(start) = text.find(|c: char| !c.is_whitespace()) else {
        return Err(ParseError::without_position(FORMAT, ValueError::Empty));
    };
    let end = text.trim_end().len();

    if !text[start..].starts_with('@') {
        return Err(syntax_error(text, start, "BibTeX entry must start with '@'"));
    }
    let Some(open) = text[start..end].find('{').map(|i| start + i) else {
        return Err(syntax_error(text, start, "Missing opening brace for entry"));
    };

    let entry_type = text[start + 1..open].trim();
    if entry_type.is_empty() {
        return Err(ParseError::at_offset(
            text,
            start + 1,
            FORMAT,
            ValueError::MissingValue {
                field: fields::ENTRY_TYPE,
                key: "entry type",
            },
        ));
    }

    if !text[open..end].ends_with('}') || end - open < 2 {
        return Err(syntax_error(text, end - 1, "BibTeX entry must end with '}'"));
    }
    let body_end = end - 1;
    let Some(comma) = text[open + 1..body_end].find(',').map(|i| open + 1 + i) else {
        return Err(syntax_error(text, body_end, "BibTeX entry is missing fields"));
    };

    let cite_key = text[open + 1..comma].trim();
    if cite_key.is_empty() {
        return Err(ParseError::at_offset(
            text,
            open + 1,
            FORMAT,
            ValueError::MissingValue {
                field: fields::CITE_KEY,
                key: "cite key",
            },
        ));
    }

    let mut entry = RawBibtexEntry::new(entry_type, cite_key);
    let mut scanner = FieldScanner {
        source: text,
        pos: comma + 1,
        end: body_end,
    };
    while let Some((name, value)) = scanner.next_field()? {
        entry.add_field(name, value);
    }
    Ok(entry)
}

/// Collapses newlines and whitespace runs to single spaces.
fn clean_value(value: &str) -> String {
    value.split_whitespace().join(" ")
}

/// Cursor over the field list between the cite key's comma and the entry's
/// closing brace.
struct FieldScanner<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
}

impl FieldScanner<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..self.end].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn next_field(&mut self) -> Result<Option<(String, String)>, ParseError> {
        self.skip_while(|c| c.is_whitespace() || c == ',');
        if self.peek().is_none() {
            return Ok(None);
        }

        let name_start = self.pos;
        self.skip_while(|c| c.is_alphanumeric() || c == '_' || c == '-');
        let name = self.source[name_start..self.pos].to_lowercase();
        if name.is_empty() {
            return Err(syntax_error(self.source, name_start, "Field name missing"));
        }

        self.skip_while(char::is_whitespace);
        if self.bump() != Some('=') {
            return Err(syntax_error(
                self.source,
                name_start,
                format!("Field '{name}' misses '=' sign"),
            ));
        }
        self.skip_while(char::is_whitespace);

        let value = match self.peek() {
            Some('{') => self.braced(&name)?,
            Some('"') => self.quoted(&name)?,
            _ => self.bare(),
        };
        Ok(Some((name, clean_value(&value))))
    }

    /// A `{...}` value; nested braces are kept verbatim and `\{`/`\}` are
    /// literal braces that do not change the depth.
    fn braced(&mut self, name: &str) -> Result<String, ParseError> {
        let open = self.pos;
        self.bump();
        let mut value = String::new();
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '\\' if matches!(self.peek(), Some('{' | '}')) => value.extend(self.bump()),
                '{' => {
                    depth += 1;
                    value.push(c);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                    value.push(c);
                }
                c => value.push(c),
            }
        }
        Err(self.unterminated(open, '{', name))
    }

    /// A `"..."` value; `\"` is an escaped quote.
    fn quoted(&mut self, name: &str) -> Result<String, ParseError> {
        let open = self.pos;
        self.bump();
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return Ok(value),
                '\\' => match self.bump() {
                    Some('"') => value.push('"'),
                    Some(escaped) => {
                        value.push('\\');
                        value.push(escaped);
                    }
                    None => break,
                },
                c => value.push(c),
            }
        }
        Err(self.unterminated(open, '"', name))
    }

    /// A bare token running to the next comma or line break.
    fn bare(&mut self) -> String {
        let start = self.pos;
        self.skip_while(|c| !matches!(c, ',' | '\n' | '\r'));
        self.source[start..self.pos].trim().to_string()
    }

    fn unterminated(&self, open: usize, delimiter: char, name: &str) -> ParseError {
        ParseError::at_offset(
            self.source,
            open,
            FORMAT,
            ValueError::Unterminated {
                delimiter,
                key: name.to_string(),
            },
        )
    }
}
