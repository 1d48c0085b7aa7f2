//! Scripture reference parsing.

use std::fmt;
use std::sync::LazyLock;

use gospel_store::schema::make_citation;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::books::BookNameNormalizer;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([1-3]?\s?[A-Za-z&. \-]+?)\s+(\d+):(\d+)(?:-(\d+))?\s*$")
        .unwrap_or_else(|err| panic!("reference pattern must compile: {err}"))
});

/// A parsed citation: book, chapter, and an inclusive verse range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureReference {
    pub book: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
}

impl ScriptureReference {
    /// Number of verses after the first one.
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.verse_end.saturating_sub(self.verse_start)
    }

    #[must_use]
    pub fn citation(&self) -> String {
        make_citation(&self.book, self.chapter, self.verse_start, self.verse_end)
    }
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.citation())
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Rejects chapter or starting verse of zero.
    pub require_positive: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_positive: true,
        }
    }
}

/// Parses citations like `John 3:16`, `1 Nephi 3:7`, or `D&C 76:22-24`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceParser {
    options: ParseOptions,
}

impl ReferenceParser {
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parses `input`, returning `None` when it is not a well-formed reference.
    #[must_use]
    pub fn parse(&self, input: &str) -> Option<ScriptureReference> {
        let normalized = normalize_dashes(input);
        let captures = REFERENCE_PATTERN.captures(&normalized)?;

        let book = BookNameNormalizer::normalize(captures.get(1)?.as_str());
        if book.is_empty() {
            return None;
        }
        let chapter: u32 = captures.get(2)?.as_str().parse().ok()?;
        let verse_start: u32 = captures.get(3)?.as_str().parse().ok()?;
        let verse_end = match captures.get(4) {
            Some(end) => end.as_str().parse().ok()?,
            None => verse_start,
        };

        if verse_end < verse_start {
            return None;
        }
        if self.options.require_positive && (chapter == 0 || verse_start == 0) {
            return None;
        }

        Some(ScriptureReference {
            book,
            chapter,
            verse_start,
            verse_end,
        })
    }
}

/// Parses with the default (strict) options.
#[must_use]
pub fn parse(input: &str) -> Option<ScriptureReference> {
    ReferenceParser::default().parse(input)
}

/// Replaces figure/en/em dashes, the horizontal bar, and the minus sign with `-`.
fn normalize_dashes(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '\u{2012}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(book: &str, chapter: u32, verse_start: u32, verse_end: u32) -> ScriptureReference {
        ScriptureReference {
            book: book.to_string(),
            chapter,
            verse_start,
            verse_end,
        }
    }

    #[test]
    fn parses_single_verse() {
        assert_eq!(parse("John 3:16"), Some(reference("John", 3, 16, 16)));
    }

    #[test]
    fn parses_numbered_book() {
        assert_eq!(parse("1 Nephi 3:7"), Some(reference("1 Nephi", 3, 7, 7)));
    }

    #[test]
    fn parses_verse_range_and_rejects_reversed_range() {
        let parsed = parse("Alma 32:27-28").expect("range should parse");
        assert_eq!(parsed.verse_end, 28);
        assert_eq!(parsed.span(), 1);
        assert_eq!(parse("Alma 32:28-27"), None);
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(parse("not a reference"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("faith hope charity"), None);
    }

    #[test]
    fn en_dash_parses_like_hyphen() {
        let hyphen = parse("D&C 76:22-24").expect("hyphen range should parse");
        let en_dash = parse("D&C 76:22\u{2013}24").expect("en dash range should parse");
        let minus = parse("D&C 76:22\u{2212}24").expect("minus sign range should parse");
        assert_eq!(hyphen, en_dash);
        assert_eq!(hyphen, minus);
        assert_eq!(hyphen.book, "Doctrine and Covenants");
    }

    #[test]
    fn normalizes_abbreviated_book() {
        assert_eq!(parse("Gen. 1:1"), Some(reference("Genesis", 1, 1, 1)));
        assert_eq!(parse("  jn 3:16 "), Some(reference("John", 3, 16, 16)));
    }

    #[test]
    fn hyphenated_book_names_parse() {
        let expected = Some(reference("Joseph Smith\u{2014}History", 1, 17, 17));
        assert_eq!(parse("JS-H 1:17"), expected);
        assert_eq!(parse("Joseph Smith\u{2014}History 1:17"), expected);
    }

    #[test]
    fn unknown_book_passes_through() {
        assert_eq!(parse("Unknownbook 2:3"), Some(reference("Unknownbook", 2, 3, 3)));
    }

    #[test]
    fn zero_chapter_depends_on_strictness() {
        assert_eq!(parse("Alma 0:5"), None);
        assert_eq!(parse("Alma 5:0"), None);

        let lenient = ReferenceParser::new(ParseOptions {
            require_positive: false,
        });
        assert_eq!(lenient.parse("Alma 0:5"), Some(reference("Alma", 0, 5, 5)));
    }

    #[test]
    fn citation_omits_end_for_single_verse() {
        assert_eq!(reference("Alma", 32, 21, 21).citation(), "Alma 32:21");
        assert_eq!(reference("Alma", 32, 27, 28).to_string(), "Alma 32:27-28");
    }
}
