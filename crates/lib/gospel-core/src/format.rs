//! Rendering of store rows into ordered text blocks.

use gospel_store::models::{
    ConferenceSummary,
    ScriptureRow,
    SpeakerCountRow,
    TalkRow,
    TalkSummaryRow,
};
use serde::{Deserialize, Serialize};

use crate::planner::{InputError, SearchTerm};
use crate::reference::ScriptureReference;

const TRUNCATION_MARKER: &str =
    "...\n[Text truncated - call again with full=true for the complete talk]";

pub const USAGE_HINT: &str = "Provide one of: id (a specific talk), query (text search), speaker/conference/title/from/to (filters), or list=\"conferences\" / list=\"speakers\".";

const NO_TALKS_HINT: &str = "No talks found matching those criteria. Try loosening the speaker or conference filters, or call with list=\"conferences\" to see the available conferences.";

/// What a content value represents; empty results are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Results,
    NotFound,
    NoData,
    InvalidInput,
    Hint,
    Error,
}

/// Ordered text blocks returned to the caller. Header blocks precede bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedContent {
    pub kind: ContentKind,
    pub blocks: Vec<String>,
}

impl FormattedContent {
    fn new(kind: ContentKind, blocks: Vec<String>) -> Self {
        Self { kind, blocks }
    }

    fn single(kind: ContentKind, text: impl Into<String>) -> Self {
        Self::new(kind, vec![text.into()])
    }

    #[must_use]
    pub fn not_found(text: impl Into<String>) -> Self {
        Self::single(ContentKind::NotFound, text)
    }

    #[must_use]
    pub fn no_data(text: impl Into<String>) -> Self {
        Self::single(ContentKind::NoData, text)
    }

    #[must_use]
    pub fn invalid_input(err: &InputError) -> Self {
        Self::single(ContentKind::InvalidInput, err.to_string())
    }

    #[must_use]
    pub fn hint(text: impl Into<String>) -> Self {
        Self::single(ContentKind::Hint, text)
    }

    /// A caught failure, rendered as `Error: ...`.
    #[must_use]
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::single(ContentKind::Error, format!("Error: {message}"))
    }

    /// A failure to obtain the store connection, rendered as `DB init error: ...`.
    #[must_use]
    pub fn init_error(message: impl std::fmt::Display) -> Self {
        Self::single(ContentKind::Error, format!("DB init error: {message}"))
    }

    #[must_use]
    pub const fn is_results(&self) -> bool {
        matches!(self.kind, ContentKind::Results)
    }

    #[must_use]
    pub fn first_block(&self) -> Option<&str> {
        self.blocks.first().map(String::as_str)
    }
}

/// Citation header followed by one `verse text` line per verse.
#[must_use]
pub fn passage(reference: &ScriptureReference, rows: &[ScriptureRow]) -> FormattedContent {
    if rows.is_empty() {
        return FormattedContent::not_found(format!("No verses found for {reference}"));
    }
    let body = rows
        .iter()
        .map(|row| format!("{} {}", row.verse, row.text))
        .collect::<Vec<_>>()
        .join("\n");
    FormattedContent::new(ContentKind::Results, vec![reference.citation(), body])
}

/// One `citation – snippet` block per matching verse.
#[must_use]
pub fn keyword_hits(
    rows: &[ScriptureRow],
    term: &SearchTerm,
    lead: usize,
    window: usize,
) -> FormattedContent {
    if rows.is_empty() {
        return FormattedContent::not_found("No results found.");
    }
    let blocks = rows
        .iter()
        .map(|row| {
            format!(
                "{} \u{2013} {}",
                row.citation(),
                snippet(&row.text, term.as_str(), lead, window)
            )
        })
        .collect();
    FormattedContent::new(ContentKind::Results, blocks)
}

/// Citation header followed by the verse text.
#[must_use]
pub fn random_verse(row: Option<&ScriptureRow>) -> FormattedContent {
    row.map_or_else(
        || FormattedContent::no_data("No scriptures available."),
        |row| FormattedContent::new(ContentKind::Results, vec![row.citation(), row.text.clone()]),
    )
}

/// `speaker – title (conference, date)` header and the body, excerpted to
/// `excerpt_chars` unless `full` is set.
#[must_use]
pub fn talk(row: Option<&TalkRow>, full: bool, excerpt_chars: usize) -> FormattedContent {
    let Some(row) = row else {
        return FormattedContent::not_found("Talk not found.");
    };
    let truncated = !full && row.full_text.chars().count() > excerpt_chars;
    let mut header = format!(
        "{} \u{2013} {} ({}, {})",
        row.speaker,
        row.title,
        row.conference,
        row.date.as_deref().unwrap_or("undated")
    );
    let body = if truncated {
        let excerpt: String = row.full_text.chars().take(excerpt_chars).collect();
        format!("{excerpt}{TRUNCATION_MARKER}")
    } else {
        header.push_str(" (full)");
        row.full_text.clone()
    };
    FormattedContent::new(ContentKind::Results, vec![header, body])
}

/// One summary block per talk, tagged with its id for follow-up lookups.
#[must_use]
pub fn talk_summaries(rows: &[TalkSummaryRow]) -> FormattedContent {
    if rows.is_empty() {
        return FormattedContent::not_found(NO_TALKS_HINT);
    }
    let blocks = rows
        .iter()
        .map(|row| {
            let mut line = format!(
                "[ID: {}] {} \u{2013} {} ({}",
                row.talk_id, row.speaker, row.title, row.conference
            );
            if let Some(date) = row.date.as_deref() {
                line.push_str(", ");
                line.push_str(date);
            }
            line.push(')');
            if let Some(excerpt) = row.excerpt.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
                line.push('\n');
                line.push_str(excerpt);
                line.push_str("...");
            }
            line
        })
        .collect();
    FormattedContent::new(ContentKind::Results, blocks)
}

/// Corpus-wide conference totals shown above a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceOverview {
    pub total: usize,
    pub min_month: Option<String>,
    pub max_month: Option<String>,
    pub offset: usize,
}

#[must_use]
pub fn conference_listing(
    overview: &ConferenceOverview,
    page: &[ConferenceSummary],
) -> FormattedContent {
    if overview.total == 0 {
        return FormattedContent::no_data("No conferences available.");
    }
    let span = match (overview.min_month.as_deref(), overview.max_month.as_deref()) {
        (Some(min), Some(max)) => format!(", {min} to {max}"),
        _ => String::new(),
    };
    let mut blocks = vec![format!(
        "{} conferences{span}; showing {} from offset {}",
        overview.total,
        page.len(),
        overview.offset
    )];
    blocks.extend(page.iter().map(|row| {
        let month = row.first_month.as_deref().unwrap_or("unknown month");
        format!("{} ({month}) \u{2013} {} talks", row.conference, row.talks)
    }));
    FormattedContent::new(ContentKind::Results, blocks)
}

#[must_use]
pub fn speaker_listing(
    total: usize,
    conference: Option<&SearchTerm>,
    offset: usize,
    page: &[SpeakerCountRow],
) -> FormattedContent {
    if total == 0 {
        return match conference {
            Some(conference) => FormattedContent::not_found(format!(
                "No speakers found for conferences matching \"{conference}\"."
            )),
            None => FormattedContent::no_data("No speakers available."),
        };
    }
    let scope = conference
        .map(|conference| format!(" in conferences matching \"{conference}\""))
        .unwrap_or_default();
    let mut blocks = vec![format!(
        "{total} speakers{scope}; showing {} from offset {offset}",
        page.len()
    )];
    blocks.extend(
        page.iter()
            .map(|row| format!("{} \u{2013} {} talks", row.speaker, row.talks)),
    );
    FormattedContent::new(ContentKind::Results, blocks)
}

/// Context window around the first occurrence of `term`, or the leading
/// window when the term is not found verbatim.
#[must_use]
pub fn snippet(text: &str, term: &str, lead: usize, window: usize) -> String {
    let lowered: Vec<char> = text.to_lowercase().chars().collect();
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = term.chars().collect();

    // Lowercasing can change char counts for a few scripts; fall back to the
    // leading window rather than misalign.
    let position = if needle.is_empty() || lowered.len() != chars.len() {
        None
    } else {
        lowered
            .windows(needle.len())
            .position(|candidate| candidate == needle.as_slice())
    };

    let start = position.map_or(0, |index| index.saturating_sub(lead));
    let end = (start + window).min(chars.len());
    let mut out: String = chars[start..end].iter().collect();
    if end < chars.len() {
        out.push_str("...");
    }
    if start > 0 {
        out.insert_str(0, "...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::sanitize_term;

    fn verse(verse: u32, text: &str) -> ScriptureRow {
        ScriptureRow {
            book: "Alma".to_string(),
            chapter: 32,
            verse,
            text: text.to_string(),
        }
    }

    fn talk_row(full_text: &str) -> TalkRow {
        TalkRow {
            talk_id: 7,
            speaker: "Jeffrey R. Holland".to_string(),
            title: "Lord, I Believe".to_string(),
            conference: "April 2013".to_string(),
            date: Some("2013-04-06".to_string()),
            full_text: full_text.to_string(),
        }
    }

    #[test]
    fn passage_emits_citation_then_verses() {
        let reference = ScriptureReference {
            book: "Alma".to_string(),
            chapter: 32,
            verse_start: 27,
            verse_end: 28,
        };
        let content = passage(&reference, &[verse(27, "But behold"), verse(28, "Now, we will compare")]);
        assert!(content.is_results());
        assert_eq!(content.blocks, ["Alma 32:27-28", "27 But behold\n28 Now, we will compare"]);
    }

    #[test]
    fn empty_passage_is_not_found() {
        let reference = ScriptureReference {
            book: "Alma".to_string(),
            chapter: 99,
            verse_start: 1,
            verse_end: 1,
        };
        let content = passage(&reference, &[]);
        assert_eq!(content.kind, ContentKind::NotFound);
        assert_eq!(content.first_block(), Some("No verses found for Alma 99:1"));
    }

    #[test]
    fn random_verse_without_rows_is_no_data() {
        let content = random_verse(None);
        assert_eq!(content.kind, ContentKind::NoData);
        assert_eq!(content.blocks.len(), 1);
    }

    #[test]
    fn short_talk_is_marked_full() {
        let content = talk(Some(&talk_row("Brief.")), false, 1500);
        assert!(content.blocks[0].ends_with("(April 2013, 2013-04-06) (full)"));
        assert_eq!(content.blocks[1], "Brief.");
    }

    #[test]
    fn long_talk_is_excerpted_with_marker() {
        let body = "x".repeat(1600);
        let content = talk(Some(&talk_row(&body)), false, 1500);
        assert!(!content.blocks[0].contains("(full)"));
        assert!(content.blocks[1].starts_with(&"x".repeat(1500)));
        assert!(content.blocks[1].ends_with(TRUNCATION_MARKER));

        let full = talk(Some(&talk_row(&body)), true, 1500);
        assert_eq!(full.blocks[1].len(), 1600);
        assert!(full.blocks[0].ends_with("(full)"));
    }

    #[test]
    fn snippet_centers_on_match() {
        let text = format!("{}charity never faileth{}", "a".repeat(100), "b".repeat(300));
        let out = snippet(&text, "charity", 30, 160);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("..."));
        let inner = out.trim_start_matches("...").trim_end_matches("...");
        assert_eq!(inner.chars().count(), 160);
        assert!(inner.starts_with(&"a".repeat(30)));
        assert!(inner.contains("charity never faileth"));
    }

    #[test]
    fn keyword_hits_render_one_block_per_row() {
        let term = sanitize_term("Faith");
        let content = keyword_hits(&[verse(21, "faith is not to have a perfect knowledge")], &term, 30, 160);
        assert_eq!(content.blocks, ["Alma 32:21 \u{2013} faith is not to have a perfect knowledge"]);
    }

    #[test]
    fn empty_talk_summaries_suggest_loosening_filters() {
        let content = talk_summaries(&[]);
        assert_eq!(content.kind, ContentKind::NotFound);
        assert!(content.blocks[0].contains("list=\"conferences\""));
    }

    #[test]
    fn conference_listing_has_header_then_rows() {
        let overview = ConferenceOverview {
            total: 2,
            min_month: Some("2022-10".to_string()),
            max_month: Some("2023-04".to_string()),
            offset: 0,
        };
        let page = [ConferenceSummary {
            conference: "April 2023".to_string(),
            first_month: Some("2023-04".to_string()),
            talks: 3,
        }];
        let content = conference_listing(&overview, &page);
        assert_eq!(
            content.blocks,
            [
                "2 conferences, 2022-10 to 2023-04; showing 1 from offset 0",
                "April 2023 (2023-04) \u{2013} 3 talks",
            ]
        );
    }
}
