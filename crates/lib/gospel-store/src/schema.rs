pub const TABLE_SCRIPTURE: &str = "scripture";
pub const TABLE_TALK: &str = "talk";

/// Fields projected for a single scripture verse.
pub const SCRIPTURE_FIELDS: &str = "book, chapter, verse, text";

/// Fields projected for a full talk record.
pub const TALK_FIELDS: &str = "talk_id, speaker, title, conference, date, full_text";

/// Fields projected for a talk summary line.
pub const TALK_SUMMARY_FIELDS: &str =
    "talk_id, speaker, title, conference, date, string::slice(full_text, 0, 200) AS excerpt";

/// Suffix appended to conference identifiers by some corpus sources.
pub const GENERAL_CONFERENCE_SUFFIX: &str = " General Conference";

pub fn make_citation(book: &str, chapter: u32, verse_start: u32, verse_end: u32) -> String {
    if verse_end == verse_start {
        format!("{book} {chapter}:{verse_start}")
    } else {
        format!("{book} {chapter}:{verse_start}-{verse_end}")
    }
}
