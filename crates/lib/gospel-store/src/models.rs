use serde::{Deserialize, Serialize};

/// A single scripture verse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptureRow {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl ScriptureRow {
    #[must_use]
    pub fn citation(&self) -> String {
        crate::schema::make_citation(&self.book, self.chapter, self.verse, self.verse)
    }
}

/// A conference talk with its complete body text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TalkRow {
    pub talk_id: i64,
    pub speaker: String,
    pub title: String,
    pub conference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub full_text: String,
}

/// A conference talk projected for listing, carrying a leading excerpt only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TalkSummaryRow {
    pub talk_id: i64,
    pub speaker: String,
    pub title: String,
    pub conference: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// Conference and date pair used to aggregate the conference listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConferenceDateRow {
    pub conference: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// One conference in the listing, with its earliest month and talk count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConferenceSummary {
    pub conference: String,
    pub first_month: Option<String>,
    pub talks: u64,
}

/// Speaker name with the number of talks attributed to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeakerCountRow {
    pub speaker: String,
    pub talks: u64,
}

/// Seed document for an embedded store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Corpus {
    #[serde(default)]
    pub scriptures: Vec<ScriptureRow>,
    #[serde(default)]
    pub talks: Vec<TalkRow>,
}

impl Corpus {
    /// Parses a corpus from its JSON form.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Extracts the `YYYY-MM` month prefix of an ISO-like date string.
#[must_use]
pub fn month_of(date: &str) -> Option<String> {
    let prefix: String = date.chars().take(7).collect();
    let bytes = prefix.as_bytes();
    let shaped = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    shaped.then_some(prefix)
}
