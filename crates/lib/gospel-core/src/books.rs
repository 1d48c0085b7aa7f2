//! Canonical book names for the standard works.
//!
//! Aliases are stored lowercase with periods removed and internal whitespace
//! collapsed, which is the same shape `normalize_key` produces from user input.

use std::collections::HashMap;
use std::sync::LazyLock;

const BOOK_ALIASES: &[(&str, &[&str])] = &[
    // Old Testament
    ("Genesis", &["gen", "ge", "gn"]),
    ("Exodus", &["ex", "exo", "exod"]),
    ("Leviticus", &["lev", "le", "lv"]),
    ("Numbers", &["num", "nu", "nm", "numb"]),
    ("Deuteronomy", &["deut", "dt", "de"]),
    ("Joshua", &["josh", "jos"]),
    ("Judges", &["judg", "jdg"]),
    ("Ruth", &["rth", "ru"]),
    ("1 Samuel", &["1 sam", "1 sa", "1sam", "i samuel"]),
    ("2 Samuel", &["2 sam", "2 sa", "2sam", "ii samuel"]),
    ("1 Kings", &["1 kgs", "1 ki", "1kgs", "i kings"]),
    ("2 Kings", &["2 kgs", "2 ki", "2kgs", "ii kings"]),
    ("1 Chronicles", &["1 chr", "1 chron", "1chr"]),
    ("2 Chronicles", &["2 chr", "2 chron", "2chr"]),
    ("Ezra", &["ezr"]),
    ("Nehemiah", &["neh", "ne"]),
    ("Esther", &["esth", "est"]),
    ("Job", &["jb"]),
    ("Psalms", &["ps", "psa", "psalm", "pss"]),
    ("Proverbs", &["prov", "pr", "prv"]),
    ("Ecclesiastes", &["eccl", "eccles", "ecc", "qoh"]),
    ("Song of Solomon", &["song", "sos", "song of songs", "canticles"]),
    ("Isaiah", &["isa", "is"]),
    ("Jeremiah", &["jer", "je"]),
    ("Lamentations", &["lam", "la"]),
    ("Ezekiel", &["ezek", "eze", "ezk"]),
    ("Daniel", &["dan", "da", "dn"]),
    ("Hosea", &["hos", "ho"]),
    ("Joel", &["jl"]),
    ("Amos", &["am"]),
    ("Obadiah", &["obad", "ob"]),
    ("Jonah", &["jon", "jnh"]),
    ("Micah", &["mic", "mc"]),
    ("Nahum", &["nah", "na"]),
    ("Habakkuk", &["hab", "hb"]),
    ("Zephaniah", &["zeph", "zep"]),
    ("Haggai", &["hag", "hg"]),
    ("Zechariah", &["zech", "zec"]),
    ("Malachi", &["mal", "ml"]),
    // New Testament
    ("Matthew", &["matt", "mt", "mat"]),
    ("Mark", &["mk", "mrk"]),
    ("Luke", &["lk", "luk"]),
    ("John", &["jn", "jhn", "joh"]),
    ("Acts", &["act"]),
    ("Romans", &["rom", "ro", "rm"]),
    ("1 Corinthians", &["1 cor", "1 co", "1cor"]),
    ("2 Corinthians", &["2 cor", "2 co", "2cor"]),
    ("Galatians", &["gal", "ga"]),
    ("Ephesians", &["eph", "ephes"]),
    ("Philippians", &["philip", "phil", "php"]),
    ("Colossians", &["col"]),
    ("1 Thessalonians", &["1 thes", "1 thess", "1 th"]),
    ("2 Thessalonians", &["2 thes", "2 thess", "2 th"]),
    ("1 Timothy", &["1 tim", "1 ti"]),
    ("2 Timothy", &["2 tim", "2 ti"]),
    ("Titus", &["tit"]),
    ("Philemon", &["philem", "phm"]),
    ("Hebrews", &["heb"]),
    ("James", &["jas", "jm"]),
    ("1 Peter", &["1 pet", "1 pe", "1pet"]),
    ("2 Peter", &["2 pet", "2 pe", "2pet"]),
    ("1 John", &["1 jn", "1jn", "1 jhn"]),
    ("2 John", &["2 jn", "2jn", "2 jhn"]),
    ("3 John", &["3 jn", "3jn", "3 jhn"]),
    ("Jude", &["jud", "jde"]),
    ("Revelation", &["rev", "re", "revelations", "apocalypse"]),
    // Book of Mormon
    ("1 Nephi", &["1 ne", "1 nep", "1ne"]),
    ("2 Nephi", &["2 ne", "2 nep", "2ne"]),
    ("Jacob", &["jac"]),
    ("Enos", &["en"]),
    ("Jarom", &["jar"]),
    ("Omni", &["omn"]),
    ("Words of Mormon", &["w of m", "wofm", "wom"]),
    ("Mosiah", &["mosi", "mos"]),
    ("Alma", &["al"]),
    ("Helaman", &["hel"]),
    ("3 Nephi", &["3 ne", "3 nep", "3ne"]),
    ("4 Nephi", &["4 ne", "4 nep", "4ne"]),
    ("Mormon", &["morm", "mrm"]),
    ("Ether", &["eth"]),
    ("Moroni", &["moro", "mni"]),
    // Doctrine and Covenants
    (
        "Doctrine and Covenants",
        &["d&c", "dc", "d & c", "d and c", "doctrine & covenants"],
    ),
    // Pearl of Great Price
    ("Moses", &["mses"]),
    ("Abraham", &["abr", "abra"]),
    (
        "Joseph Smith—Matthew",
        &["js-m", "jsm", "joseph smith-matthew", "joseph smith matthew"],
    ),
    (
        "Joseph Smith—History",
        &["js-h", "jsh", "joseph smith-history", "joseph smith history"],
    ),
    ("Articles of Faith", &["a of f", "aoff", "aof"]),
];

static ALIAS_TABLE: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for (canonical, aliases) in BOOK_ALIASES {
        table.insert(normalize_key(canonical), *canonical);
        for alias in *aliases {
            table.insert(normalize_key(alias), *canonical);
        }
    }
    table
});

/// Maps abbreviations and alternate spellings onto canonical book names.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookNameNormalizer;

impl BookNameNormalizer {
    /// Returns the canonical name for `raw`, or the whitespace-collapsed input
    /// when the book is not in the alias table.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        Self::canonical(raw).map_or_else(|| collapse_whitespace(raw), str::to_string)
    }

    /// Looks up the canonical name without the pass-through fallback.
    #[must_use]
    pub fn canonical(raw: &str) -> Option<&'static str> {
        let key = normalize_key(raw);
        ALIAS_TABLE
            .get(&key)
            .or_else(|| split_leading_number(&key).and_then(|spaced| ALIAS_TABLE.get(&spaced)))
            .copied()
    }
}

/// Lowercases, strips periods, and collapses whitespace.
fn normalize_key(raw: &str) -> String {
    collapse_whitespace(&raw.to_lowercase().replace('.', ""))
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// "1nephi" -> "1 nephi"
fn split_leading_number(key: &str) -> Option<String> {
    let mut chars = key.chars();
    let first = chars.next().filter(char::is_ascii_digit)?;
    let rest = chars.as_str();
    rest.starts_with(|ch: char| ch.is_alphabetic())
        .then(|| format!("{first} {rest}"))
}

#[cfg(test)]
mod tests {
    use super::BookNameNormalizer;

    #[test]
    fn normalizes_common_abbreviations() {
        assert_eq!(BookNameNormalizer::normalize("gen"), "Genesis");
        assert_eq!(BookNameNormalizer::normalize("D&C"), "Doctrine and Covenants");
        assert_eq!(BookNameNormalizer::normalize("1 Ne."), "1 Nephi");
        assert_eq!(BookNameNormalizer::normalize("jn"), "John");
        assert_eq!(BookNameNormalizer::normalize("  doctrine   and covenants "), "Doctrine and Covenants");
    }

    #[test]
    fn accepts_numbered_books_without_space() {
        assert_eq!(BookNameNormalizer::normalize("1Nephi"), "1 Nephi");
        assert_eq!(BookNameNormalizer::normalize("3nephi"), "3 Nephi");
    }

    #[test]
    fn unknown_books_pass_through_with_original_casing() {
        assert_eq!(BookNameNormalizer::normalize("unknownbook"), "unknownbook");
        assert_eq!(BookNameNormalizer::normalize("Book  of   Lehi"), "Book of Lehi");
        assert!(BookNameNormalizer::canonical("unknownbook").is_none());
    }
}
