//! Alternate spellings for speaker names and conference identifiers.
//!
//! Stored talk metadata is inconsistent: speakers appear with and without
//! honorifics or initials, and conferences appear as `2023-04`, `April 2023`,
//! or `April 2023 General Conference`. The expanders produce every shape worth
//! trying, in the order they should be tried.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Month;
use gospel_store::schema::GENERAL_CONFERENCE_SUFFIX;
use regex::Regex;

static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(elder|president|brother|sister)\s+")
        .unwrap_or_else(|err| panic!("honorific pattern must compile: {err}"))
});

static NUMERIC_CONFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})$")
        .unwrap_or_else(|err| panic!("numeric conference pattern must compile: {err}"))
});

static NAMED_CONFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{4})$")
        .unwrap_or_else(|err| panic!("named conference pattern must compile: {err}"))
});

/// Ordered, case-insensitively de-duplicated list of variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variants {
    items: Vec<String>,
}

impl Variants {
    fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if self.items.iter().any(|item| item.eq_ignore_ascii_case(value)) {
            return;
        }
        self.items.push(value.to_string());
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }
}

/// Generates speaker spellings: the input, the name without honorific, the
/// name without periods, honorific-qualified forms, and the surname alone.
#[must_use]
pub fn speaker_variants(input: &str) -> Variants {
    let mut variants = Variants::default();
    let trimmed = input.trim();
    variants.push(trimmed);

    let base = HONORIFIC.replace(trimmed, "").trim().to_string();
    if base.is_empty() {
        return variants;
    }

    variants.push(base.as_str());
    variants.push(base.replace('.', ""));
    variants.push(format!("Elder {base}"));
    variants.push(format!("President {base}"));

    let words: Vec<&str> = base.split_whitespace().collect();
    if let Some(surname) = words.last().filter(|_| words.len() > 1) {
        variants.push(surname.trim_end_matches('.'));
    }
    variants
}

/// Generates conference spellings: the input, the spelled-out month form for
/// `YYYY-MM`, `YYYY/MM`, or abbreviated month names, and each of those with
/// the ` General Conference` suffix.
#[must_use]
pub fn conference_variants(input: &str) -> Variants {
    let mut variants = Variants::default();
    let trimmed = input.trim();
    variants.push(trimmed);

    if let Some(named) = spelled_out_month(trimmed) {
        variants.push(named);
    }

    let base = variants.as_slice().to_vec();
    for variant in base {
        if !variant.to_lowercase().ends_with(&GENERAL_CONFERENCE_SUFFIX.to_lowercase()) {
            variants.push(format!("{variant}{GENERAL_CONFERENCE_SUFFIX}"));
        }
    }
    variants
}

fn spelled_out_month(input: &str) -> Option<String> {
    if let Some(captures) = NUMERIC_CONFERENCE.captures(input) {
        let year = captures.get(1)?.as_str();
        let month: u8 = captures.get(2)?.as_str().parse().ok()?;
        let month = Month::try_from(month).ok()?;
        return Some(format!("{} {year}", month.name()));
    }
    let captures = NAMED_CONFERENCE.captures(input)?;
    let month = Month::from_str(captures.get(1)?.as_str()).ok()?;
    let year = captures.get(2)?.as_str();
    Some(format!("{} {year}", month.name()))
}
