//! Query planning: picks a search strategy from tool arguments and expands it
//! into an ordered list of parameterized attempts.

use std::{error::Error, fmt};

use gospel_store::schema::{
    SCRIPTURE_FIELDS,
    TABLE_SCRIPTURE,
    TABLE_TALK,
    TALK_FIELDS,
    TALK_SUMMARY_FIELDS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::patterns::{conference_variants, speaker_variants};
use crate::query::QueryAttempt;
use crate::reference::{ParseOptions, ReferenceParser, ScriptureReference};

/// Size limits applied before any query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryLimits {
    /// Largest allowed `verse_end - verse_start`.
    pub max_verse_range: u32,
    pub require_positive: bool,
    pub scripture_default_limit: usize,
    pub scripture_max_limit: usize,
    pub scripture_query_max_chars: usize,
    pub talk_default_limit: usize,
    pub talk_max_limit: usize,
    pub talk_query_max_chars: usize,
    pub listing_default_limit: usize,
    pub listing_max_limit: usize,
    /// Largest `offset` accepted by talk searches and listings.
    pub max_offset: usize,
    /// Characters of talk body returned when `full` is not requested.
    pub talk_excerpt_chars: usize,
    pub snippet_lead_chars: usize,
    pub snippet_window_chars: usize,
}

impl Default for LibraryLimits {
    fn default() -> Self {
        Self {
            max_verse_range: 50,
            require_positive: true,
            scripture_default_limit: 10,
            scripture_max_limit: 50,
            scripture_query_max_chars: 200,
            talk_default_limit: 10,
            talk_max_limit: 20,
            talk_query_max_chars: 100,
            listing_default_limit: 25,
            listing_max_limit: 100,
            max_offset: 10_000,
            talk_excerpt_chars: 1500,
            snippet_lead_chars: 30,
            snippet_window_chars: 160,
        }
    }
}

impl LibraryLimits {
    #[must_use]
    pub const fn with_max_verse_range(mut self, max_verse_range: u32) -> Self {
        self.max_verse_range = max_verse_range;
        self
    }

    #[must_use]
    pub const fn with_require_positive(mut self, require_positive: bool) -> Self {
        self.require_positive = require_positive;
        self
    }

    #[must_use]
    pub const fn with_talk_max_limit(mut self, talk_max_limit: usize) -> Self {
        self.talk_max_limit = talk_max_limit;
        self
    }

    #[must_use]
    pub const fn parser(&self) -> ReferenceParser {
        ReferenceParser::new(ParseOptions {
            require_positive: self.require_positive,
        })
    }
}

/// Caller mistakes reported back as text rather than protocol errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    MissingParameter(&'static str),
    InvalidReference,
    QueryTooLong { max: usize },
    RangeTooLarge { max: u32 },
    OffsetTooLarge { max: usize },
    UnknownListing(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(name) => write!(f, "Missing required parameter: {name}"),
            Self::InvalidReference => write!(
                f,
                "Invalid scripture reference. Examples: \"John 3:16\", \"1 Nephi 3:7\", \"Alma 32:27-28\""
            ),
            Self::QueryTooLong { max } => {
                write!(f, "Search query too long (max {max} characters)")
            }
            Self::RangeTooLarge { max } => {
                write!(f, "Verse range too large (max {max} verses)")
            }
            Self::OffsetTooLarge { max } => write!(f, "Offset too large (max {max})"),
            Self::UnknownListing(kind) => write!(
                f,
                "Unknown list value \"{kind}\". Use list=\"conferences\" or list=\"speakers\"."
            ),
        }
    }
}

impl Error for InputError {}

/// A lowercase search needle with SQL wildcard characters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases `raw` and strips `%` and `_`.
#[must_use]
pub fn sanitize_term(raw: &str) -> SearchTerm {
    SearchTerm(
        raw.trim()
            .to_lowercase()
            .chars()
            .filter(|ch| !matches!(ch, '%' | '_'))
            .collect(),
    )
}

/// The search modes the planner can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    ByReference(ScriptureReference),
    ByKeyword {
        term: SearchTerm,
        limit: usize,
    },
    ByTalkId {
        id: i64,
        full: bool,
    },
    ByTalkFilter(TalkFilter),
    ListConferences {
        limit: usize,
        offset: usize,
    },
    ListSpeakers {
        conference: Option<SearchTerm>,
        limit: usize,
        offset: usize,
    },
    Random,
}

/// Talk search filters. With `query` set, the body text is searched and the
/// conference matches as a plain substring; without it, conference variants
/// are tried one after another.
///
/// `from` and `to` bound the talk date inclusively and compare as strings, so
/// `to = "2022-10"` excludes talks dated `2022-10-02`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkFilter {
    pub query: Option<SearchTerm>,
    pub speaker: Option<String>,
    pub conference: Option<String>,
    pub title: Option<SearchTerm>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

/// Arguments of the scripture search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptureSearchRequest {
    pub query: Option<String>,
    pub reference: Option<String>,
    pub limit: Option<usize>,
}

/// Listing modes of the talk tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Conferences,
    Speakers,
}

impl std::str::FromStr for ListingKind {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "conferences" | "conference" => Ok(Self::Conferences),
            "speakers" | "speaker" => Ok(Self::Speakers),
            _ => Err(InputError::UnknownListing(value.to_string())),
        }
    }
}

/// Arguments of the talk search/listing tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TalkSearchRequest {
    pub id: Option<i64>,
    pub query: Option<String>,
    pub speaker: Option<String>,
    pub conference: Option<String>,
    pub title: Option<String>,
    /// Earliest talk date, `YYYY-MM-DD` or a prefix of it.
    pub from: Option<String>,
    /// Latest talk date, compared the same way as `from`.
    pub to: Option<String>,
    pub list: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub full: Option<bool>,
}

/// Decides which search strategy applies and renders it as query attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPlanner {
    limits: LibraryLimits,
}

impl QueryPlanner {
    #[must_use]
    pub const fn new(limits: LibraryLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub const fn limits(&self) -> &LibraryLimits {
        &self.limits
    }

    /// Parses a reference and enforces the verse-range limit.
    ///
    /// # Errors
    /// Returns `InputError` for unparseable references or oversized ranges.
    pub fn passage_criteria(&self, reference: &str) -> Result<SearchCriteria, InputError> {
        if reference.trim().is_empty() {
            return Err(InputError::MissingParameter("reference"));
        }
        let parsed = self
            .limits
            .parser()
            .parse(reference)
            .ok_or(InputError::InvalidReference)?;
        self.check_range(parsed).map(SearchCriteria::ByReference)
    }

    /// Scripture search policy: explicit reference, query-as-reference,
    /// random verse for an empty query, otherwise keyword search.
    ///
    /// # Errors
    /// Returns `InputError` when the query is too long or a parsed range is
    /// larger than allowed.
    pub fn scripture_criteria(
        &self,
        request: &ScriptureSearchRequest,
    ) -> Result<SearchCriteria, InputError> {
        let parser = self.limits.parser();
        if let Some(parsed) = request.reference.as_deref().and_then(|value| parser.parse(value)) {
            return self.check_range(parsed).map(SearchCriteria::ByReference);
        }

        let query = request.query.as_deref().map(str::trim).unwrap_or_default();
        if let Some(parsed) = parser.parse(query) {
            return self.check_range(parsed).map(SearchCriteria::ByReference);
        }
        if query.is_empty() {
            return Ok(SearchCriteria::Random);
        }

        let max = self.limits.scripture_query_max_chars;
        if query.chars().count() > max {
            return Err(InputError::QueryTooLong { max });
        }
        let term = sanitize_term(query);
        if term.as_str().is_empty() {
            return Ok(SearchCriteria::Random);
        }
        Ok(SearchCriteria::ByKeyword {
            term,
            limit: clamp_limit(
                request.limit,
                self.limits.scripture_default_limit,
                self.limits.scripture_max_limit,
            ),
        })
    }

    /// Talk tool policy. `Ok(None)` means nothing usable was supplied and the
    /// caller should be shown a usage hint.
    ///
    /// # Errors
    /// Returns `InputError` for unknown listing kinds, overlong text, or an
    /// offset past the configured maximum.
    pub fn talk_criteria(
        &self,
        request: &TalkSearchRequest,
    ) -> Result<Option<SearchCriteria>, InputError> {
        let offset = request.offset.unwrap_or(0);
        let max_offset = self.limits.max_offset;
        if offset > max_offset {
            return Err(InputError::OffsetTooLarge { max: max_offset });
        }

        if let Some(kind) = non_empty(request.list.as_deref()) {
            let limit = clamp_limit(
                request.limit,
                self.limits.listing_default_limit,
                self.limits.listing_max_limit,
            );
            return match kind.parse::<ListingKind>()? {
                ListingKind::Conferences => Ok(Some(SearchCriteria::ListConferences { limit, offset })),
                ListingKind::Speakers => Ok(Some(SearchCriteria::ListSpeakers {
                    conference: non_empty(request.conference.as_deref()).map(sanitize_term),
                    limit,
                    offset,
                })),
            };
        }

        if let Some(id) = request.id {
            return Ok(Some(SearchCriteria::ByTalkId {
                id,
                full: request.full.unwrap_or(false),
            }));
        }

        let max = self.limits.talk_query_max_chars;
        for value in [
            &request.query,
            &request.speaker,
            &request.conference,
            &request.title,
            &request.from,
            &request.to,
        ]
        .into_iter()
            .filter_map(|value| value.as_deref())
        {
            if value.chars().count() > max {
                return Err(InputError::QueryTooLong { max });
            }
        }

        let filter = TalkFilter {
            query: non_empty(request.query.as_deref()).map(sanitize_term),
            speaker: non_empty(request.speaker.as_deref()).map(str::to_string),
            conference: non_empty(request.conference.as_deref()).map(str::to_string),
            title: non_empty(request.title.as_deref()).map(sanitize_term),
            from: non_empty(request.from.as_deref()).map(str::to_string),
            to: non_empty(request.to.as_deref()).map(str::to_string),
            limit: clamp_limit(
                request.limit,
                self.limits.talk_default_limit,
                self.limits.talk_max_limit,
            ),
            offset,
        };
        if filter.query.is_none()
            && filter.speaker.is_none()
            && filter.conference.is_none()
            && filter.title.is_none()
            && filter.from.is_none()
            && filter.to.is_none()
        {
            return Ok(None);
        }
        Ok(Some(SearchCriteria::ByTalkFilter(filter)))
    }

    /// Expands criteria into the attempts to run, in order.
    ///
    /// Aggregate listings return their single row-source statement; grouping
    /// and pagination of those happen after the rows are fetched.
    #[must_use]
    pub fn plan(&self, criteria: &SearchCriteria) -> Vec<QueryAttempt> {
        match criteria {
            SearchCriteria::ByReference(reference) => passage_attempts(reference),
            SearchCriteria::ByKeyword { term, limit } => vec![keyword_attempt(term, *limit)],
            SearchCriteria::ByTalkId { id, .. } => vec![talk_by_id_attempt(*id)],
            SearchCriteria::ByTalkFilter(filter) => talk_filter_attempts(filter),
            SearchCriteria::ListConferences { .. } => vec![conference_dates_attempt()],
            SearchCriteria::ListSpeakers { conference, .. } => {
                vec![speaker_counts_attempt(conference.as_ref())]
            }
            SearchCriteria::Random => vec![random_verse_attempt()],
        }
    }

    fn check_range(&self, reference: ScriptureReference) -> Result<ScriptureReference, InputError> {
        let max = self.limits.max_verse_range;
        if reference.span() > max {
            return Err(InputError::RangeTooLarge { max });
        }
        Ok(reference)
    }
}

/// Single-row lookup by talk id, used for the auto-expand re-fetch as well.
#[must_use]
pub fn talk_by_id_attempt(id: i64) -> QueryAttempt {
    QueryAttempt::new(
        "talk by id",
        format!("SELECT {TALK_FIELDS} FROM {TABLE_TALK} WHERE talk_id = $id LIMIT 1;"),
    )
    .bind("id", id)
}

fn passage_attempts(reference: &ScriptureReference) -> Vec<QueryAttempt> {
    let range = "chapter = $chapter AND verse >= $verse_start AND verse <= $verse_end";
    let binds = || {
        vec![
            ("chapter".to_string(), Value::from(reference.chapter)),
            ("verse_start".to_string(), Value::from(reference.verse_start)),
            ("verse_end".to_string(), Value::from(reference.verse_end)),
        ]
    };
    vec![
        QueryAttempt::new(
            "passage exact book",
            format!(
                "SELECT {SCRIPTURE_FIELDS} FROM {TABLE_SCRIPTURE} WHERE book = $book AND {range} ORDER BY verse ASC;"
            ),
        )
        .bind("book", reference.book.as_str())
        .with_binds(binds()),
        QueryAttempt::new(
            "passage case-insensitive book",
            format!(
                "SELECT {SCRIPTURE_FIELDS} FROM {TABLE_SCRIPTURE} WHERE string::lowercase(book) = $book AND {range} ORDER BY verse ASC;"
            ),
        )
        .bind("book", reference.book.to_lowercase())
        .with_binds(binds()),
    ]
}

fn keyword_attempt(term: &SearchTerm, limit: usize) -> QueryAttempt {
    QueryAttempt::new(
        "scripture keyword",
        format!(
            "SELECT {SCRIPTURE_FIELDS} FROM {TABLE_SCRIPTURE} WHERE string::contains(string::lowercase(text), $term) LIMIT $limit;"
        ),
    )
    .bind("term", term.as_str())
    .bind("limit", limit)
}

fn random_verse_attempt() -> QueryAttempt {
    QueryAttempt::new(
        "random verse",
        format!("SELECT {SCRIPTURE_FIELDS} FROM {TABLE_SCRIPTURE} ORDER BY RAND() LIMIT 1;"),
    )
}

fn conference_dates_attempt() -> QueryAttempt {
    QueryAttempt::new(
        "conference dates",
        format!("SELECT conference, date FROM {TABLE_TALK} WHERE conference != NONE;"),
    )
}

fn speaker_counts_attempt(conference: Option<&SearchTerm>) -> QueryAttempt {
    match conference {
        Some(conference) => QueryAttempt::new(
            "speaker counts by conference",
            format!(
                "SELECT speaker, count() AS talks FROM {TABLE_TALK} WHERE string::contains(string::lowercase(conference), $conference) GROUP BY speaker;"
            ),
        )
        .bind("conference", conference.as_str()),
        None => QueryAttempt::new(
            "speaker counts",
            format!("SELECT speaker, count() AS talks FROM {TABLE_TALK} GROUP BY speaker;"),
        ),
    }
}

/// Accumulates `AND`-joined conditions with generated placeholder names.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    binds: Vec<(String, Value)>,
}

impl Conditions {
    fn contains(&mut self, field: &str, name: &str, needle: &str) {
        self.clauses
            .push(format!("string::contains(string::lowercase({field}), ${name})"));
        self.binds.push((name.to_string(), Value::from(needle)));
    }

    fn any_contains(&mut self, field: &str, prefix: &str, needles: &[String]) {
        let mut alternatives = Vec::with_capacity(needles.len());
        for (index, needle) in needles.iter().enumerate() {
            let name = format!("{prefix}_{index}");
            alternatives.push(format!("string::contains(string::lowercase({field}), ${name})"));
            self.binds.push((name, Value::from(sanitize_term(needle).as_str())));
        }
        if !alternatives.is_empty() {
            self.clauses.push(format!("({})", alternatives.join(" OR ")));
        }
    }

    fn date_bound(&mut self, operator: &str, name: &str, bound: &str) {
        self.clauses
            .push(format!("(type::is::string(date) AND date {operator} ${name})"));
        self.binds.push((name.to_string(), Value::from(bound)));
    }

    /// Fetches one row past `limit` so callers can tell a lone match from a
    /// page that happens to hold one row.
    fn into_attempt(self, label: String, limit: usize, offset: usize) -> QueryAttempt {
        let filter = if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        };
        QueryAttempt::new(
            label,
            format!(
                "SELECT {TALK_SUMMARY_FIELDS} FROM {TABLE_TALK}{filter} ORDER BY date DESC LIMIT $limit START $offset;"
            ),
        )
        .with_binds(self.binds)
        .bind("limit", limit.saturating_add(1))
        .bind("offset", offset)
    }
}

fn talk_filter_attempts(filter: &TalkFilter) -> Vec<QueryAttempt> {
    let speakers = filter
        .speaker
        .as_deref()
        .map(speaker_variants)
        .map(|variants| variants.as_slice().to_vec())
        .unwrap_or_default();

    let base = |conference: Option<&str>| {
        let mut conditions = Conditions::default();
        if let Some(query) = filter.query.as_ref() {
            conditions.contains("full_text", "query", query.as_str());
        }
        conditions.any_contains("speaker", "speaker", &speakers);
        if let Some(conference) = conference {
            conditions.contains("conference", "conference", sanitize_term(conference).as_str());
        }
        if let Some(title) = filter.title.as_ref() {
            conditions.contains("title", "title", title.as_str());
        }
        if let Some(from) = filter.from.as_deref() {
            conditions.date_bound(">=", "from", from);
        }
        if let Some(to) = filter.to.as_deref() {
            conditions.date_bound("<=", "to", to);
        }
        conditions
    };

    match (filter.query.is_some(), filter.conference.as_deref()) {
        (true, conference) => {
            vec![base(conference).into_attempt("talk text search".to_string(), filter.limit, filter.offset)]
        }
        (false, Some(conference)) => conference_variants(conference)
            .as_slice()
            .iter()
            .map(|variant| {
                base(Some(variant)).into_attempt(
                    format!("talk filter conference={variant}"),
                    filter.limit,
                    filter.offset,
                )
            })
            .collect(),
        (false, None) => {
            vec![base(None).into_attempt("talk filter".to_string(), filter.limit, filter.offset)]
        }
    }
}

fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max.max(1))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> QueryPlanner {
        QueryPlanner::default()
    }

    fn scripture(query: Option<&str>, reference: Option<&str>) -> ScriptureSearchRequest {
        ScriptureSearchRequest {
            query: query.map(str::to_string),
            reference: reference.map(str::to_string),
            limit: None,
        }
    }

    #[test]
    fn sanitize_strips_wildcards_and_lowercases() {
        assert_eq!(sanitize_term("  100%_Sure ").as_str(), "100sure");
    }

    #[test]
    fn keyword_wildcards_never_reach_bound_pattern() {
        let criteria = planner()
            .scripture_criteria(&scripture(Some("Faith%_ in Christ"), None))
            .expect("keyword should plan");
        let attempts = planner().plan(&criteria);
        assert_eq!(attempts.len(), 1);
        let term = attempts[0].bound("term").and_then(Value::as_str).expect("term bound");
        assert_eq!(term, "faith in christ");
        assert!(!attempts[0].statement().contains("faith"));
    }

    #[test]
    fn explicit_reference_wins_over_query() {
        let criteria = planner()
            .scripture_criteria(&scripture(Some("charity"), Some("Moroni 7:47")))
            .expect("reference should plan");
        assert!(matches!(criteria, SearchCriteria::ByReference(ref parsed) if parsed.book == "Moroni"));
    }

    #[test]
    fn query_that_parses_as_reference_is_a_lookup() {
        let criteria = planner()
            .scripture_criteria(&scripture(Some("Alma 32:21"), Some("garbage")))
            .expect("query reference should plan");
        assert!(matches!(criteria, SearchCriteria::ByReference(ref parsed) if parsed.chapter == 32));
    }

    #[test]
    fn empty_query_picks_random_verse() {
        let criteria = planner()
            .scripture_criteria(&scripture(Some("   "), None))
            .expect("empty query should plan");
        assert_eq!(criteria, SearchCriteria::Random);
        assert_eq!(planner().scripture_criteria(&scripture(None, None)), Ok(SearchCriteria::Random));
    }

    #[test]
    fn overlong_keyword_is_rejected() {
        let long = "a".repeat(201);
        assert_eq!(
            planner().scripture_criteria(&scripture(Some(&long), None)),
            Err(InputError::QueryTooLong { max: 200 })
        );
    }

    #[test]
    fn keyword_limit_is_defaulted_and_capped() {
        let mut request = scripture(Some("faith"), None);
        let criteria = planner().scripture_criteria(&request).expect("keyword should plan");
        assert!(matches!(criteria, SearchCriteria::ByKeyword { limit: 10, .. }));

        request.limit = Some(500);
        let criteria = planner().scripture_criteria(&request).expect("keyword should plan");
        assert!(matches!(criteria, SearchCriteria::ByKeyword { limit: 50, .. }));
    }

    #[test]
    fn range_above_configured_maximum_is_rejected() {
        assert_eq!(
            planner().passage_criteria("Alma 32:1-52"),
            Err(InputError::RangeTooLarge { max: 50 })
        );
        assert!(planner().passage_criteria("Alma 32:1-51").is_ok());

        let narrow = QueryPlanner::new(LibraryLimits::default().with_max_verse_range(5));
        assert_eq!(
            narrow.passage_criteria("Alma 32:1-7"),
            Err(InputError::RangeTooLarge { max: 5 })
        );
    }

    #[test]
    fn passage_plan_retries_with_case_insensitive_book() {
        let criteria = planner().passage_criteria("John 3:16").expect("reference should plan");
        let attempts = planner().plan(&criteria);
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].bound("book"), Some(&Value::from("John")));
        assert_eq!(attempts[1].bound("book"), Some(&Value::from("john")));
        assert_eq!(attempts[1].bound("verse_end"), Some(&Value::from(16)));
    }

    #[test]
    fn talk_listing_takes_priority() {
        let request = TalkSearchRequest {
            id: Some(4),
            list: Some("Conferences".to_string()),
            limit: Some(1000),
            ..TalkSearchRequest::default()
        };
        assert_eq!(
            planner().talk_criteria(&request),
            Ok(Some(SearchCriteria::ListConferences { limit: 100, offset: 0 }))
        );

        let request = TalkSearchRequest {
            list: Some("bishops".to_string()),
            ..TalkSearchRequest::default()
        };
        assert!(matches!(
            planner().talk_criteria(&request),
            Err(InputError::UnknownListing(_))
        ));
    }

    #[test]
    fn talk_without_arguments_yields_usage_hint() {
        assert_eq!(planner().talk_criteria(&TalkSearchRequest::default()), Ok(None));
    }

    #[test]
    fn structured_filter_tries_conference_variants_in_order() {
        let request = TalkSearchRequest {
            speaker: Some("Elder Holland".to_string()),
            conference: Some("2023-04".to_string()),
            ..TalkSearchRequest::default()
        };
        let criteria = planner()
            .talk_criteria(&request)
            .expect("filter should plan")
            .expect("filter should be present");
        let attempts = planner().plan(&criteria);
        let conferences: Vec<&str> = attempts
            .iter()
            .filter_map(|attempt| attempt.bound("conference").and_then(Value::as_str))
            .collect();
        assert_eq!(
            conferences,
            [
                "2023-04",
                "april 2023",
                "2023-04 general conference",
                "april 2023 general conference",
            ]
        );
        for attempt in &attempts {
            assert_eq!(attempt.bound("speaker_0"), Some(&Value::from("elder holland")));
            assert_eq!(attempt.bound("speaker_1"), Some(&Value::from("holland")));
            assert!(attempt.statement().contains("$speaker_0 OR") || attempt.statement().contains("$speaker_0)"));
            assert!(!attempt.statement().contains("holland"));
        }
    }

    #[test]
    fn text_search_uses_single_attempt_with_conference_substring() {
        let request = TalkSearchRequest {
            query: Some("Faith".to_string()),
            conference: Some("2023-04".to_string()),
            limit: Some(99),
            ..TalkSearchRequest::default()
        };
        let criteria = planner()
            .talk_criteria(&request)
            .expect("search should plan")
            .expect("search should be present");
        let attempts = planner().plan(&criteria);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].bound("query"), Some(&Value::from("faith")));
        assert_eq!(attempts[0].bound("conference"), Some(&Value::from("2023-04")));
        assert_eq!(attempts[0].bound("limit"), Some(&Value::from(21)));
    }

    #[test]
    fn date_window_binds_both_bounds() {
        let request = TalkSearchRequest {
            from: Some(" 2022-10-01 ".to_string()),
            to: Some("2023-03-31".to_string()),
            ..TalkSearchRequest::default()
        };
        let criteria = planner()
            .talk_criteria(&request)
            .expect("date window should plan")
            .expect("date window is a filter");
        let attempts = planner().plan(&criteria);
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].bound("from"), Some(&Value::from("2022-10-01")));
        assert_eq!(attempts[0].bound("to"), Some(&Value::from("2023-03-31")));
        assert!(attempts[0].statement().contains("date >= $from"));
        assert!(attempts[0].statement().contains("date <= $to"));
        assert!(!attempts[0].statement().contains("2022"));
    }

    #[test]
    fn offset_past_maximum_is_rejected() {
        let request = TalkSearchRequest {
            speaker: Some("Nelson".to_string()),
            offset: Some(usize::MAX),
            ..TalkSearchRequest::default()
        };
        assert_eq!(
            planner().talk_criteria(&request),
            Err(InputError::OffsetTooLarge { max: 10_000 })
        );

        let request = TalkSearchRequest {
            list: Some("speakers".to_string()),
            offset: Some(10_001),
            ..TalkSearchRequest::default()
        };
        assert!(matches!(
            planner().talk_criteria(&request),
            Err(InputError::OffsetTooLarge { .. })
        ));
    }

    #[test]
    fn overlong_talk_query_is_rejected() {
        let request = TalkSearchRequest {
            query: Some("x".repeat(101)),
            ..TalkSearchRequest::default()
        };
        assert_eq!(
            planner().talk_criteria(&request),
            Err(InputError::QueryTooLong { max: 100 })
        );
    }
}
