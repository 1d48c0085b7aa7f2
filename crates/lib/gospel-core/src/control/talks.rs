use std::cmp::Reverse;
use std::collections::BTreeMap;

use gospel_store::models::{
    ConferenceDateRow,
    ConferenceSummary,
    SpeakerCountRow,
    TalkRow,
    TalkSummaryRow,
    month_of,
};
use surrealdb::Connection;
use tracing::{debug, warn};

use super::{ControlError, LibraryControlPlane, settle};
use crate::format::{self, ConferenceOverview, FormattedContent};
use crate::planner::{SearchCriteria, SearchTerm, TalkFilter, TalkSearchRequest, talk_by_id_attempt};

impl<C: Connection> LibraryControlPlane<C> {
    /// Fetches one talk by id, excerpted unless `full` is set.
    pub async fn get_talk(&self, id: i64, full: bool) -> FormattedContent {
        settle(
            "get_talk",
            self.run_talks(&SearchCriteria::ByTalkId { id, full }).await,
        )
    }

    /// Talk search and listing: id lookup, text search, structured filters
    /// with conference fallback, or conference/speaker listings.
    pub async fn search_talks(&self, request: &TalkSearchRequest) -> FormattedContent {
        match self.planner.talk_criteria(request) {
            Ok(Some(criteria)) => settle("search_talks", self.run_talks(&criteria).await),
            Ok(None) => FormattedContent::hint(format::USAGE_HINT),
            Err(err) => FormattedContent::invalid_input(&err),
        }
    }

    async fn run_talks(&self, criteria: &SearchCriteria) -> Result<FormattedContent, ControlError> {
        let attempts = self.planner.plan(criteria);
        debug!(?criteria, attempts = attempts.len(), "planned talk query");

        let content = match criteria {
            SearchCriteria::ByTalkId { full, .. } => {
                let rows: Vec<TalkRow> = self.store.first_non_empty(&attempts).await?;
                format::talk(rows.first(), *full, self.limits().talk_excerpt_chars)
            }
            SearchCriteria::ByTalkFilter(filter) => {
                let rows: Vec<TalkSummaryRow> = self.store.first_non_empty(&attempts).await?;
                self.expand_single_hit(filter, rows).await?
            }
            SearchCriteria::ListConferences { limit, offset } => {
                let rows: Vec<ConferenceDateRow> = self.store.first_non_empty(&attempts).await?;
                conference_page(&summarize_conferences(rows), *limit, *offset)
            }
            SearchCriteria::ListSpeakers {
                conference,
                limit,
                offset,
            } => {
                let rows: Vec<SpeakerCountRow> = self.store.first_non_empty(&attempts).await?;
                speaker_page(rows, conference.as_ref(), *limit, *offset)
            }
            _ => FormattedContent::hint(format::USAGE_HINT),
        };
        Ok(content)
    }

    /// A lone match is replaced by its full talk; several become summaries.
    ///
    /// Rows arrive with one extra past `limit`, so a single row at offset zero
    /// means exactly one talk matched.
    async fn expand_single_hit(
        &self,
        filter: &TalkFilter,
        rows: Vec<TalkSummaryRow>,
    ) -> Result<FormattedContent, ControlError> {
        match rows.as_slice() {
            [] => {
                warn!(
                    speaker = filter.speaker.as_deref(),
                    conference = filter.conference.as_deref(),
                    "talk search exhausted every fallback"
                );
                Ok(format::talk_summaries(&rows))
            }
            [single] if filter.offset == 0 => {
                let full: Vec<TalkRow> = self.store.fetch(&talk_by_id_attempt(single.talk_id)).await?;
                if full.is_empty() {
                    return Ok(format::talk_summaries(&rows));
                }
                Ok(format::talk(full.first(), true, self.limits().talk_excerpt_chars))
            }
            page => Ok(format::talk_summaries(&page[..page.len().min(filter.limit)])),
        }
    }
}

/// Groups talks by conference, keeping the earliest month and a talk count,
/// newest conference first.
#[must_use]
pub fn summarize_conferences(rows: Vec<ConferenceDateRow>) -> Vec<ConferenceSummary> {
    let mut grouped: BTreeMap<String, ConferenceSummary> = BTreeMap::new();
    for row in rows {
        let month = row.date.as_deref().and_then(month_of);
        let entry = grouped
            .entry(row.conference.clone())
            .or_insert_with(|| ConferenceSummary {
                conference: row.conference,
                first_month: None,
                talks: 0,
            });
        entry.talks += 1;
        entry.first_month = match (entry.first_month.take(), month) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
    }
    let mut summaries: Vec<ConferenceSummary> = grouped.into_values().collect();
    summaries.sort_by(|left, right| {
        right
            .first_month
            .cmp(&left.first_month)
            .then_with(|| left.conference.cmp(&right.conference))
    });
    summaries
}

fn conference_page(summaries: &[ConferenceSummary], limit: usize, offset: usize) -> FormattedContent {
    let months = summaries.iter().filter_map(|summary| summary.first_month.clone());
    let overview = ConferenceOverview {
        total: summaries.len(),
        min_month: months.clone().min(),
        max_month: months.max(),
        offset,
    };
    let page: Vec<ConferenceSummary> = summaries.iter().skip(offset).take(limit).cloned().collect();
    format::conference_listing(&overview, &page)
}

fn speaker_page(
    mut rows: Vec<SpeakerCountRow>,
    conference: Option<&SearchTerm>,
    limit: usize,
    offset: usize,
) -> FormattedContent {
    rows.sort_by(|left, right| {
        Reverse(left.talks)
            .cmp(&Reverse(right.talks))
            .then_with(|| left.speaker.cmp(&right.speaker))
    });
    let total = rows.len();
    let page: Vec<SpeakerCountRow> = rows.into_iter().skip(offset).take(limit).collect();
    format::speaker_listing(total, conference, offset, &page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(conference: &str, date: &str) -> ConferenceDateRow {
        ConferenceDateRow {
            conference: conference.to_string(),
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn conferences_are_grouped_newest_first() {
        let summaries = summarize_conferences(vec![
            dated("October 2022", "2022-10-02"),
            dated("April 2023", "2023-04-02"),
            dated("April 2023", "2023-04-01"),
            ConferenceDateRow {
                conference: "Undated Devotional".to_string(),
                date: None,
            },
        ]);
        let names: Vec<&str> = summaries.iter().map(|s| s.conference.as_str()).collect();
        assert_eq!(names, ["April 2023", "October 2022", "Undated Devotional"]);
        assert_eq!(summaries[0].talks, 2);
        assert_eq!(summaries[0].first_month.as_deref(), Some("2023-04"));
        assert_eq!(summaries[2].first_month, None);
    }

    #[test]
    fn conference_page_reports_corpus_span() {
        let summaries = summarize_conferences(vec![
            dated("October 2022", "2022-10-02"),
            dated("April 2023", "2023-04-02"),
        ]);
        let content = conference_page(&summaries, 1, 1);
        assert_eq!(
            content.blocks,
            [
                "2 conferences, 2022-10 to 2023-04; showing 1 from offset 1",
                "October 2022 (2022-10) \u{2013} 1 talks",
            ]
        );
    }

    #[test]
    fn speakers_sort_by_count_then_name() {
        let rows = vec![
            SpeakerCountRow { speaker: "Dieter F. Uchtdorf".to_string(), talks: 2 },
            SpeakerCountRow { speaker: "Russell M. Nelson".to_string(), talks: 5 },
            SpeakerCountRow { speaker: "D. Todd Christofferson".to_string(), talks: 2 },
        ];
        let content = speaker_page(rows, None, 10, 0);
        assert_eq!(
            content.blocks,
            [
                "3 speakers; showing 3 from offset 0",
                "Russell M. Nelson \u{2013} 5 talks",
                "D. Todd Christofferson \u{2013} 2 talks",
                "Dieter F. Uchtdorf \u{2013} 2 talks",
            ]
        );
    }
}
