use gospel_store::models::ScriptureRow;
use surrealdb::Connection;
use tracing::debug;

use super::{ControlError, LibraryControlPlane, settle};
use crate::format::{self, FormattedContent};
use crate::planner::{ScriptureSearchRequest, SearchCriteria};

impl<C: Connection> LibraryControlPlane<C> {
    /// Fetches an exact verse or contiguous verse range.
    pub async fn get_passage(&self, reference: &str) -> FormattedContent {
        let criteria = match self.planner.passage_criteria(reference) {
            Ok(criteria) => criteria,
            Err(err) => return FormattedContent::invalid_input(&err),
        };
        settle("get_passage", self.run_scripture(&criteria).await)
    }

    /// Scripture search: reference lookup, keyword search, or a random verse
    /// depending on which arguments are usable.
    pub async fn search_scriptures(&self, request: &ScriptureSearchRequest) -> FormattedContent {
        let criteria = match self.planner.scripture_criteria(request) {
            Ok(criteria) => criteria,
            Err(err) => return FormattedContent::invalid_input(&err),
        };
        settle("search_scriptures", self.run_scripture(&criteria).await)
    }

    /// Returns a single random verse.
    pub async fn random_scripture(&self) -> FormattedContent {
        settle("random_scripture", self.run_scripture(&SearchCriteria::Random).await)
    }

    async fn run_scripture(&self, criteria: &SearchCriteria) -> Result<FormattedContent, ControlError> {
        let limits = self.limits();
        let content = match criteria {
            SearchCriteria::ByReference(reference) => {
                format::passage(reference, &self.scripture_rows(criteria).await?)
            }
            SearchCriteria::ByKeyword { term, .. } => format::keyword_hits(
                &self.scripture_rows(criteria).await?,
                term,
                limits.snippet_lead_chars,
                limits.snippet_window_chars,
            ),
            SearchCriteria::Random => format::random_verse(self.scripture_rows(criteria).await?.first()),
            _ => FormattedContent::hint(format::USAGE_HINT),
        };
        Ok(content)
    }

    async fn scripture_rows(&self, criteria: &SearchCriteria) -> Result<Vec<ScriptureRow>, ControlError> {
        let attempts = self.planner.plan(criteria);
        debug!(?criteria, attempts = attempts.len(), "planned scripture query");
        Ok(self.store.first_non_empty(&attempts).await?)
    }
}
