//! Parameterized query attempts and the ordered fallback combinator.

use std::future::Future;

use serde_json::Value;

/// One parameterized statement against the store.
///
/// Statement text is assembled from fixed fragments and generated placeholder
/// names only. Caller-supplied values travel exclusively through `binds`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAttempt {
    label: String,
    statement: String,
    binds: Vec<(String, Value)>,
}

impl QueryAttempt {
    pub fn new(label: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            statement: statement.into(),
            binds: Vec::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.binds.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_binds(mut self, binds: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.binds.extend(binds);
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub fn binds(&self) -> &[(String, Value)] {
        &self.binds
    }

    /// Looks up a bound value by placeholder name.
    #[must_use]
    pub fn bound(&self, name: &str) -> Option<&Value> {
        self.binds
            .iter()
            .find(|(bound_name, _)| bound_name == name)
            .map(|(_, value)| value)
    }
}

/// Runs `attempts` in order and returns the rows of the first attempt that
/// yields any. Returns an empty vector when every attempt comes back empty;
/// the first error aborts the sequence.
///
/// # Errors
/// Propagates the error returned by `run`.
pub async fn first_non_empty<'a, T, E, F, Fut>(
    attempts: &'a [QueryAttempt],
    mut run: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(&'a QueryAttempt) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    for attempt in attempts {
        let rows = run(attempt).await?;
        if !rows.is_empty() {
            return Ok(rows);
        }
    }
    Ok(Vec::new())
}
