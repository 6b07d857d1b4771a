//! The Outcome Registry
//!
//! Built once at startup and immutable afterwards. The registry owns the
//! catalog, answers discovery and describe calls, and enforces the read-only
//! gate before any handler runs.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::OutcomeError;
use crate::outcome::{Outcome, OutcomeSummary};
use crate::outcomes;
use crate::params::Parameters;
use crate::state::Dependencies;

#[derive(Debug, Default)]
pub struct OutcomeRegistry {
    outcomes: HashMap<String, Outcome>,
}

impl OutcomeRegistry {
    /// Registry populated with every built-in outcome
    pub fn build() -> Result<Self, OutcomeError> {
        let registry = Self::from_outcomes(outcomes::all())?;
        info!(count = registry.len(), "Outcome registry built");
        Ok(registry)
    }

    /// Registry containing exactly `outcomes`; a repeated id is an error
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Result<Self, OutcomeError> {
        let mut map = HashMap::new();
        for outcome in outcomes {
            if map.contains_key(&outcome.id) {
                return Err(OutcomeError::DuplicateOutcome(outcome.id));
            }
            map.insert(outcome.id.clone(), outcome);
        }
        Ok(Self { outcomes: map })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// One summary per outcome, ordered by id
    pub fn summaries(&self) -> Vec<OutcomeSummary> {
        let mut summaries: Vec<OutcomeSummary> =
            self.outcomes.values().map(Outcome::summary).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Full record for `id`
    pub fn describe(&self, id: &str) -> Result<&Outcome, OutcomeError> {
        self.outcomes
            .get(id)
            .ok_or_else(|| OutcomeError::OutcomeNotFound(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    /// Resolve `id`, apply the read-only gate, then run the handler
    ///
    /// The handler's result is returned unchanged.
    pub async fn dispatch(
        &self,
        id: &str,
        params: &Parameters,
        deps: &Dependencies,
    ) -> Result<Value, OutcomeError> {
        let outcome = self.describe(id)?;

        if !outcome.read_only && !deps.is_write_allowed() {
            warn!(outcome_id = id, "Rejected write outcome: server is read-only");
            return Err(OutcomeError::ReadOnlyModeViolation(id.to_string()));
        }

        let handler = outcome
            .handler
            .as_ref()
            .ok_or_else(|| OutcomeError::HandlerMissing(id.to_string()))?;

        debug!(
            outcome_id = id,
            parameters = params.len(),
            "Executing outcome"
        );
        let result = handler.execute(params, deps).await;

        match &result {
            Ok(_) => debug!(outcome_id = id, "Outcome completed"),
            Err(e) => warn!(outcome_id = id, error = %e, code = e.code(), "Outcome failed"),
        }

        result
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
