use super::domain::{AssessmentError, ScoreValue};
use super::schema::AssessmentSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// Current verdict for every criterion, keyed by category then criterion id.
///
/// Seeded from a schema so every declared criterion always has an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreStore {
    entries: BTreeMap<String, BTreeMap<String, ScoreValue>>,
}

impl ScoreStore {
    pub fn seeded(schema: &AssessmentSchema) -> Self {
        let entries = schema
            .categories()
            .iter()
            .map(|category| {
                let scores = category
                    .criteria
                    .iter()
                    .map(|criterion| (criterion.id.to_string(), ScoreValue::NotMet))
                    .collect();
                (category.id.to_string(), scores)
            })
            .collect();

        Self { entries }
    }

    /// Replaces one entry and returns the value it held before.
    pub fn set_score(
        &mut self,
        category_id: &str,
        criterion_id: &str,
        value: ScoreValue,
    ) -> Result<ScoreValue, AssessmentError> {
        let category = self
            .entries
            .get_mut(category_id)
            .ok_or_else(|| AssessmentError::UnknownCategory(category_id.to_string()))?;
        let slot =
            category
                .get_mut(criterion_id)
                .ok_or_else(|| AssessmentError::UnknownCriterion {
                    category_id: category_id.to_string(),
                    criterion_id: criterion_id.to_string(),
                })?;

        Ok(std::mem::replace(slot, value))
    }

    pub fn get(&self, category_id: &str, criterion_id: &str) -> Option<ScoreValue> {
        self.entries
            .get(category_id)
            .and_then(|scores| scores.get(criterion_id))
            .copied()
    }

    /// Score for aggregation purposes; a missing entry counts as not met.
    pub fn score(&self, category_id: &str, criterion_id: &str) -> ScoreValue {
        self.get(category_id, criterion_id).unwrap_or_default()
    }

    pub fn category_scores(&self, category_id: &str) -> Option<&BTreeMap<String, ScoreValue>> {
        self.entries.get(category_id)
    }

    /// Criteria in the category scored above zero.
    pub fn scored_count(&self, category_id: &str) -> usize {
        self.category_scores(category_id)
            .map(|scores| {
                scores
                    .values()
                    .filter(|value| **value != ScoreValue::NotMet)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reseeds every schema-declared entry to zero.
    pub fn reset(&mut self, schema: &AssessmentSchema) {
        *self = Self::seeded(schema);
    }
}
