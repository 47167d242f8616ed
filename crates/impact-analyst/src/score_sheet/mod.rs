//! CSV score sheets (`category_id,criterion_id,score`) for batch scoring.

mod parser;

use crate::assessment::{AssessmentError, AssessmentSchema, ScoreStore, ScoreValue};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ScoreSheetImportError {
    #[error("failed to read score sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score sheet CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: AssessmentError,
    },
    #[error("row {row}: {category_id}/{criterion_id} was already scored")]
    Duplicate {
        row: usize,
        category_id: String,
        criterion_id: String,
    },
}

pub struct ScoreSheetImporter;

impl ScoreSheetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        schema: &AssessmentSchema,
    ) -> Result<ScoreStore, ScoreSheetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, schema)
    }

    /// Seeds a store from the schema, then applies every row. Criteria the
    /// sheet does not mention stay at zero.
    pub fn from_reader<R: Read>(
        reader: R,
        schema: &AssessmentSchema,
    ) -> Result<ScoreStore, ScoreSheetImportError> {
        let mut store = ScoreStore::seeded(schema);
        let mut applied: HashSet<(String, String)> = HashSet::new();

        for record in parser::parse_records(reader)? {
            let row = record.row;
            let key = (record.category_id, record.criterion_id);
            if applied.contains(&key) {
                let (category_id, criterion_id) = key;
                return Err(ScoreSheetImportError::Duplicate {
                    row,
                    category_id,
                    criterion_id,
                });
            }

            let value = u8::try_from(record.score)
                .map_err(|_| AssessmentError::InvalidScore(record.score))
                .and_then(ScoreValue::try_from)
                .map_err(|source| ScoreSheetImportError::Row { row, source })?;

            schema
                .resolve(&key.0, &key.1)
                .and_then(|_| store.set_score(&key.0, &key.1, value))
                .map_err(|source| ScoreSheetImportError::Row { row, source })?;

            applied.insert(key);
        }

        debug!(rows = applied.len(), "score sheet imported");
        Ok(store)
    }
}
