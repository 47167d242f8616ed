use serde::Deserialize;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ScoreSheetRecord {
    /// 1-based data row, header excluded.
    pub(crate) row: usize,
    pub(crate) category_id: String,
    pub(crate) criterion_id: String,
    pub(crate) score: i64,
}

#[derive(Debug, Deserialize)]
struct ScoreSheetRow {
    category_id: String,
    criterion_id: String,
    score: i64,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ScoreSheetRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<ScoreSheetRow>().enumerate() {
        let row = record?;
        records.push(ScoreSheetRecord {
            row: index + 1,
            category_id: row.category_id,
            criterion_id: row.criterion_id,
            score: row.score,
        });
    }

    Ok(records)
}
