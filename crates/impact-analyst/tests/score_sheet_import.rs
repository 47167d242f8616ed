use impact_analyst::assessment::report::compute;
use impact_analyst::assessment::{AssessmentSchema, Rank, ScoreValue};
use impact_analyst::score_sheet::{ScoreSheetImportError, ScoreSheetImporter};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn pilot_sheet_scores_as_good() {
    let schema = AssessmentSchema::standard();
    let store = ScoreSheetImporter::from_path(fixture("pilot_scores.csv"), &schema)
        .expect("pilot sheet imports");

    assert_eq!(store.get("c7", "7.3"), Some(ScoreValue::NotMet));
    assert_eq!(store.scored_count("c7"), 2);

    let result = compute(&schema, &store);
    assert!((result.total_score - (637.0 / 3.0)).abs() < 1e-9);
    assert_eq!(result.total_display(), "212.3");
    assert_eq!(result.badge_score(), 212);
    assert_eq!(result.rank, Rank::Good);

    let c1 = result.category("c1").expect("c1 result");
    assert!((c1.weighted_score - 33.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_an_io_error() {
    let schema = AssessmentSchema::standard();
    let err = ScoreSheetImporter::from_path(fixture("does_not_exist.csv"), &schema).unwrap_err();
    assert!(matches!(err, ScoreSheetImportError::Io(_)));
}

#[test]
fn unknown_category_reports_row() {
    let schema = AssessmentSchema::standard();
    let csv = "category_id,criterion_id,score\nc1,1.1,2\nc1,1.2,2\nc8,8.1,1\n";
    let err = ScoreSheetImporter::from_reader(csv.as_bytes(), &schema).unwrap_err();
    assert_eq!(err.to_string(), "row 3: unknown category 'c8'");
}

#[test]
fn negative_scores_are_rejected() {
    let schema = AssessmentSchema::standard();
    let csv = "category_id,criterion_id,score\nc3,3.3,-1\n";
    let err = ScoreSheetImporter::from_reader(csv.as_bytes(), &schema).unwrap_err();
    assert_eq!(err.to_string(), "row 1: score -1 is outside the 0-3 scale");
}
