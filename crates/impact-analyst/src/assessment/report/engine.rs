use super::super::domain::{Category, Rank, MAX_CRITERION_SCORE, MAX_TOTAL_SCORE};
use super::super::schema::AssessmentSchema;
use super::super::store::ScoreStore;
use super::views::{AssessmentResult, CategoryResult};

/// Aggregates the store into weighted category scores, a total and a rank.
///
/// Pure and total: entries missing from the store count as zero.
pub fn compute(schema: &AssessmentSchema, store: &ScoreStore) -> AssessmentResult {
    let category_scores: Vec<CategoryResult> = schema
        .categories()
        .iter()
        .map(|category| score_category(category, store))
        .collect();

    let total_score = category_scores
        .iter()
        .map(|category| category.weighted_score)
        .sum();

    AssessmentResult {
        total_score,
        max_score: MAX_TOTAL_SCORE,
        rank: Rank::classify(total_score),
        category_scores,
    }
}

fn score_category(category: &Category, store: &ScoreStore) -> CategoryResult {
    let raw_sum: u32 = category
        .criteria
        .iter()
        .map(|criterion| u32::from(store.score(category.id, criterion.id).points()))
        .sum();
    let criterion_count = category.criteria.len();
    let max_raw = criterion_count as u32 * u32::from(MAX_CRITERION_SCORE);

    let average = if criterion_count > 0 {
        f64::from(raw_sum) / criterion_count as f64
    } else {
        0.0
    };
    let percentage = if max_raw > 0 {
        f64::from(raw_sum) / f64::from(max_raw) * 100.0
    } else {
        0.0
    };

    CategoryResult {
        id: category.id,
        title: category.title,
        weight: category.weight,
        criterion_count,
        raw_sum,
        average,
        weighted_score: average * f64::from(category.weight),
        max_potential: category.max_potential(),
        percentage,
    }
}
