use super::super::domain::{Rank, ScoreValue};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub id: &'static str,
    pub title: &'static str,
    pub weight: u8,
    pub criterion_count: usize,
    pub raw_sum: u32,
    pub average: f64,
    pub weighted_score: f64,
    pub max_potential: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub total_score: f64,
    pub max_score: u32,
    pub rank: Rank,
    pub category_scores: Vec<CategoryResult>,
}

impl AssessmentResult {
    /// Total with one decimal, e.g. "187.5".
    pub fn total_display(&self) -> String {
        format!("{:.1}", self.total_score)
    }

    /// Whole-number total for compact badges.
    pub fn badge_score(&self) -> i64 {
        self.total_score.round() as i64
    }

    pub fn category(&self, category_id: &str) -> Option<&CategoryResult> {
        self.category_scores
            .iter()
            .find(|category| category.id == category_id)
    }

    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            total_score: self.total_score,
            total_display: self.total_display(),
            badge_score: self.badge_score(),
            max_score: self.max_score,
            rank: self.rank,
            rank_label: self.rank.label(),
            rank_description: self.rank.description(),
            rank_tone: self.rank.tone(),
            categories: self
                .category_scores
                .iter()
                .map(CategoryResult::to_row)
                .collect(),
        }
    }
}

impl CategoryResult {
    pub fn to_row(&self) -> CategoryRow {
        CategoryRow {
            id: self.id,
            title: self.title,
            weight: self.weight,
            weighted_score: self.weighted_score,
            score_display: format!("{:.1}", self.weighted_score),
            max_potential: self.max_potential,
            percentage: self.percentage,
        }
    }
}

/// Row of the detailed breakdown table.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: &'static str,
    pub title: &'static str,
    pub weight: u8,
    pub weighted_score: f64,
    pub score_display: String,
    pub max_potential: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub total_score: f64,
    pub total_display: String,
    pub badge_score: i64,
    pub max_score: u32,
    pub rank: Rank,
    pub rank_label: &'static str,
    pub rank_description: &'static str,
    pub rank_tone: &'static str,
    pub categories: Vec<CategoryRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeView {
    pub score: f64,
    pub max: u32,
    pub proportion: f64,
    pub rounded_score: i64,
    pub color: &'static str,
    pub accessible_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarPoint {
    pub criterion_id: &'static str,
    pub label: &'static str,
    pub score: ScoreValue,
    pub scale_label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBarSeries {
    pub category_id: &'static str,
    pub points: Vec<BarPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarPoint {
    pub subject: String,
    pub full_subject: &'static str,
    pub value: i64,
    pub full_mark: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarView {
    pub points: Vec<RadarPoint>,
    pub accessible_summary: String,
}

/// Everything the chart collaborator needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub gauge: GaugeView,
    pub radar: RadarView,
    pub bars: Vec<CategoryBarSeries>,
}
