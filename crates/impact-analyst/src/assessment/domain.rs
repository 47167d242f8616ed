use super::visibility::VisibilityError;
use serde::{Deserialize, Serialize};

/// Highest points a single criterion can earn.
pub const MAX_CRITERION_SCORE: u8 = 3;

/// Fixed ceiling of the weighted total: weights sum to 100, criteria top out at 3.
pub const MAX_TOTAL_SCORE: u32 = 300;

/// Reviewer verdict for a single criterion on the 0-3 scale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScoreValue {
    #[default]
    NotMet,
    Partial,
    Met,
    Exceeded,
}

impl ScoreValue {
    pub const fn ordered() -> [Self; 4] {
        [Self::NotMet, Self::Partial, Self::Met, Self::Exceeded]
    }

    pub const fn points(self) -> u8 {
        match self {
            Self::NotMet => 0,
            Self::Partial => 1,
            Self::Met => 2,
            Self::Exceeded => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotMet => "Nicht erfüllt",
            Self::Partial => "Teilweise",
            Self::Met => "Erfüllt",
            Self::Exceeded => "Übertroffen",
        }
    }

    /// Bar color used by the per-category chart.
    pub const fn color(self) -> &'static str {
        match self {
            Self::NotMet => "#ef4444",
            Self::Partial => "#f59e0b",
            Self::Met => "#10b981",
            Self::Exceeded => "#3b82f6",
        }
    }
}

impl TryFrom<u8> for ScoreValue {
    type Error = AssessmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotMet),
            1 => Ok(Self::Partial),
            2 => Ok(Self::Met),
            3 => Ok(Self::Exceeded),
            other => Err(AssessmentError::InvalidScore(other.into())),
        }
    }
}

impl From<ScoreValue> for u8 {
    fn from(value: ScoreValue) -> Self {
        value.points()
    }
}

/// Rank tier derived from the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Top,
    Good,
    Critical,
    Failed,
}

impl Rank {
    /// Tiers in descending threshold order; classification walks this list.
    pub const fn ordered() -> [Self; 4] {
        [Self::Top, Self::Good, Self::Critical, Self::Failed]
    }

    /// Inclusive lower bound of the tier.
    pub const fn min_score(self) -> f64 {
        match self {
            Self::Top => 240.0,
            Self::Good => 180.0,
            Self::Critical => 120.0,
            Self::Failed => 0.0,
        }
    }

    /// Upper bound shown to reviewers. Not used for classification.
    pub const fn display_max(self) -> u32 {
        match self {
            Self::Top => 300,
            Self::Good => 239,
            Self::Critical => 179,
            Self::Failed => 119,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Good => "GUT",
            Self::Critical => "KRITISCH",
            Self::Failed => "NICHT ERFOLGREICH",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Top => "Mehrwert klar, skalieren.",
            Self::Good => "Weiterführen, Optimierung einplanen.",
            Self::Critical => "Nur weiter mit klarer Nachsteuerung.",
            Self::Failed => "Stoppen oder neu aufsetzen.",
        }
    }

    pub const fn tone(self) -> &'static str {
        match self {
            Self::Top => "emerald",
            Self::Good => "blue",
            Self::Critical => "amber",
            Self::Failed => "red",
        }
    }

    /// First tier whose minimum the total reaches. Anything below every
    /// threshold (including NaN) lands in `Failed`.
    pub fn classify(total_score: f64) -> Self {
        Self::ordered()
            .into_iter()
            .find(|rank| total_score >= rank.min_score())
            .unwrap_or(Self::Failed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Criterion {
    pub id: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub weight: u8,
    pub criteria: Vec<Criterion>,
}

impl Category {
    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id == criterion_id)
    }

    /// Weighted ceiling for the category (3 x weight).
    pub fn max_potential(&self) -> u32 {
        u32::from(MAX_CRITERION_SCORE) * u32::from(self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("score {0} is outside the 0-3 scale")]
    InvalidScore(i64),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown criterion '{criterion_id}' in category '{category_id}'")]
    UnknownCriterion {
        category_id: String,
        criterion_id: String,
    },
    #[error("schema must declare at least one category")]
    EmptySchema,
    #[error("category '{0}' is declared more than once")]
    DuplicateCategory(String),
    #[error("category '{0}' has no criteria")]
    EmptyCategory(String),
    #[error("criterion '{criterion_id}' is declared twice in category '{category_id}'")]
    DuplicateCriterion {
        category_id: String,
        criterion_id: String,
    },
    #[error("category weights sum to {0}, expected 100")]
    WeightMismatch(u32),
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
}
