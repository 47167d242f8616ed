//! Weighted KPI assessment: schema, scores, aggregation and the
//! reviewer's section state.

mod domain;
pub mod report;
mod router;
mod schema;
mod session;
mod store;
mod visibility;

pub use domain::{
    AssessmentError, Category, Criterion, Rank, ScoreValue, MAX_CRITERION_SCORE, MAX_TOTAL_SCORE,
};
pub use report::{AssessmentResult, AssessmentSummary, CategoryResult, ChartSeries};
pub use router::{assessment_router, AssessmentState};
pub use schema::AssessmentSchema;
pub use session::{
    lock_session, AssessmentSession, ConfirmationFlag, ConfirmationPrompt, SharedSession,
    RESET_PROMPT,
};
pub use store::ScoreStore;
pub use visibility::{SectionState, SectionVisibility, VisibilityError};
