mod charts;
mod engine;
pub mod views;

pub use engine::compute;
pub use views::{AssessmentResult, AssessmentSummary, CategoryResult, ChartSeries};

pub(crate) use charts::build_chart_series;
