pub mod assessment;
pub mod config;
pub mod error;
pub mod export;
pub mod score_sheet;
pub mod telemetry;
