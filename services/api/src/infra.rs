use clap::Args;
use impact_analyst::assessment::{AssessmentSchema, AssessmentSession, ScoreValue};
use impact_analyst::config::ExportConfig;
use impact_analyst::error::AppError;
use impact_analyst::export::{ExportCoordinator, SpoolerPrinter, WkhtmltopdfRenderer};
use impact_analyst::score_sheet::ScoreSheetImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One `--score category:criterion=value` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreAssignment {
    pub(crate) category_id: String,
    pub(crate) criterion_id: String,
    pub(crate) value: ScoreValue,
}

/// Score inputs shared by the `report` and `export` commands.
#[derive(Args, Debug, Default)]
pub(crate) struct ScoreInputArgs {
    /// Score a criterion, e.g. `--score c1:1.1=3`. Repeatable; applied after the CSV sheet.
    #[arg(long = "score", value_parser = parse_score_assignment)]
    pub(crate) scores: Vec<ScoreAssignment>,
    /// CSV score sheet with `category_id,criterion_id,score` columns
    #[arg(long)]
    pub(crate) scores_csv: Option<PathBuf>,
}

impl ScoreInputArgs {
    /// Builds a fresh session from the sheet (if any) and the individual flags.
    pub(crate) fn build_session(&self) -> Result<AssessmentSession, AppError> {
        let schema = Arc::new(AssessmentSchema::standard());
        let mut session = match &self.scores_csv {
            Some(path) => {
                let store = ScoreSheetImporter::from_path(path, &schema)?;
                AssessmentSession::from_store(schema, store)
            }
            None => AssessmentSession::new(schema),
        };

        for assignment in &self.scores {
            session.set_score(
                &assignment.category_id,
                &assignment.criterion_id,
                assignment.value,
            )?;
        }

        Ok(session)
    }
}

pub(crate) fn parse_score_assignment(raw: &str) -> Result<ScoreAssignment, String> {
    let invalid = || format!("expected CATEGORY:CRITERION=SCORE (e.g. c1:1.1=3), got '{raw}'");

    let (target, value) = raw.trim().split_once('=').ok_or_else(invalid)?;
    let (category_id, criterion_id) = target.split_once(':').ok_or_else(invalid)?;
    if category_id.trim().is_empty() || criterion_id.trim().is_empty() {
        return Err(invalid());
    }

    let points: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("score in '{raw}' must be 0, 1, 2 or 3"))?;
    let value = ScoreValue::try_from(points).map_err(|err| err.to_string())?;

    Ok(ScoreAssignment {
        category_id: category_id.trim().to_string(),
        criterion_id: criterion_id.trim().to_string(),
        value,
    })
}

pub(crate) fn export_coordinator(config: &ExportConfig) -> Arc<ExportCoordinator> {
    let renderer = Arc::new(WkhtmltopdfRenderer::from_config(config));
    let printer = Arc::new(SpoolerPrinter::from_config(renderer.clone(), config));
    Arc::new(ExportCoordinator::from_config(renderer, printer, config))
}
