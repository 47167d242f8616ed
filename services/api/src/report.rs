use crate::infra::ScoreInputArgs;
use chrono::Local;
use clap::{Args, ValueEnum};
use impact_analyst::assessment::{AssessmentSession, SectionState};
use impact_analyst::error::AppError;
use impact_analyst::export::{render_report, REPORT_TITLE};
use serde_json::json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Text,
    Json,
    Html,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) input: ScoreInputArgs,
    /// List every criterion, not only the first section
    #[arg(long)]
    pub(crate) expand_all: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let session = args.input.build_session()?;
    let visibility = if args.expand_all {
        SectionState::All
    } else {
        session.visibility().clone()
    };

    let output = match args.format {
        ReportFormat::Text => render_text(&session, &visibility),
        ReportFormat::Json => render_json(&session, &visibility)?,
        ReportFormat::Html => {
            let result = session.result();
            render_report(
                session.schema(),
                session.store(),
                &visibility,
                &result,
                &session.charts(),
                Local::now().date_naive(),
            )
            .html
        }
    };

    println!("{output}");
    Ok(())
}

fn render_text(session: &AssessmentSession, visibility: &SectionState) -> String {
    let result = session.result();
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!(
            "Gesamt: {} / {} Punkte ({})",
            result.total_display(),
            result.max_score,
            result.rank.label()
        ),
        result.rank.description().to_string(),
        String::new(),
    ];

    for (category, score) in session
        .schema()
        .categories()
        .iter()
        .zip(&result.category_scores)
    {
        lines.push(format!(
            "{} [{}%]: {:.1} / {} ({:.0}%)",
            category.title,
            category.weight,
            score.weighted_score,
            score.max_potential,
            score.percentage
        ));

        if visibility.is_expanded(category.id) {
            for criterion in &category.criteria {
                let value = session.score(category.id, criterion.id);
                lines.push(format!(
                    "  {} {} - {} ({})",
                    criterion.id,
                    criterion.text,
                    value.points(),
                    value.label()
                ));
            }
        }
    }

    lines.join("\n")
}

fn render_json(session: &AssessmentSession, visibility: &SectionState) -> Result<String, AppError> {
    let payload = json!({
        "summary": session.result().summary(),
        "visibility": visibility,
        "scores": session.store(),
        "charts": session.charts(),
    });
    serde_json::to_string_pretty(&payload).map_err(|err| AppError::Io(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::parse_score_assignment;
    use serde_json::Value;

    fn session() -> AssessmentSession {
        ScoreInputArgs {
            scores: vec![
                parse_score_assignment("c1:1.1=3").expect("valid"),
                parse_score_assignment("c7:7.2=2").expect("valid"),
            ],
            scores_csv: None,
        }
        .build_session()
        .expect("session builds")
    }

    #[test]
    fn text_report_lists_only_expanded_criteria() {
        let session = session();
        let text = render_text(&session, session.visibility());

        assert!(text.contains("Gesamt: 12.3 / 300 Punkte (NICHT ERFOLGREICH)"));
        assert!(text.contains("  1.1 "));
        assert!(!text.contains("  7.2 "));
    }

    #[test]
    fn expand_all_lists_every_criterion() {
        let session = session();
        let text = render_text(&session, &SectionState::All);
        assert!(text.contains("  7.2 "));
        assert!(text.contains("2 (Erfüllt)"));
    }

    #[test]
    fn json_report_carries_summary_and_charts() {
        let session = session();
        let rendered = render_json(&session, &SectionState::All).expect("json renders");
        let body: Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(body["summary"]["rank"], "FAILED");
        assert_eq!(body["visibility"]["mode"], "all");
        assert_eq!(body["scores"]["c1"]["1.1"], 3);
        assert_eq!(body["charts"]["radar"]["points"][0]["subject"], "Cat 1");
    }
}
