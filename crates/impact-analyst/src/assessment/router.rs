use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::session::{lock_session, ConfirmationFlag, SharedSession};
use crate::error::AppError;
use crate::export::ExportCoordinator;

/// Session plus the coordinator that exports it.
#[derive(Debug, Clone)]
pub struct AssessmentState {
    pub session: SharedSession,
    pub exports: Arc<ExportCoordinator>,
}

impl AssessmentState {
    pub fn new(session: SharedSession, exports: Arc<ExportCoordinator>) -> Self {
        Self { session, exports }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreUpdate {
    value: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetRequest {
    #[serde(default)]
    confirm: bool,
}

/// Router builder exposing the single assessment session over HTTP.
pub fn assessment_router(state: AssessmentState) -> Router {
    Router::new()
        .route("/api/v1/assessment", get(overview_handler))
        .route(
            "/api/v1/assessment/scores/:category_id/:criterion_id",
            put(score_handler),
        )
        .route(
            "/api/v1/assessment/sections/:category_id/toggle",
            post(toggle_handler),
        )
        .route("/api/v1/assessment/reset", post(reset_handler))
        .route("/api/v1/assessment/charts", get(charts_handler))
        .route("/api/v1/assessment/report", get(report_handler))
        .route("/api/v1/assessment/export/pdf", post(export_pdf_handler))
        .route("/api/v1/assessment/export/print", post(export_print_handler))
        .with_state(state)
}

pub(crate) async fn overview_handler(State(state): State<AssessmentState>) -> Response {
    let session = lock_session(&state.session);
    let payload = json!({
        "scores": session.store(),
        "visibility": session.visibility(),
        "export_mode": session.is_export_mode(),
        "export_busy": state.exports.is_busy(),
        "summary": session.result().summary(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn score_handler(
    State(state): State<AssessmentState>,
    Path((category_id, criterion_id)): Path<(String, String)>,
    Json(update): Json<ScoreUpdate>,
) -> Result<Response, AppError> {
    let mut session = lock_session(&state.session);
    let previous = session.set_score_points(&category_id, &criterion_id, update.value)?;
    let payload = json!({
        "category_id": category_id,
        "criterion_id": criterion_id,
        "value": session.score(&category_id, &criterion_id),
        "previous": previous,
        "summary": session.result().summary(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn toggle_handler(
    State(state): State<AssessmentState>,
    Path(category_id): Path<String>,
) -> Result<Response, AppError> {
    let visibility = lock_session(&state.session).toggle_section(&category_id)?;
    Ok((StatusCode::OK, Json(json!({ "visibility": visibility }))).into_response())
}

pub(crate) async fn reset_handler(
    State(state): State<AssessmentState>,
    Json(request): Json<ResetRequest>,
) -> Result<Response, AppError> {
    let mut session = lock_session(&state.session);
    let reset = session.reset(&ConfirmationFlag(request.confirm))?;
    let payload = json!({
        "reset": reset,
        "visibility": session.visibility(),
        "summary": session.result().summary(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn charts_handler(State(state): State<AssessmentState>) -> Response {
    let charts = lock_session(&state.session).charts();
    (StatusCode::OK, Json(charts)).into_response()
}

pub(crate) async fn report_handler(State(state): State<AssessmentState>) -> Response {
    let document = lock_session(&state.session).document(Local::now().date_naive());
    Html(document.html).into_response()
}

pub(crate) async fn export_pdf_handler(
    State(state): State<AssessmentState>,
) -> Result<Response, AppError> {
    let report = state
        .exports
        .export_pdf(&state.session, Local::now().date_naive())
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    )
        .into_response())
}

pub(crate) async fn export_print_handler(
    State(state): State<AssessmentState>,
) -> Result<Response, AppError> {
    state.exports.export_print(&state.session).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "submitted" }))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AssessmentSession, SectionState};
    use crate::export::{PdfOptions, PdfRenderer, PrintGateway, RenderError, ReportDocument};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StaticRenderer;

    #[async_trait]
    impl PdfRenderer for StaticRenderer {
        async fn render(
            &self,
            _document: &ReportDocument,
            _options: &PdfOptions,
        ) -> Result<Vec<u8>, RenderError> {
            Ok(b"%PDF-1.7".to_vec())
        }
    }

    #[derive(Debug)]
    struct FailingPrinter;

    #[async_trait]
    impl PrintGateway for FailingPrinter {
        async fn print(&self, _document: &ReportDocument) -> Result<(), RenderError> {
            Err(RenderError::Backend("no printer configured".to_string()))
        }
    }

    fn state() -> AssessmentState {
        let exports = ExportCoordinator::new(
            Arc::new(StaticRenderer),
            Arc::new(FailingPrinter),
            Duration::from_millis(1),
            Duration::from_millis(1),
        );
        AssessmentState::new(
            AssessmentSession::standard().into_shared(),
            Arc::new(exports),
        )
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn score_update_recomputes_summary() {
        let router = assessment_router(state());
        let response = router
            .oneshot(json_request(
                "PUT",
                "/api/v1/assessment/scores/c2/2.1",
                json!({ "value": 3 }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["value"], 3);
        assert_eq!(body["previous"], 0);
        assert_eq!(body["summary"]["total_display"], "12.0");
        assert_eq!(body["summary"]["rank"], "FAILED");
    }

    #[tokio::test]
    async fn out_of_range_score_is_bad_request() {
        let router = assessment_router(state());
        let response = router
            .oneshot(json_request(
                "PUT",
                "/api/v1/assessment/scores/c1/1.1",
                json!({ "value": 4 }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "score 4 is outside the 0-3 scale");
    }

    #[tokio::test]
    async fn reset_requires_confirmation() {
        let state = state();
        lock_session(&state.session)
            .set_score_points("c1", "1.1", 2)
            .expect("valid score");

        let declined = score_reset(&state, false).await;
        assert_eq!(declined["reset"], false);
        assert_eq!(
            lock_session(&state.session).score("c1", "1.1").points(),
            2
        );

        let confirmed = score_reset(&state, true).await;
        assert_eq!(confirmed["reset"], true);
        assert_eq!(confirmed["summary"]["total_score"], 0.0);
    }

    async fn score_reset(state: &AssessmentState, confirm: bool) -> Value {
        let response = reset_handler(
            State(state.clone()),
            Json(ResetRequest { confirm }),
        )
        .await
        .expect("reset handled");
        json_body(response).await
    }

    #[tokio::test]
    async fn reset_during_export_is_a_conflict() {
        let state = state();
        lock_session(&state.session).enter_export_mode();

        let response = reset_handler(State(state.clone()), Json(ResetRequest { confirm: true }))
            .await
            .expect_err("export mode blocks reset")
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let mut session = lock_session(&state.session);
        assert_eq!(session.visibility(), &SectionState::All);
        assert_eq!(session.exit_export_mode(), SectionState::One("c1".to_string()));
    }

    #[tokio::test]
    async fn toggle_collapses_open_section() {
        let state = state();
        let response = toggle_handler(State(state.clone()), Path("c1".to_string()))
            .await
            .expect("toggle handled");
        let body = json_body(response).await;
        assert_eq!(body["visibility"]["mode"], "none");
        assert_eq!(
            lock_session(&state.session).visibility(),
            &SectionState::None
        );
    }

    #[tokio::test]
    async fn pdf_export_returns_attachment() {
        let state = state();
        let router = assessment_router(state.clone());
        let response = router
            .oneshot(
                Request::post("/api/v1/assessment/export/pdf")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"AI-Data-Impact-Report-"));
        assert!(!state.exports.is_busy());
    }

    #[tokio::test]
    async fn print_failure_reports_fixed_message_and_restores_sections() {
        let state = state();
        let response = export_print_handler(State(state.clone()))
            .await
            .expect_err("printer fails")
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Fehler beim Generieren des PDFs.");
        assert_eq!(
            lock_session(&state.session).visibility(),
            &SectionState::One("c1".to_string())
        );
    }

    #[tokio::test]
    async fn report_is_served_as_html() {
        let router = assessment_router(state());
        let response = router
            .oneshot(
                Request::get("/api/v1/assessment/report")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let html = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(html.contains("Ergebnis Details"));
    }
}
