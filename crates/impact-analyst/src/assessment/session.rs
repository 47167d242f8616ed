use super::domain::{AssessmentError, ScoreValue};
use super::report::{self, AssessmentResult, ChartSeries};
use super::schema::AssessmentSchema;
use super::store::ScoreStore;
use super::visibility::{SectionState, SectionVisibility, VisibilityError};
use crate::export::document::{render_report, ReportDocument};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const RESET_PROMPT: &str = "Wollen Sie wirklich alle Bewertungen zurücksetzen?";

/// Handle shared between the HTTP layer and the export coordinator.
pub type SharedSession = Arc<Mutex<AssessmentSession>>;

/// Locks the session. Every mutation leaves the session consistent, so a
/// poisoned lock is still safe to use.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, AssessmentSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Blocking yes/no question asked before destructive actions.
pub trait ConfirmationPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Answer collected up front, e.g. from a request body.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationFlag(pub bool);

impl ConfirmationPrompt for ConfirmationFlag {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// The single reviewer's working state: scores plus expanded sections.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    schema: Arc<AssessmentSchema>,
    store: ScoreStore,
    visibility: SectionVisibility,
}

impl AssessmentSession {
    pub fn new(schema: Arc<AssessmentSchema>) -> Self {
        let store = ScoreStore::seeded(&schema);
        Self::from_store(schema, store)
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(AssessmentSchema::standard()))
    }

    pub fn from_store(schema: Arc<AssessmentSchema>, store: ScoreStore) -> Self {
        let visibility = SectionVisibility::new(schema.first_category_id());
        Self {
            schema,
            store,
            visibility,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn schema(&self) -> &AssessmentSchema {
        &self.schema
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    pub fn visibility(&self) -> &SectionState {
        self.visibility.state()
    }

    pub fn set_score(
        &mut self,
        category_id: &str,
        criterion_id: &str,
        value: ScoreValue,
    ) -> Result<ScoreValue, AssessmentError> {
        self.schema.resolve(category_id, criterion_id)?;
        let previous = self.store.set_score(category_id, criterion_id, value)?;
        debug!(
            category_id,
            criterion_id,
            from = previous.points(),
            to = value.points(),
            "score updated"
        );
        Ok(previous)
    }

    /// Same as [`set_score`](Self::set_score) for raw input such as request
    /// bodies; anything outside 0-3 is rejected.
    pub fn set_score_points(
        &mut self,
        category_id: &str,
        criterion_id: &str,
        points: i64,
    ) -> Result<ScoreValue, AssessmentError> {
        let value = u8::try_from(points)
            .map_err(|_| AssessmentError::InvalidScore(points))
            .and_then(ScoreValue::try_from)?;
        self.set_score(category_id, criterion_id, value)
    }

    pub fn score(&self, category_id: &str, criterion_id: &str) -> ScoreValue {
        self.store.score(category_id, criterion_id)
    }

    pub fn result(&self) -> AssessmentResult {
        report::compute(&self.schema, &self.store)
    }

    pub fn charts(&self) -> ChartSeries {
        let result = self.result();
        report::build_chart_series(&self.schema, &self.store, &result)
    }

    pub fn toggle_section(&mut self, category_id: &str) -> Result<SectionState, AssessmentError> {
        if self.schema.category(category_id).is_none() {
            return Err(AssessmentError::UnknownCategory(category_id.to_string()));
        }
        let state = self.visibility.toggle(category_id)?.clone();
        debug!(category_id, ?state, "section toggled");
        Ok(state)
    }

    /// Clears every score and reopens the first section, but only after the
    /// prompt answers yes. Returns whether the reset happened. Refused while
    /// an export holds the sections expanded, so the export can still restore
    /// them.
    pub fn reset(&mut self, prompt: &dyn ConfirmationPrompt) -> Result<bool, AssessmentError> {
        if self.visibility.is_export_mode() {
            return Err(VisibilityError::ExportModeActive.into());
        }
        if !prompt.confirm(RESET_PROMPT) {
            debug!("reset declined");
            return Ok(false);
        }

        self.store.reset(&self.schema);
        self.visibility.reset();
        info!("assessment reset");
        Ok(true)
    }

    pub fn is_export_mode(&self) -> bool {
        self.visibility.is_export_mode()
    }

    pub(crate) fn enter_export_mode(&mut self) -> SectionState {
        self.visibility.enter_export_mode()
    }

    pub(crate) fn exit_export_mode(&mut self) -> SectionState {
        self.visibility.exit_export_mode().clone()
    }

    /// Renders the report as currently expanded.
    pub fn document(&self, generated_on: NaiveDate) -> ReportDocument {
        let result = self.result();
        let charts = report::build_chart_series(&self.schema, &self.store, &result);
        render_report(
            &self.schema,
            &self.store,
            self.visibility.state(),
            &result,
            &charts,
            generated_on,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::Rank;
    use std::cell::RefCell;

    struct RecordingPrompt {
        answer: bool,
        asked: RefCell<Vec<String>>,
    }

    impl ConfirmationPrompt for RecordingPrompt {
        fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    #[test]
    fn new_session_starts_empty_with_first_section_open() {
        let session = AssessmentSession::standard();
        let result = session.result();
        assert_eq!(result.total_score, 0.0);
        assert_eq!(result.rank, Rank::Failed);
        assert_eq!(session.visibility(), &SectionState::One("c1".to_string()));
    }

    #[test]
    fn set_score_points_rejects_out_of_range_values() {
        let mut session = AssessmentSession::standard();
        assert_eq!(
            session.set_score_points("c1", "1.1", 4),
            Err(AssessmentError::InvalidScore(4))
        );
        assert_eq!(
            session.set_score_points("c1", "1.1", -1),
            Err(AssessmentError::InvalidScore(-1))
        );
        assert_eq!(session.score("c1", "1.1"), ScoreValue::NotMet);
    }

    #[test]
    fn score_changes_are_reflected_on_next_read() {
        let mut session = AssessmentSession::standard();
        session
            .set_score_points("c3", "3.1", 3)
            .expect("valid score");
        let result = session.result();
        let c3 = result.category("c3").expect("c3 present");
        assert!((c3.weighted_score - 12.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_rejects_unknown_sections() {
        let mut session = AssessmentSession::standard();
        assert_eq!(
            session.toggle_section("c42"),
            Err(AssessmentError::UnknownCategory("c42".to_string()))
        );
    }

    #[test]
    fn declined_reset_changes_nothing() {
        let mut session = AssessmentSession::standard();
        session
            .set_score_points("c2", "2.2", 2)
            .expect("valid score");
        session.toggle_section("c4").expect("toggle");

        let prompt = RecordingPrompt {
            answer: false,
            asked: RefCell::new(Vec::new()),
        };
        assert_eq!(session.reset(&prompt), Ok(false));
        assert_eq!(prompt.asked.borrow().as_slice(), [RESET_PROMPT]);
        assert_eq!(session.score("c2", "2.2"), ScoreValue::Met);
        assert_eq!(session.visibility(), &SectionState::One("c4".to_string()));
    }

    #[test]
    fn confirmed_reset_restores_initial_state() {
        let mut session = AssessmentSession::standard();
        session
            .set_score_points("c2", "2.2", 2)
            .expect("valid score");
        session
            .set_score_points("c7", "7.1", 1)
            .expect("valid score");
        session.toggle_section("c1").expect("collapse");

        assert_eq!(session.reset(&ConfirmationFlag(true)), Ok(true));

        let fresh = AssessmentSession::standard();
        assert_eq!(session.store(), fresh.store());
        assert_eq!(session.visibility(), fresh.visibility());
    }

    #[test]
    fn reset_is_refused_while_sections_are_expanded_for_export() {
        let mut session = AssessmentSession::standard();
        session
            .set_score_points("c5", "5.1", 3)
            .expect("valid score");
        session.toggle_section("c5").expect("toggle");
        session.enter_export_mode();

        let prompt = RecordingPrompt {
            answer: true,
            asked: RefCell::new(Vec::new()),
        };
        assert_eq!(
            session.reset(&prompt),
            Err(AssessmentError::Visibility(VisibilityError::ExportModeActive))
        );
        assert!(prompt.asked.borrow().is_empty());
        assert_eq!(session.score("c5", "5.1"), ScoreValue::Exceeded);

        assert_eq!(
            session.exit_export_mode(),
            SectionState::One("c5".to_string())
        );
        assert_eq!(session.reset(&prompt), Ok(true));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let shared = AssessmentSession::standard().into_shared();
        let clone = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().expect("first lock");
            panic!("poison the session lock");
        })
        .join();

        assert!(shared.is_poisoned());
        assert_eq!(lock_session(&shared).result().total_score, 0.0);
    }
}
