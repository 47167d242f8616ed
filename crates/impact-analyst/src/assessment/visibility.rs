use serde::Serialize;

/// Which checklist sections are expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "category_id", rename_all = "snake_case")]
pub enum SectionState {
    None,
    One(String),
    All,
}

impl SectionState {
    pub fn is_expanded(&self, category_id: &str) -> bool {
        match self {
            SectionState::None => false,
            SectionState::One(open) => open == category_id,
            SectionState::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisibilityError {
    #[error("sections cannot be toggled while the report is expanded for export")]
    ExportModeActive,
}

/// Single-expansion state machine with an export-only "all expanded" mode.
///
/// Entering export mode remembers the interactive state so that leaving it
/// restores exactly what the reviewer had open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVisibility {
    initial: SectionState,
    state: SectionState,
    previous: Option<SectionState>,
}

impl SectionVisibility {
    pub fn new(first_category_id: &str) -> Self {
        let initial = SectionState::One(first_category_id.to_string());
        Self {
            state: initial.clone(),
            initial,
            previous: None,
        }
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }

    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.state.is_expanded(category_id)
    }

    pub fn is_export_mode(&self) -> bool {
        self.state == SectionState::All
    }

    pub fn toggle(&mut self, category_id: &str) -> Result<&SectionState, VisibilityError> {
        self.state = match &self.state {
            SectionState::All => return Err(VisibilityError::ExportModeActive),
            SectionState::One(open) if open == category_id => SectionState::None,
            SectionState::One(_) | SectionState::None => {
                SectionState::One(category_id.to_string())
            }
        };
        Ok(&self.state)
    }

    /// Expands everything and returns the state that will be restored.
    pub fn enter_export_mode(&mut self) -> SectionState {
        if !self.is_export_mode() {
            let current = std::mem::replace(&mut self.state, SectionState::All);
            self.previous = Some(current);
        }
        self.previous.clone().unwrap_or(SectionState::All)
    }

    pub fn exit_export_mode(&mut self) -> &SectionState {
        if let Some(previous) = self.previous.take() {
            self.state = previous;
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.previous = None;
    }
}
