use crate::{
    analysis::{client::Analyzer, prompt::build_prompt},
    foundation::error::XsheetResult,
    sheet::model::SheetData,
};

/// Shown when the model answers with no text.
pub const EMPTY_ANALYSIS_TEXT: &str = "No analysis generated.";

/// Lifecycle of one analysis panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    /// Prose returned by the model.
    Ready(String),
    /// Error message, surfaced verbatim.
    Failed(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Ready(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Drives analysis requests for the loaded sheet. Failures never escape: they land in
/// [`AnalysisState::Failed`] and the caller may simply run again.
#[derive(Debug, Default)]
pub struct AnalysisPanel {
    state: AnalysisState,
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Enter `Loading`, clearing any previous result or error.
    pub fn begin(&mut self) {
        self.state = AnalysisState::Loading;
    }

    /// Record the outcome of a request started with [`AnalysisPanel::begin`].
    pub fn finish(&mut self, outcome: XsheetResult<String>) {
        self.state = match outcome {
            Ok(text) if text.trim().is_empty() => AnalysisState::Ready(EMPTY_ANALYSIS_TEXT.to_string()),
            Ok(text) => AnalysisState::Ready(text),
            Err(e) => {
                tracing::warn!(error = %e, "analysis failed");
                AnalysisState::Failed(e.user_message())
            }
        };
    }

    /// Build the prompt for `sheet`, call `analyzer`, and store the outcome. Safe to call again
    /// from any state to retry or regenerate.
    pub fn run(&mut self, analyzer: &dyn Analyzer, sheet: &SheetData) -> &AnalysisState {
        self.begin();
        let prompt = build_prompt(sheet);
        self.finish(analyzer.generate(&prompt));
        &self.state
    }

    /// Back to `Idle`, e.g. when the sheet is cleared.
    pub fn reset(&mut self) {
        self.state = AnalysisState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/state.rs"]
mod tests;
