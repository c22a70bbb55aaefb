//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use study_dashboard_core::{ports::StudyRepository, StudyTools};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn StudyRepository>,
    pub study_tools: StudyTools,
}

impl AppState {
    pub fn new(repo: Arc<dyn StudyRepository>, study_tools: StudyTools) -> Self {
        Self { repo, study_tools }
    }
}
