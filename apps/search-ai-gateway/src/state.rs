//! Application state management

use domain_search_ai::SearchAIService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub service: SearchAIService,
}
