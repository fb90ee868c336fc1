use std::sync::Arc;

use crate::config::Config;
use crate::wizard::WizardController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub wizard: Arc<WizardController>,
    pub config: Config,
}
