use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::machine::{WizardState, WizardStatus, WizardStep};
use crate::models::profile::ExtractedProfile;
use crate::models::session::SessionContext;
use crate::plan::PlanView;

/// Snapshot of the wizard handed to the UI and to subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub status: WizardStatus,
    pub step: WizardStep,
    pub session: SessionContext,
    pub resume_filename: Option<String>,
    pub has_resume_text: bool,
    pub profile: Option<ExtractedProfile>,
    pub plan: Option<PlanView>,
    pub last_error: Option<String>,
    pub flow_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<&WizardState> for WizardView {
    fn from(state: &WizardState) -> Self {
        Self {
            status: state.status,
            step: state.step,
            session: state.session.clone(),
            resume_filename: state.resume_filename.clone(),
            has_resume_text: state
                .resume_text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty()),
            profile: state.profile.clone(),
            plan: state
                .advice
                .as_ref()
                .map(|advice| PlanView::build(advice, &state.completed, state.expanded_week)),
            last_error: state.last_error.clone(),
            flow_id: state.flow_id,
            updated_at: Utc::now(),
        }
    }
}
