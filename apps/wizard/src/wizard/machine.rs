//! Pure wizard state. Every transition takes the current state by reference
//! and returns the next one; nothing here touches I/O.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::completion::CompletionSet;
use super::WizardError;
use crate::models::advice::CareerAdviceResponse;
use crate::models::profile::ExtractedProfile;
use crate::models::session::SessionContext;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    #[default]
    Idle,
    Loading,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Onboarding,
    Upload,
    Analyze,
    Advice,
    Plan,
}

/// A remote-backed wizard operation. At most one runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Onboarding,
    Upload,
    Analyze,
    Advice,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Onboarding => "role validation",
            Operation::Upload => "résumé upload",
            Operation::Analyze => "profile analysis",
            Operation::Advice => "advice generation",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub session: SessionContext,
    pub resume_filename: Option<String>,
    pub resume_text: Option<String>,
    pub profile: Option<ExtractedProfile>,
    pub advice: Option<CareerAdviceResponse>,
    pub completed: CompletionSet,
    pub expanded_week: Option<u32>,
    pub status: WizardStatus,
    pub step: WizardStep,
    pub last_error: Option<String>,
    /// Bumped on every reset; results of calls started under an older epoch are dropped.
    pub epoch: u64,
    pub flow_id: Option<Uuid>,
}

impl WizardState {
    /// State rebuilt from persisted data. `completed` must already be clamped
    /// to the plan's weeks.
    pub fn rehydrated(
        session: SessionContext,
        advice: Option<CareerAdviceResponse>,
        completed: CompletionSet,
    ) -> Self {
        let (status, step, completed) = match &advice {
            Some(_) => (WizardStatus::Success, WizardStep::Plan, completed),
            None if session.is_complete() => {
                (WizardStatus::Idle, WizardStep::Upload, CompletionSet::new())
            }
            None => (WizardStatus::Idle, WizardStep::Onboarding, CompletionSet::new()),
        };
        Self {
            session,
            advice,
            completed,
            status,
            step,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == WizardStatus::Loading
    }

    pub fn begin(&self, operation: Operation) -> Result<Self, WizardError> {
        if self.is_loading() {
            return Err(WizardError::Busy(operation));
        }
        Ok(Self {
            status: WizardStatus::Loading,
            last_error: None,
            ..self.clone()
        })
    }

    pub fn failed(&self, message: impl Into<String>) -> Self {
        Self {
            status: WizardStatus::Error,
            last_error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn onboarded(&self, session: SessionContext) -> Self {
        Self {
            session,
            status: WizardStatus::Success,
            step: WizardStep::Upload,
            last_error: None,
            flow_id: Some(Uuid::new_v4()),
            ..self.clone()
        }
    }

    /// A new résumé invalidates any profile extracted from the previous one.
    pub fn resume_parsed(&self, filename: String, text: String) -> Self {
        Self {
            resume_filename: Some(filename),
            resume_text: Some(text),
            profile: None,
            status: WizardStatus::Success,
            step: WizardStep::Analyze,
            last_error: None,
            ..self.clone()
        }
    }

    pub fn profile_extracted(&self, profile: ExtractedProfile) -> Self {
        Self {
            profile: Some(profile),
            status: WizardStatus::Success,
            step: WizardStep::Advice,
            last_error: None,
            ..self.clone()
        }
    }

    /// New advice always starts with an empty completion set.
    pub fn advised(&self, advice: CareerAdviceResponse) -> Self {
        Self {
            advice: Some(advice),
            completed: CompletionSet::new(),
            expanded_week: None,
            status: WizardStatus::Success,
            step: WizardStep::Plan,
            last_error: None,
            ..self.clone()
        }
    }

    pub fn week_toggled(&self, week: u32) -> Result<Self, WizardError> {
        self.require_week(week)?;
        Ok(Self {
            completed: self.completed.toggled(week),
            ..self.clone()
        })
    }

    /// Opens `week` and closes any other; toggling the open week closes it.
    pub fn expansion_toggled(&self, week: u32) -> Result<Self, WizardError> {
        self.require_week(week)?;
        let expanded_week = match self.expanded_week {
            Some(open) if open == week => None,
            _ => Some(week),
        };
        Ok(Self {
            expanded_week,
            ..self.clone()
        })
    }

    pub fn reset(&self) -> Self {
        Self {
            epoch: self.epoch + 1,
            ..Self::default()
        }
    }

    fn require_week(&self, week: u32) -> Result<(), WizardError> {
        let advice = self.advice.as_ref().ok_or(WizardError::NoPlan)?;
        if !advice.contains_week(week) {
            return Err(WizardError::UnknownWeek(week));
        }
        Ok(())
    }
}
