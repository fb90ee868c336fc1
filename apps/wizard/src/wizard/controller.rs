use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

use super::completion::CompletionSet;
use super::machine::{Operation, WizardState};
use super::persist::{self, PersistedWizard};
use super::view::WizardView;
use super::WizardError;
use crate::collaborators::{Collaborators, RemoteError, ResumeUpload};
use crate::models::advice::CareerAdviceResponse;
use crate::models::session::{Level, SessionContext};
use crate::plan::PlanView;
use crate::store::{KeyValueStore, StoreError, COMPLETED_WEEKS_KEY};

const RESUME_EXTENSIONS: &[&str] = &[".pdf", ".docx"];

struct Inner {
    state: WizardState,
    store: Box<dyn KeyValueStore>,
}

/// Drives the wizard: validates preconditions, calls collaborators, commits
/// results to the store and then to live state, and notifies subscribers.
///
/// The state lock is never held across a remote call. A remote operation
/// started while another is loading fails with [`WizardError::Busy`].
pub struct WizardController {
    inner: Mutex<Inner>,
    collaborators: Arc<dyn Collaborators>,
    notifier: watch::Sender<WizardView>,
}

impl WizardController {
    /// Builds the controller from whatever the store holds. Corrupt data
    /// clears the store and starts idle; it is never returned as an error.
    pub fn rehydrate(
        mut store: Box<dyn KeyValueStore>,
        collaborators: Arc<dyn Collaborators>,
    ) -> Self {
        let state = restore(&mut *store);
        info!(
            "Wizard rehydrated: status={:?} step={:?} completed={}",
            state.status,
            state.step,
            state.completed.len()
        );
        let (notifier, _) = watch::channel(WizardView::from(&state));
        Self {
            inner: Mutex::new(Inner { state, store }),
            collaborators,
            notifier,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardView> {
        self.notifier.subscribe()
    }

    pub async fn view(&self) -> WizardView {
        WizardView::from(&self.inner.lock().await.state)
    }

    pub async fn plan(&self) -> Result<PlanView, WizardError> {
        let inner = self.inner.lock().await;
        let state = &inner.state;
        let advice = state.advice.as_ref().ok_or(WizardError::NoPlan)?;
        Ok(PlanView::build(advice, &state.completed, state.expanded_week))
    }

    pub async fn submit_onboarding(
        &self,
        role: &str,
        level: Option<Level>,
    ) -> Result<WizardView, WizardError> {
        let role = role.trim().to_string();
        if role.is_empty() {
            return Err(WizardError::Validation(
                "Please enter your target role".to_string(),
            ));
        }
        let level = level.ok_or_else(|| {
            WizardError::Validation("Please select your experience level".to_string())
        })?;

        let (epoch, ()) = self.begin(Operation::Onboarding, |_| Ok(())).await?;
        let verdict = self.collaborators.validate_role(&role).await;

        self.complete(epoch, Operation::Onboarding, verdict, |inner, verdict| {
            if !verdict.is_in_scope {
                let reason = if verdict.reason.trim().is_empty() {
                    format!("'{role}' is outside the roles this roadmap covers")
                } else {
                    verdict.reason
                };
                return Err(WizardError::OutOfScope { reason });
            }
            let session = SessionContext::new(role, level);
            inner.store.apply(persist::session_writes(&session)?)?;
            inner.state = inner.state.onboarded(session);
            Ok(())
        })
        .await
    }

    pub async fn upload_resume(
        &self,
        upload: Option<ResumeUpload>,
    ) -> Result<WizardView, WizardError> {
        let upload = upload.ok_or(WizardError::NoFileSelected)?;
        if !is_supported_resume(&upload.filename) {
            return Err(WizardError::UnsupportedFileType(upload.filename));
        }

        let (epoch, ()) = self.begin(Operation::Upload, |_| Ok(())).await?;
        let parsed = self.collaborators.parse_resume(&upload).await;

        self.complete(epoch, Operation::Upload, parsed, |inner, parsed| {
            info!(
                "Parsed {} ({} chars of text)",
                parsed.filename,
                parsed.text.len()
            );
            inner.state = inner.state.resume_parsed(parsed.filename, parsed.text);
            Ok(())
        })
        .await
    }

    /// Extracts a profile from `text`, or from the last uploaded résumé when
    /// `text` is `None`.
    pub async fn analyze_profile(&self, text: Option<String>) -> Result<WizardView, WizardError> {
        let (epoch, cv_text) = self
            .begin(Operation::Analyze, |state| {
                let text = match text {
                    Some(text) => text,
                    None => state.resume_text.clone().unwrap_or_default(),
                };
                if text.trim().is_empty() {
                    return Err(WizardError::EmptyInput);
                }
                Ok(text)
            })
            .await?;
        let profile = self.collaborators.extract_profile(&cv_text).await;

        self.complete(epoch, Operation::Analyze, profile, |inner, profile| {
            inner.state = inner.state.profile_extracted(profile);
            Ok(())
        })
        .await
    }

    /// Replaces the persisted advice and empties the completion set in one
    /// store write.
    pub async fn generate_advice(&self) -> Result<WizardView, WizardError> {
        let (epoch, (profile, role, level)) = self
            .begin(Operation::Advice, |state| {
                let (role, level) = state
                    .session
                    .committed()
                    .ok_or(WizardError::MissingPrerequisite("target role and level"))?;
                let profile = state
                    .profile
                    .clone()
                    .ok_or(WizardError::MissingPrerequisite("analyzed profile"))?;
                Ok((profile, role.to_string(), level))
            })
            .await?;
        let advice = self
            .collaborators
            .generate_advice(&profile, &role, level)
            .await
            .and_then(|advice| advice.validated().map_err(RemoteError::from));

        self.complete(epoch, Operation::Advice, advice, |inner, advice| {
            inner.store.apply(persist::advice_writes(&advice)?)?;
            info!(
                "Stored new plan with {} weeks for {role} ({level})",
                advice.weeks().len()
            );
            inner.state = inner.state.advised(advice);
            Ok(())
        })
        .await
    }

    /// Clears session, profile, advice and progress, in memory and on disk.
    pub async fn reset_all(&self, confirmed: bool) -> Result<WizardView, WizardError> {
        if !confirmed {
            return Err(WizardError::ConfirmationRequired);
        }
        let mut inner = self.inner.lock().await;
        inner.store.apply(persist::reset_writes())?;
        inner.state = inner.state.reset();
        info!("Wizard reset (epoch {})", inner.state.epoch);
        Ok(self.publish(&inner.state))
    }

    /// Flips completion of `week`. The store is written before live state
    /// changes, so a failed write leaves both as they were.
    pub async fn toggle_week(&self, week: u32) -> Result<PlanView, WizardError> {
        let mut inner = self.inner.lock().await;
        let next = inner.state.week_toggled(week)?;
        persist::write_completion(&mut *inner.store, &next.completed)?;
        inner.state = next;
        self.publish(&inner.state).plan.ok_or(WizardError::NoPlan)
    }

    pub async fn toggle_expanded(&self, week: u32) -> Result<PlanView, WizardError> {
        let mut inner = self.inner.lock().await;
        inner.state = inner.state.expansion_toggled(week)?;
        self.publish(&inner.state).plan.ok_or(WizardError::NoPlan)
    }

    async fn begin<P>(
        &self,
        operation: Operation,
        prerequisites: impl FnOnce(&WizardState) -> Result<P, WizardError>,
    ) -> Result<(u64, P), WizardError> {
        let mut inner = self.inner.lock().await;
        let next = inner.state.begin(operation)?;
        let input = prerequisites(&inner.state)?;
        inner.state = next;
        info!(flow_id = ?inner.state.flow_id, "{operation} started");
        self.publish(&inner.state);
        Ok((inner.state.epoch, input))
    }

    async fn complete<T>(
        &self,
        epoch: u64,
        operation: Operation,
        outcome: Result<T, RemoteError>,
        apply: impl FnOnce(&mut Inner, T) -> Result<(), WizardError>,
    ) -> Result<WizardView, WizardError> {
        let mut inner = self.inner.lock().await;
        if inner.state.epoch != epoch {
            warn!("Discarding {operation} result: wizard was reset while it ran");
            return Err(WizardError::Superseded(operation));
        }

        let result = match outcome {
            Ok(value) => apply(&mut *inner, value),
            Err(e) => Err(WizardError::Remote(e)),
        };
        match &result {
            Ok(()) => info!(flow_id = ?inner.state.flow_id, "{operation} succeeded"),
            Err(e) => {
                warn!(flow_id = ?inner.state.flow_id, "{operation} failed: {e}");
                inner.state = inner.state.failed(e.to_string());
            }
        }
        let view = self.publish(&inner.state);
        result.map(|()| view)
    }

    fn publish(&self, state: &WizardState) -> WizardView {
        let view = WizardView::from(state);
        self.notifier.send_replace(view.clone());
        view
    }
}

fn is_supported_resume(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    RESUME_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn restore(store: &mut dyn KeyValueStore) -> WizardState {
    let PersistedWizard {
        session,
        advice,
        completed,
    } = match persist::load(&*store) {
        Ok(persisted) => persisted,
        Err(e) => {
            warn!("Discarding persisted wizard state: {e}");
            if let Err(e) = store.clear() {
                error!("Could not clear corrupt store: {e}");
            }
            return WizardState::default();
        }
    };

    let clamped = match (&advice, &completed) {
        (Some(advice), Some(completed)) => completed.clamped_to(&advice.week_numbers()),
        _ => CompletionSet::new(),
    };
    if let Err(e) = repair_completion(store, advice.as_ref(), completed.as_ref(), &clamped) {
        warn!("Could not rewrite stale completion set: {e}");
    }

    WizardState::rehydrated(session, advice, clamped)
}

/// Removes a completion set that has no plan, or rewrites one that referenced
/// weeks the plan does not have.
fn repair_completion(
    store: &mut dyn KeyValueStore,
    advice: Option<&CareerAdviceResponse>,
    stored: Option<&CompletionSet>,
    clamped: &CompletionSet,
) -> Result<(), StoreError> {
    match (advice, stored) {
        (None, Some(stored)) => {
            if !stored.is_empty() {
                warn!("Dropping {} completed weeks persisted without a plan", stored.len());
            }
            store.remove(COMPLETED_WEEKS_KEY)
        }
        (Some(_), Some(stored)) if stored != clamped => {
            warn!(
                "Dropping {} completed weeks not present in the plan",
                stored.len() - clamped.len()
            );
            persist::write_completion(store, clamped)
        }
        _ => Ok(()),
    }
}
