//! Scripted collaborators and fixtures for wizard tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use super::WizardController;
use crate::collaborators::{Collaborators, ParsedResume, RemoteError, ResumeUpload, RoleVerdict};
use crate::models::advice::{sample_advice, CareerAdviceResponse};
use crate::models::profile::{ExtractedProfile, PersonalInfo, Skill};
use crate::models::session::Level;
use crate::store::MemoryStore;

pub(crate) fn sample_profile() -> ExtractedProfile {
    ExtractedProfile {
        personal_info: PersonalInfo {
            name: "Jane Doe".to_string(),
        },
        skills: vec![Skill {
            name: "Python".to_string(),
            level: Some("advanced".to_string()),
        }],
        experience_years: 4,
        contact_email: Some("jane@example.com".to_string()),
    }
}

pub(crate) fn pdf_upload() -> ResumeUpload {
    ResumeUpload {
        filename: "jane_doe.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: Bytes::from_static(b"%PDF-1.4 fake"),
    }
}

pub(crate) struct StubCollaborators {
    advice_weeks: Mutex<Vec<u32>>,
    reject_reason: Mutex<Option<String>>,
    advice_gate: Mutex<Option<Arc<Notify>>>,
    failing: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubCollaborators {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            advice_weeks: Mutex::new(vec![1, 2, 3]),
            reject_reason: Mutex::new(None),
            advice_gate: Mutex::new(None),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_advice_weeks(&self, weeks: &[u32]) {
        *self.advice_weeks.lock().unwrap() = weeks.to_vec();
    }

    pub fn reject_roles(&self, reason: &str) {
        *self.reject_reason.lock().unwrap() = Some(reason.to_string());
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes `generate_advice` wait until the returned handle is notified.
    pub fn hold_advice(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.advice_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Api {
                status: 502,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Collaborators for StubCollaborators {
    async fn validate_role(&self, _role: &str) -> Result<RoleVerdict, RemoteError> {
        self.record()?;
        let rejection = self.reject_reason.lock().unwrap().clone();
        Ok(match rejection {
            Some(reason) => RoleVerdict {
                is_in_scope: false,
                reason,
            },
            None => RoleVerdict {
                is_in_scope: true,
                reason: "Technical role".to_string(),
            },
        })
    }

    async fn parse_resume(&self, upload: &ResumeUpload) -> Result<ParsedResume, RemoteError> {
        self.record()?;
        Ok(ParsedResume {
            filename: upload.filename.clone(),
            text: "Jane Doe\nPython developer, 4 years".to_string(),
        })
    }

    async fn extract_profile(&self, _cv_text: &str) -> Result<ExtractedProfile, RemoteError> {
        self.record()?;
        Ok(sample_profile())
    }

    async fn generate_advice(
        &self,
        _profile: &ExtractedProfile,
        _role: &str,
        _level: Level,
    ) -> Result<CareerAdviceResponse, RemoteError> {
        self.record()?;
        let gate = self.advice_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let weeks = self.advice_weeks.lock().unwrap().clone();
        Ok(sample_advice(&weeks))
    }
}

pub(crate) fn controller(store: &MemoryStore, stub: &Arc<StubCollaborators>) -> WizardController {
    WizardController::rehydrate(Box::new(store.clone()), stub.clone())
}

/// Runs onboarding, upload, analysis and advice generation.
pub(crate) async fn complete_flow(wizard: &WizardController) {
    wizard
        .submit_onboarding("Senior AI Engineer at Google", Some(Level::Mid))
        .await
        .unwrap();
    wizard.upload_resume(Some(pdf_upload())).await.unwrap();
    wizard.analyze_profile(None).await.unwrap();
    wizard.generate_advice().await.unwrap();
}
