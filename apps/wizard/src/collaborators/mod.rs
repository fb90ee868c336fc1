//! Remote collaborators: the role validator, résumé parser, profile extractor
//! and advice generator the wizard calls over HTTP.
//!
//! The wizard only talks to them through [`Collaborators`], so tests can swap
//! in a scripted double.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::advice::{CareerAdviceResponse, PlanError};
use crate::models::profile::ExtractedProfile;
use crate::models::session::Level;

pub mod http;

pub use http::HttpCollaborators;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed plan: {0}")]
    MalformedPlan(#[from] PlanError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleVerdict {
    pub is_in_scope: bool,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedResume {
    pub filename: String,
    pub text: String,
}

/// A résumé file as received from the user. Held only for the upload call.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait Collaborators: Send + Sync {
    async fn validate_role(&self, role: &str) -> Result<RoleVerdict, RemoteError>;

    async fn parse_resume(&self, upload: &ResumeUpload) -> Result<ParsedResume, RemoteError>;

    async fn extract_profile(&self, cv_text: &str) -> Result<ExtractedProfile, RemoteError>;

    async fn generate_advice(
        &self,
        profile: &ExtractedProfile,
        role: &str,
        level: Level,
    ) -> Result<CareerAdviceResponse, RemoteError>;
}
