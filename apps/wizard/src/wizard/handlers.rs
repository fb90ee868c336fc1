//! Axum route handlers for the wizard flow.

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::BytesRejection,
        Multipart, State,
    },
    Json,
};
use serde::Deserialize;

use crate::collaborators::ResumeUpload;
use crate::errors::AppError;
use crate::extract::{JsonBody, QueryParams};
use crate::models::session::Level;
use crate::state::AppState;
use crate::wizard::{WizardError, WizardView};

const RESUME_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub cv_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// GET /api/v1/wizard
pub async fn handle_get_wizard(State(state): State<AppState>) -> Json<WizardView> {
    Json(state.wizard.view().await)
}

/// POST /api/v1/wizard/onboarding
pub async fn handle_onboarding(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<OnboardingRequest>,
) -> Result<Json<WizardView>, AppError> {
    let level = req
        .level
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::parse::<Level>)
        .transpose()
        .map_err(|e| WizardError::Validation(e.to_string()))?;

    Ok(Json(state.wizard.submit_onboarding(&req.role, level).await?))
}

/// POST /api/v1/wizard/resume (multipart, field `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<WizardView>, AppError> {
    let mut multipart = multipart?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;

        // Browsers send an empty part when no file was chosen.
        if !filename.is_empty() && !bytes.is_empty() {
            upload = Some(ResumeUpload {
                filename,
                content_type,
                bytes,
            });
        }
        break;
    }

    Ok(Json(state.wizard.upload_resume(upload).await?))
}

/// POST /api/v1/wizard/profile
///
/// An empty body analyzes the last uploaded résumé. A body that is present
/// but not a valid `AnalyzeRequest` is rejected.
pub async fn handle_analyze_profile(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WizardView>, AppError> {
    let body = body?;
    let cv_text = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<AnalyzeRequest>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
            .cv_text
    };
    Ok(Json(state.wizard.analyze_profile(cv_text).await?))
}

/// POST /api/v1/wizard/advice
pub async fn handle_generate_advice(
    State(state): State<AppState>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(state.wizard.generate_advice().await?))
}

/// DELETE /api/v1/wizard?confirm=true
pub async fn handle_reset(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ResetQuery>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(state.wizard.reset_all(params.confirm).await?))
}
