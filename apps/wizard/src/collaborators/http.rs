use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Collaborators, ParsedResume, RemoteError, ResumeUpload, RoleVerdict};
use crate::models::advice::CareerAdviceResponse;
use crate::models::profile::ExtractedProfile;
use crate::models::session::Level;

const VALIDATE_ROLE_PATH: &str = "/validate_role";
const UPLOAD_CV_PATH: &str = "/upload_cv";
const ANALYZE_PROFILE_PATH: &str = "/analyze_profile";
const GENERATE_ADVICE_PATH: &str = "/generate_advice";

#[derive(Debug, Serialize)]
struct RoleRequest<'a> {
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileRequest<'a> {
    cv_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    profile: ExtractedProfile,
}

#[derive(Debug, Serialize)]
struct AdviceRequest<'a> {
    profile: &'a ExtractedProfile,
    role: &'a str,
    level: Level,
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    advice: CareerAdviceResponse,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// JSON-over-HTTP client for all four collaborator endpoints.
#[derive(Clone)]
pub struct HttpCollaborators {
    client: Client,
    base_url: String,
}

impl HttpCollaborators {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, RemoteError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(status.as_u16(), &body);
        warn!("{path} returned {status}: {message}");
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!("{path} succeeded ({} bytes)", body.len());
    Ok(serde_json::from_str(&body)?)
}

/// Uses the `detail` field of an error body when there is one, otherwise a
/// generic message naming the status code.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body).map(|b| b.detail) {
        Ok(Value::String(detail)) if !detail.trim().is_empty() => detail,
        Ok(detail @ (Value::Array(_) | Value::Object(_))) => detail.to_string(),
        _ => format!("HTTP error! status: {status}"),
    }
}

#[async_trait]
impl Collaborators for HttpCollaborators {
    async fn validate_role(&self, role: &str) -> Result<RoleVerdict, RemoteError> {
        self.post_json(VALIDATE_ROLE_PATH, &RoleRequest { role }).await
    }

    async fn parse_resume(&self, upload: &ResumeUpload) -> Result<ParsedResume, RemoteError> {
        let mut part =
            multipart::Part::bytes(upload.bytes.to_vec()).file_name(upload.filename.clone());
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(UPLOAD_CV_PATH))
            .multipart(form)
            .send()
            .await?;
        decode(UPLOAD_CV_PATH, response).await
    }

    async fn extract_profile(&self, cv_text: &str) -> Result<ExtractedProfile, RemoteError> {
        let response: ProfileResponse = self
            .post_json(ANALYZE_PROFILE_PATH, &ProfileRequest { cv_text })
            .await?;
        Ok(response.profile)
    }

    async fn generate_advice(
        &self,
        profile: &ExtractedProfile,
        role: &str,
        level: Level,
    ) -> Result<CareerAdviceResponse, RemoteError> {
        let response: AdviceResponse = self
            .post_json(
                GENERATE_ADVICE_PATH,
                &AdviceRequest {
                    profile,
                    role,
                    level,
                },
            )
            .await?;
        Ok(response.advice)
    }
}
