use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::wizard::WizardError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

macro_rules! rejection_as_validation {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Validation(rejection.body_text())
                }
            }
        )+
    };
}

rejection_as_validation!(
    JsonRejection,
    PathRejection,
    QueryRejection,
    MultipartRejection,
    BytesRejection,
);

fn wizard_status(err: &WizardError) -> (StatusCode, &'static str) {
    match err {
        WizardError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        WizardError::NoFileSelected => (StatusCode::BAD_REQUEST, "NO_FILE_SELECTED"),
        WizardError::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE"),
        WizardError::EmptyInput => (StatusCode::BAD_REQUEST, "EMPTY_INPUT"),
        WizardError::OutOfScope { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "OUT_OF_SCOPE"),
        WizardError::MissingPrerequisite(_) => (StatusCode::CONFLICT, "MISSING_PREREQUISITE"),
        WizardError::Busy(_) => (StatusCode::CONFLICT, "BUSY"),
        WizardError::Superseded(_) => (StatusCode::CONFLICT, "SUPERSEDED"),
        WizardError::ConfirmationRequired => (StatusCode::CONFLICT, "CONFIRMATION_REQUIRED"),
        WizardError::NoPlan => (StatusCode::CONFLICT, "NO_PLAN"),
        WizardError::UnknownWeek(_) => (StatusCode::NOT_FOUND, "UNKNOWN_WEEK"),
        WizardError::Remote(_) => (StatusCode::BAD_GATEWAY, "REMOTE_FAILURE"),
        WizardError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Wizard(e) => {
                let (status, code) = wizard_status(e);
                match e {
                    WizardError::Remote(inner) => tracing::error!("Collaborator error: {inner}"),
                    WizardError::Store(inner) => tracing::error!("Store error: {inner}"),
                    _ => {}
                }
                (status, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::RemoteError;
    use crate::wizard::Operation;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            wizard_status(&WizardError::NoFileSelected).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            wizard_status(&WizardError::OutOfScope {
                reason: "not a tech role".to_string()
            })
            .0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            wizard_status(&WizardError::Busy(Operation::Upload)).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            wizard_status(&WizardError::Remote(RemoteError::Api {
                status: 500,
                message: "Failed to generate advice.".to_string()
            })),
            (StatusCode::BAD_GATEWAY, "REMOTE_FAILURE")
        );
    }

    #[test]
    fn test_remote_message_reaches_client() {
        let err = AppError::from(WizardError::Remote(RemoteError::Api {
            status: 400,
            message: "CV text is required.".to_string(),
        }));
        assert_eq!(err.to_string(), "CV text is required.");
    }
}
