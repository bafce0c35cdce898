use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Ways a provider reply can break the generation contract.
/// Each one surfaces as 502 with its own code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("No response from model")]
    NoResponse,

    #[error("Model returned invalid JSON")]
    InvalidJson,

    #[error("Model returned unexpected JSON")]
    UnexpectedShape,

    #[error("Failed to generate posts")]
    Upstream,
}

impl ContractViolation {
    fn code(self) -> &'static str {
        match self {
            ContractViolation::NoResponse => "NO_MODEL_RESPONSE",
            ContractViolation::InvalidJson => "INVALID_MODEL_JSON",
            ContractViolation::UnexpectedShape => "UNEXPECTED_MODEL_JSON",
            ContractViolation::Upstream => "PROVIDER_ERROR",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The selected provider's credential is not configured.
    #[error("Server is missing {0}")]
    MissingCredential(&'static str),

    #[error("Provider contract error: {0}")]
    Provider(ContractViolation),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".to_string(),
            ),
            AppError::MissingCredential(var) => {
                tracing::error!("{var} is missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    format!("Server is missing {var}"),
                )
            }
            AppError::Provider(violation) => {
                tracing::error!("Provider contract error: {violation}");
                (StatusCode::BAD_GATEWAY, violation.code(), violation.to_string())
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
