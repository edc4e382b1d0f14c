//! Error handling for the Stock Management Platform
//!
//! Every failure surfaces as an `AppError` and is rendered as a JSON body
//! with an error code plus English and Portuguese messages. No error is
//! fatal to the session; clients keep their state and may retry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, message_pt: String },

    // Validation
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External services
    #[error("Invoice extraction error: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Storage and internals
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// JSON body wrapper: `{ "error": { ... } }`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn detail(code: &str, message_en: String, message_pt: String) -> ErrorDetail {
    ErrorDetail {
        code: code.to_string(),
        message_en,
        message_pt,
        field: None,
    }
}

impl AppError {
    /// Build a field validation error with a Portuguese translation
    pub fn validation(field: &str, message: &str, message_pt: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_pt: message_pt.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                detail(
                    "TOKEN_EXPIRED",
                    "Token has expired".to_string(),
                    "O token expirou".to_string(),
                ),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                detail(
                    "INVALID_TOKEN",
                    "Invalid token".to_string(),
                    "Token inválido".to_string(),
                ),
            ),
            AppError::Unauthorized {
                message,
                message_pt,
            } => (
                StatusCode::UNAUTHORIZED,
                detail("UNAUTHORIZED", message.clone(), message_pt.clone()),
            ),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                detail(
                    "VALIDATION_ERROR",
                    msg.clone(),
                    format!("Dados inválidos: {}", msg),
                ),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                detail(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} não encontrado", resource),
                ),
            ),
            AppError::ExtractionError(msg) => (
                StatusCode::BAD_GATEWAY,
                detail(
                    "EXTRACTION_ERROR",
                    format!("Invoice extraction error: {}", msg),
                    "Não foi possível extrair os dados. Tente novamente com uma imagem mais nítida ou um arquivo diferente."
                        .to_string(),
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "CONFIGURATION_ERROR",
                    format!("Configuration error: {}", msg),
                    format!("Erro de configuração: {}", msg),
                ),
            ),
            // SQLSTATE 42501 (insufficient privilege) is a deployment
            // problem, not a data problem; point the operator at the
            // access control configuration.
            AppError::DatabaseError(sqlx::Error::Database(db))
                if db.code().as_deref() == Some("42501") =>
            {
                (
                    StatusCode::FORBIDDEN,
                    detail(
                        "PERMISSION_DENIED",
                        "Permission denied by the database. Check the access control configuration."
                            .to_string(),
                        "Permissão negada. Verifique a configuração de controle de acesso."
                            .to_string(),
                    ),
                )
            }
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    "Ocorreu um erro no banco de dados".to_string(),
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "Ocorreu um erro interno no servidor".to_string(),
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    "Ocorreu um erro interno no servidor".to_string(),
                ),
            ),
        };

        tracing::error!("request failed: {:?}", self);

        (status, Json(ErrorResponse { error: body })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
