//! Typed errors and HTTP mapping.

use crate::messages;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
    #[error("unknown store backend '{0}' (expected 'postgres' or 'memory')")]
    UnknownBackend(String),
    #[error("invalid schema name '{0}'")]
    InvalidSchema(String),
}

/// Errors raised by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("user {0} does not exist")]
    UnknownUser(i32),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("required fields missing or invalid")]
    RequiredFields,
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("invalid body: {0}")]
    InvalidBody(String),
    #[error("content type must be application/json")]
    ContentType,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("not found")]
    NotFound,
    #[error("no records")]
    NoRecords,
    #[error("unknown user: {0}")]
    UnknownUser(i32),
    #[error("internal: {0}")]
    Internal(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownUser(id) => AppError::UnknownUser(id),
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RequiredFields
            | AppError::InvalidId(_)
            | AppError::InvalidBody(_)
            | AppError::UnknownUser(_) => StatusCode::BAD_REQUEST,
            AppError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound | AppError::NoRecords => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::RequiredFields => "required_fields",
            AppError::InvalidId(_) => "invalid_id",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::ContentType => "unsupported_content_type",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::NotFound => "not_found",
            AppError::NoRecords => "no_records",
            AppError::UnknownUser(_) => "unknown_user",
            AppError::Internal(_) => "internal_error",
            AppError::Store(_) => "database_error",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AppError::RequiredFields => messages::ERROR_REQUIRED_FIELDS,
            AppError::InvalidId(_) => messages::ERROR_INVALID_ID,
            AppError::InvalidBody(_) => messages::ERROR_INVALID_BODY,
            AppError::ContentType => messages::ERROR_CONTENT_TYPE,
            AppError::PayloadTooLarge => messages::ERROR_PAYLOAD_TOO_LARGE,
            AppError::NotFound => messages::ERROR_NOT_FOUND,
            AppError::NoRecords => messages::ERROR_NO_RECORDS,
            AppError::UnknownUser(_) => messages::ERROR_UNKNOWN_USER,
            AppError::Internal(_) => messages::ERROR_INTERNAL_SERVER,
            AppError::Store(_) => messages::ERROR_INTERNAL_SERVER_DB,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: bool,
    pub status_code: u16,
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            status: false,
            status_code: status.as_u16(),
            code: self.code(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
