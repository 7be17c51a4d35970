use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::{debug, error, warn};
use serde_json::json;
use thiserror::Error;

// Custom error handling
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database unavailable: {0}")]
    ConnectivityError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Forbidden: {0}")]
    ForbiddenError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("Database error: {0}")]
    PersistenceError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DieselError> for ApiError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => ApiError::NotFoundError("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info)
            | DieselError::DatabaseError(DatabaseErrorKind::UnableToSendCommand, info) => {
                ApiError::ConnectivityError(info.message().to_string())
            }
            DieselError::BrokenTransactionManager => {
                ApiError::ConnectivityError("connection is in an unusable state".to_string())
            }
            other => ApiError::PersistenceError(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let msg = match self {
            ApiError::ConnectivityError(msg) => {
                error!("\x1B[1;31mCONNECTIVITY ERROR:\x1B[0m {}", msg);
                msg
            }
            ApiError::ValidationError(msg) => {
                warn!("\x1B[1;33mVALIDATION ERROR:\x1B[0m {}", msg);
                msg
            }
            ApiError::AuthError(msg) => {
                warn!("\x1B[1;33mAUTHENTICATION ERROR:\x1B[0m {}", msg);
                msg
            }
            ApiError::ForbiddenError(msg) => {
                warn!("\x1B[1;33mFORBIDDEN:\x1B[0m {}", msg);
                msg
            }
            ApiError::NotFoundError(msg) => {
                debug!("\x1B[1;36mNOT FOUND ERROR:\x1B[0m {}", msg);
                msg
            }
            ApiError::PersistenceError(msg) => {
                error!("\x1B[1;31mDATABASE ERROR:\x1B[0m {}", msg);
                msg
            }
            ApiError::InternalError(msg) => {
                error!("\x1B[1;31mINTERNAL ERROR:\x1B[0m {}", msg);
                msg
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            ApiError::ConnectivityError(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthError(_) => StatusCode::UNAUTHORIZED,
            ApiError::ForbiddenError(_) => StatusCode::FORBIDDEN,
            ApiError::NotFoundError(_) => StatusCode::NOT_FOUND,
            ApiError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
