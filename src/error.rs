use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Generic denial returned for every authentication failure. The client never
/// learns whether the account exists, the password was wrong, or the session
/// token was missing, malformed or expired.
pub const AUTH_DENIED_MESSAGE: &str = "Credenziali non valide";

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A pool construction error.
    #[error("Pool build error: {0}")]
    PoolBuild(#[from] deadpool_postgres::CreatePoolError),

    /// An authentication failure. Always rendered as the same generic 401.
    #[error("{}", AUTH_DENIED_MESSAGE)]
    Authentication,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A conflict with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A row was missing an expected column.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::PoolBuild(ref e) => {
                tracing::error!("Pool build error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Authentication => {
                tracing::warn!("Authentication failed");
                (StatusCode::UNAUTHORIZED, AUTH_DENIED_MESSAGE.to_string())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Conflict(ref msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Encryption(ref msg) => {
                tracing::error!("Encryption error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Encryption error".to_string())
            }

            AppError::MissingData(ref col) => {
                tracing::error!("Row missing column: {}", col);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "message": message
        }))
        .unwrap_or_else(|_| r#"{"message":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
