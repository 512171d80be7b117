//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use di_catalog_core::{CartError, ProductError};
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] SupabaseError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A backend record holds values that cannot be processed.
    #[error("Invalid backend record: {0}")]
    Record(#[from] CartError),

    /// Submitted product data is invalid.
    #[error("Invalid product: {0}")]
    Product(#[from] ProductError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Backend(SupabaseError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Backend(SupabaseError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Backend(_) | Self::Record(_) => StatusCode::BAD_GATEWAY,
            Self::Product(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Template(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose backend or internal details to clients
        let message = match &self {
            Self::Backend(SupabaseError::NotFound(_)) => "No encontrado".to_string(),
            Self::Backend(SupabaseError::RateLimited(_)) => {
                "Servicio saturado, intenta de nuevo en unos segundos".to_string()
            }
            Self::Backend(_) => "No se pudo contactar al servicio de datos".to_string(),
            Self::Record(_) => "El servicio de datos devolvió un registro inválido".to_string(),
            Self::Template(_) | Self::Internal(_) => "Error interno del servidor".to_string(),
            Self::Product(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Product(ProductError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_error_status_codes() {
        assert_eq!(
            get_status(AppError::Backend(SupabaseError::NotFound("products".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Backend(SupabaseError::RateLimited(5))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Backend(SupabaseError::Api {
                status: 400,
                message: "bad column".to_string(),
                code: None,
                details: None,
                hint: None,
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
