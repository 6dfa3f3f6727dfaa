use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io;

use crate::config::INTERNAL_ERROR_BODY;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Host name lookup failed: {0}")]
    Hostname(#[source] io::Error),

    #[error("Healthy request budget exhausted")]
    Unhealthy,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Hostname(_) => {
                tracing::error!(error = %self, "Failed to answer request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
            // Simulated failure for liveness probe demos, empty body on purpose
            AppError::Unhealthy => {
                tracing::warn!("Reporting unhealthy");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
