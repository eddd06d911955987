//! Handler error taxonomy.
//!
//! Authorization failures never surface as error pages: they become a
//! `303 See Other` to the sign-in or unauthorized destination. Everything
//! else is a small JSON body with a stable `code`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect as RedirectResponse, Response},
};
use serde::Serialize;

use crate::{baas::BaasError, guard::Redirect, repository::RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("guard redirect to {}", .0.location())]
    Redirect(Redirect),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("not implemented")]
    NotImplemented,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Baas(#[from] BaasError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

impl From<Redirect> for ApiError {
    fn from(redirect: Redirect) -> Self {
        ApiError::Redirect(redirect)
    }
}

impl ApiError {
    /// Status and stable code for the JSON body. Redirects are handled separately.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Redirect(_) => (StatusCode::SEE_OTHER, "redirect"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotImplemented => (StatusCode::NOT_IMPLEMENTED, "not_implemented"),
            ApiError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backend_error"),
            ApiError::Baas(BaasError::Rejected { .. }) => (StatusCode::BAD_REQUEST, "auth_rejected"),
            ApiError::Baas(_) => (StatusCode::BAD_GATEWAY, "auth_unavailable"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Redirect(redirect) = self {
            return RedirectResponse::to(redirect.location()).into_response();
        }

        let (status, code) = self.status_and_code();
        let message = match &self {
            // Backend details stay in the logs.
            ApiError::Repository(e) => {
                tracing::error!("repository failure: {:?}", e);
                "internal error".to_string()
            }
            ApiError::Baas(e) if status != StatusCode::BAD_REQUEST => {
                tracing::error!("auth collaborator failure: {:?}", e);
                "authentication service unavailable".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}
