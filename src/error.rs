// src/error.rs

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::services::auth_service::TokenError;
use crate::services::user_store::StoreError;

/// One entry of the validation error array sent back on a 400.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub location: &'static str,
    pub param: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Blocking(#[from] BlockingError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(errors),
            other => HttpResponse::build(status).json(json!({
                "status": status.as_u16(),
                "msg": other.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn validation_errors_render_as_array() {
        let err = AppError::Validation(vec![FieldError {
            location: "body",
            param: "email".into(),
            msg: "Email is required".into(),
            value: None,
        }]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["param"], "email");
        assert_eq!(json[0]["msg"], "Email is required");
    }

    #[actix_web::test]
    async fn unauthorized_carries_status_in_body() {
        let resp = AppError::Unauthorized("Invalid credentials".into()).error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["msg"], "Invalid credentials");
    }

    #[test]
    fn store_errors_default_to_bad_request() {
        let err = AppError::from(StoreError::Duplicate("a@b.c".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
