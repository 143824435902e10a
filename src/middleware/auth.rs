// src/middleware/auth.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::error::AppError;
use crate::services::auth_service::{self, Claims};
use crate::state::AppState;

/// The caller identified by a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Unauthorized("Authentication is not configured".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|hv| hv.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization header missing or invalid".into()))?;

    let claims = auth_service::verify_jwt_token(token, &state.jwt).map_err(|e| {
        log::warn!("rejected bearer token: {}", e);
        AppError::Unauthorized(format!("Invalid token: {}", e))
    })?;
    Ok(AuthUser(claims))
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
