// src/services/auth_service.rs

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, DecodingKey, EncodingKey, Header, Validation,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::UserView;

/// Length of the passwords issued on reset.
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// JWT claims identifying a user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: usize,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime is out of range")]
    Lifetime,

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// Signing secret and lifetime for access tokens.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expires_in: Duration,
}

/// Verifies a plain password against a hashed password.
pub fn verify_password(plain_password: &str, hashed_password: &str) -> bool {
    verify(plain_password, hashed_password).unwrap_or(false)
}

/// Hashes a password using bcrypt.
pub fn get_password_hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Generates a random alphanumeric password for a reset.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Signs an HS256 access token for the user.
pub fn create_access_token(user: &UserView, settings: &JwtSettings) -> Result<String, TokenError> {
    let now = Utc::now();
    let expire = now
        .checked_add_signed(settings.expires_in)
        .ok_or(TokenError::Lifetime)?;
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat: now.timestamp() as usize,
        exp: expire.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_ref()),
    )?;
    Ok(token)
}

/// Verifies a JWT token and returns the decoded claims if valid.
pub fn verify_jwt_token(token: &str, settings: &JwtSettings) -> Result<Claims, JwtError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation,
    )?;
    Ok(token_data.claims)
}
