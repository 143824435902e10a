// src/controllers/user_controller.rs

use actix_web::{delete, get, http::StatusCode, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::user::{LoginView, User, UserFilter, UserView};
use crate::services::{auth_service, mail_service};
use crate::state::AppState;
use crate::validation::{ValidatedJson, ValidatedQuery};

const SUCCESS: &str = "Success";
const RESET_SUBJECT: &str = "Reset QHRMS Password";

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub msg: &'static str,
}

fn ok<T: Serialize>(data: Option<T>, msg: &'static str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        status: StatusCode::OK.as_u16(),
        data,
        msg,
    })
}

/// Treats an empty query value as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Runs bcrypt on the blocking pool.
async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = web::block(move || auth_service::get_password_hash(&password)).await??;
    Ok(hashed)
}

/// Query parameters for GET /users.
#[derive(Debug, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

/// Request body for POST /users.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub mobile: Option<String>,
    pub role: Option<String>,
    pub project_id: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for POST /login. `email` may also hold a mobile number.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for POST /reset-password and DELETE /users.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
}

/// GET /users
/// Lists non-deleted users, optionally filtered by id, role or project. Never returns passwords.
#[get("/users")]
pub async fn list_users(
    _auth: AuthUser,
    query: ValidatedQuery<ListUsersQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ValidatedQuery(query) = query;
    let filter = UserFilter {
        id: non_empty(query.id).or_else(|| non_empty(query.user_id)),
        role: non_empty(query.role),
        project_id: non_empty(query.project_id),
    };
    let users = data.users.find(&filter).await.map_err(|e| {
        log::error!("listing users failed: {}", e);
        e
    })?;
    Ok(ok(Some(users), SUCCESS))
}

/// POST /users
/// Creates a user with a bcrypt-hashed password.
#[post("/users")]
pub async fn create_user(
    form: ValidatedJson<CreateUserForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ValidatedJson(form) = form;
    let user = User {
        id: ObjectId::new().to_hex(),
        email: form.email,
        mobile: form.mobile,
        password: hash_password(form.password).await?,
        name: form.name,
        role: form.role,
        project_id: form.project_id,
        is_active: form.is_active.unwrap_or(true),
        is_deleted: false,
    };

    let user = data.users.insert(user).await.map_err(|e| {
        log::warn!("create user failed: {}", e);
        e
    })?;
    log::info!("created user {}", user.id);
    Ok(ok(Some(UserView::from(user)), SUCCESS))
}

/// POST /login
/// Authenticates by email or mobile and returns the user together with a JWT.
#[post("/login")]
pub async fn login(
    form: ValidatedJson<LoginForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ValidatedJson(form) = form;
    let found = data.users.find_active_by_login(&form.email).await?;

    let user = match found {
        Some(u) => {
            let (password, hashed) = (form.password, u.password.clone());
            let matches =
                web::block(move || auth_service::verify_password(&password, &hashed)).await?;
            matches.then_some(u)
        }
        None => None,
    };
    let user = match user {
        Some(u) => u,
        None => {
            log::warn!("failed login for {}", form.email);
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    let user = UserView::from(user);
    let token = auth_service::create_access_token(&user, &data.jwt)?;
    Ok(ok(Some(LoginView { user, token }), SUCCESS))
}

/// POST /reset-password
/// Replaces the password with a random one and mails it to the user.
#[post("/reset-password")]
pub async fn reset_password(
    form: ValidatedJson<EmailForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ValidatedJson(form) = form;
    let new_password = auth_service::generate_password();
    let hashed = hash_password(new_password.clone()).await?;

    let user = match data.users.set_password(&form.email, &hashed).await? {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid Email ID".into())),
    };

    let html = mail_service::reset_password_template(&user.name, &new_password);
    if let Err(e) = data
        .mailer
        .send(&[user.email.clone()], RESET_SUBJECT, &html)
        .await
    {
        log::error!("failed to send reset mail to {}: {}", user.email, e);
    }

    Ok(ok(None::<()>, "New password has been sent to you Email"))
}

/// DELETE /users
/// Removes every user document with the given email.
#[delete("/users")]
pub async fn delete_user(
    auth: AuthUser,
    form: ValidatedJson<EmailForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ValidatedJson(form) = form;
    let AuthUser(claims) = auth;
    let removed = data.users.delete_by_email(&form.email).await?;
    log::info!(
        "{} removed {} user(s) with email {}",
        claims.email,
        removed,
        form.email
    );
    Ok(ok(None::<()>, SUCCESS))
}
