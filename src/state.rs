// src/state.rs

use std::sync::Arc;

use crate::services::auth_service::JwtSettings;
use crate::services::mail_service::Mailer;
use crate::services::user_store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt: JwtSettings,
}
