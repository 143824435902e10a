// src/routes/user_routes.rs

use actix_web::web;
use crate::controllers::user_controller::{
    create_user, delete_user, list_users, login, reset_password,
};

/// Registers the user management endpoints.
/// `/users` carries GET, POST and DELETE; login and reset sit beside it.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(create_user)
        .service(delete_user)
        .service(login)
        .service(reset_password);
}
