// src/services/mod.rs

pub mod auth_service;
pub mod mail_service;
pub mod user_store;
