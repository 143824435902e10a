// src/controllers/mod.rs

pub mod user_controller;
