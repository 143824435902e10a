use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use services::auth_service::JwtSettings;
use services::mail_service::SmtpMailer;
use services::user_store::{MemoryUserStore, UserStore};

mod config;
mod controllers;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod validation;

fn startup_error<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let env_file = config::load_env_file();
    env_logger::init();
    match env_file {
        Some(file) => log::info!("loaded {}", file),
        None => log::info!("no env file found, using process environment"),
    }

    let config = config::Config::from_env().map_err(startup_error)?;
    log::info!("starting in {} mode", config.env);

    let users: Arc<dyn UserStore> = if config.mongo_uri.is_empty() {
        log::warn!("MONGO_DB_URI is empty, users are kept in memory only");
        Arc::new(MemoryUserStore::new())
    } else {
        let db_client = db::init_db(&config.mongo_uri)
            .await
            .map_err(startup_error)?;
        let store = db::init_user_store(&db_client, &config.mongo_db_name)
            .await
            .map_err(startup_error)?;
        Arc::new(store)
    };

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        &config.common_email,
        &config.common_password,
    )
    .map_err(startup_error)?;

    let app_state = state::AppState {
        users,
        mailer: Arc::new(mailer),
        jwt: JwtSettings {
            secret: config.jwt_secret.clone(),
            expires_in: config.jwt_token_expire,
        },
    };

    log::info!("listening on {}:{}", config.server_host, config.server_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::init)
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
