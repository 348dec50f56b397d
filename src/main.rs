use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;

use crate::app::AppState;
use crate::config::app_config::AppConfig;
use crate::logger::init_logger;

mod app;
mod config;
mod converters;
mod db;
mod errors;
mod handlers;
mod logger;
mod middleware;
mod models;
mod repositories;
mod services;

#[cfg(test)]
mod tests;

/// Conexiones del pool en producción
const DB_MAX_CONNECTIONS: u32 = 5;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().context("Configuración inválida")?;

    // Conectarnos a la DB y aplicar migraciones
    let db_pool = db::connect(&config.database_url, DB_MAX_CONNECTIONS).await?;
    db::run_migrations(&db_pool).await?;

    let state = AppState::new(db_pool, &config);

    // Administrador inicial
    match (&config.admin_username, &config.admin_password) {
        (Some(username), Some(password)) => {
            if state.auth_service.ensure_admin(username, password).await? {
                log::info!("Administrador inicial '{}' creado", username);
            }
        }
        _ => log::info!("ADMIN_USERNAME/ADMIN_PASSWORD no definidos, no se crea administrador"),
    }

    // Levantar servidor
    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| app::init_app(cfg, &state))
    })
    .workers(config.workers)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
