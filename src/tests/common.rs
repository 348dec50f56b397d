//! tests/common.rs
//! Helpers compartidos: base en memoria con migraciones, usuarios y tokens.

use sqlx::{Pool, Sqlite};

use crate::app::AppState;
use crate::config::app_config::AppConfig;
use crate::db;
use crate::models::auth_model::{AuthenticatedUser, LoginRequest};
use crate::models::usuario_model::{Rol, UsuarioVo};

pub const TEST_JWT_SECRET: &str = "secreto-de-pruebas-con-mas-de-32-caracteres";
pub const TEST_PASSWORD: &str = "clave-segura-123";

/// Ids sembrados por la migración de tipos_expediente
pub const TIPO_ADM: i64 = 1;
pub const TIPO_JUD: i64 = 2;

pub async fn setup_pool() -> Pool<Sqlite> {
    // Una sola conexión: cada conexión a :memory: es una base distinta
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub async fn setup_state() -> AppState {
    AppState::new(setup_pool().await, &test_config())
}

pub async fn create_user(state: &AppState, username: &str, rol: Rol) -> UsuarioVo {
    state
        .auth_service
        .create_user(username, TEST_PASSWORD, username, rol)
        .await
        .expect("Failed to create user")
}

pub fn actor(user: &UsuarioVo) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        username: user.username.clone(),
        rol: user.rol,
    }
}

pub async fn token_for(state: &AppState, username: &str) -> String {
    state
        .auth_service
        .login(LoginRequest {
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("Login failed")
        .access_token
}
