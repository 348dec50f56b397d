//! models/auth_model.rs
use serde::{Deserialize, Serialize};

use crate::models::usuario_model::Rol;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String, // siempre "Bearer"
    pub expires_in: i64,    // segundos
}

/// Claims del JWT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // id del usuario
    pub username: String,
    pub rol: String,
    pub iat: i64,
    pub exp: i64,
}

/// Usuario extraído de un token válido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub rol: Rol,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.rol == Rol::Admin
    }
}
