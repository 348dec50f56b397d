//! models/usuario_model.rs
//! Usuarios del sistema (responsables de expedientes y quienes inician sesión).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rol {
    Admin,
    Usuario,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "ADMIN",
            Rol::Usuario => "USUARIO",
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Rol::Admin),
            "USUARIO" => Ok(Rol::Usuario),
            other => Err(format!("Rol desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UsuarioEntity {
    pub id: i64,
    pub username: String,
    pub password_hash: String, // formato PHC (argon2id)
    pub nombre: String,
    pub rol: String,
    pub activo: bool,
    pub fecha_creacion: String,
}

/// Nunca expone el hash de la contraseña.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsuarioVo {
    pub id: i64,
    pub username: String,
    pub nombre: String,
    pub rol: Rol,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}
