//! config/app_config.rs
//! Configuración global del servicio (puerto, base de datos, JWT...).
//! Los valores se leen del entorno (.env cargado con dotenv) y, si no están,
//! se usan los valores por defecto.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Secreto usado sólo en desarrollo cuando no hay JWT_SECRET.
const DEV_JWT_SECRET: &str = "dev-secret-no-usar-en-produccion-0123456789";
/// Longitud mínima aceptada para JWT_SECRET
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub workers: usize,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    /// Credenciales del administrador inicial (sólo si la tabla usuarios está vacía)
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5022,
            database_url: "sqlite:./data/expedientes.db".to_string(),
            workers: 1,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_minutes: 60,
            admin_username: None,
            admin_password: None,
        }
    }
}

impl AppConfig {
    /// Construye la configuración a partir de las variables de entorno.
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(anyhow!(
                    "JWT_SECRET debe tener al menos {} caracteres",
                    MIN_JWT_SECRET_LEN
                ))
            }
            Ok(secret) => secret,
            Err(_) => {
                log::warn!("JWT_SECRET no definido, usando secreto de desarrollo");
                defaults.jwt_secret
            }
        };

        let jwt_expiration_minutes: i64 =
            parse_var("JWT_EXPIRATION_MINUTES", defaults.jwt_expiration_minutes)?;
        if jwt_expiration_minutes <= 0 {
            return Err(anyhow!("JWT_EXPIRATION_MINUTES debe ser positivo"));
        }

        Ok(AppConfig {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            workers: parse_var("WORKERS", defaults.workers)?.max(1),
            jwt_secret,
            jwt_expiration_minutes,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valor inválido para {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
