//! services/auth_service.rs
//! Login, emisión/validación de JWT (HS256) y hashing de contraseñas (argon2id).

use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    converters::expediente_converter::{format_fecha, usuario_to_vo},
    errors::{is_unique_violation, ApiError, ApiResult},
    models::{
        auth_model::{AuthenticatedUser, Claims, LoginRequest, TokenResponse},
        usuario_model::{Rol, UsuarioEntity, UsuarioVo},
    },
    repositories::usuario_repository::UsuarioRepository,
};

/// Mensaje único para usuario inexistente, contraseña errónea o usuario inactivo
const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: Arc<dyn UsuarioRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_minutes: i64,
}

impl AuthService {
    pub fn new(
        usuario_repo: Arc<dyn UsuarioRepository>,
        jwt_secret: &str,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            usuario_repo,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            expiration_minutes,
        }
    }

    /// POST /api/auth/login
    pub async fn login(&self, req: LoginRequest) -> ApiResult<TokenResponse> {
        let user = match self.usuario_repo.find_by_username(req.username.trim()).await? {
            Some(user) => user,
            None => {
                // Mismo costo argon2 que un usuario real con contraseña errónea
                verify_password(&req.password, dummy_hash());
                log::warn!("(login) Usuario inexistente: {}", req.username);
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&req.password, &user.password_hash) {
            log::warn!("(login) Contraseña incorrecta para {}", user.username);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        if !user.activo {
            log::warn!("(login) Usuario inactivo: {}", user.username);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        log::info!("(login) Sesión iniciada por {}", user.username);
        Ok(self.issue_token(&user)?)
    }

    pub fn issue_token(&self, user: &UsuarioEntity) -> Result<TokenResponse> {
        let now = Utc::now().timestamp();
        let expires_in = self.expiration_minutes * 60;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            rol: user.rol.clone(),
            iat: now,
            exp: now + expires_in,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("No se pudo firmar el token")?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Valida firma y expiración. Cualquier fallo es 401.
    pub fn verify_token(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("(verify_token) Token rechazado: {}", e);
                ApiError::Unauthorized("Token inválido o expirado".to_string())
            })
    }

    pub fn authenticate(&self, token: &str) -> ApiResult<AuthenticatedUser> {
        let claims = self.verify_token(token)?;
        let invalid = || ApiError::Unauthorized("Token inválido o expirado".to_string());

        Ok(AuthenticatedUser {
            id: claims.sub.parse().map_err(|_| invalid())?,
            rol: claims.rol.parse().map_err(|_| invalid())?,
            username: claims.username,
        })
    }

    /// GET /api/auth/me
    pub async fn me(&self, user_id: i64) -> ApiResult<UsuarioVo> {
        let user = self
            .usuario_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("El usuario del token ya no existe".to_string()))?;

        Ok(usuario_to_vo(user)?)
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        nombre: &str,
        rol: Rol,
    ) -> ApiResult<UsuarioVo> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("El username no puede estar vacío".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "La contraseña debe tener al menos {} caracteres",
                MIN_PASSWORD_LEN
            )));
        }

        let mut entity = UsuarioEntity {
            id: 0,
            username: username.to_string(),
            password_hash: hash_password(password)?,
            nombre: nombre.trim().to_string(),
            rol: rol.as_str().to_string(),
            activo: true,
            fecha_creacion: format_fecha(&Utc::now()),
        };

        entity.id = self.usuario_repo.save(&entity).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("Ya existe el usuario {}", username))
            } else {
                ApiError::Database(e)
            }
        })?;

        log::info!("(create_user) Usuario {} creado con rol {}", username, rol);
        Ok(usuario_to_vo(entity)?)
    }

    /// Crea el administrador inicial si la tabla de usuarios está vacía.
    /// Devuelve true si lo creó.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> ApiResult<bool> {
        if self.usuario_repo.count().await? > 0 {
            return Ok(false);
        }
        self.create_user(username, password, "Administrador", Rol::Admin)
            .await?;
        Ok(true)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("No se pudo hashear la contraseña: {}", e))?;
    Ok(hash.to_string())
}

/// Hash con los mismos parámetros que los reales, calculado una sola vez.
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        hash_password("usuario-inexistente").unwrap_or_else(|e| {
            log::error!("(dummy_hash) {}", e);
            String::new()
        })
    })
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("(verify_password) Hash almacenado inválido: {}", e);
            false
        }
    }
}
