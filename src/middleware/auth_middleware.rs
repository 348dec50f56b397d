//! middleware/auth_middleware.rs
//! Extractor `AuthenticatedUser`: cualquier handler que lo reciba exige
//! `Authorization: Bearer <token>` válido; si no, responde 401.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures_util::future::{ready, Ready};

use crate::{
    errors::{ApiError, ApiResult},
    models::auth_model::AuthenticatedUser,
    services::auth_service::AuthService,
};

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> ApiResult<AuthenticatedUser> {
    let auth_service = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| ApiError::Internal(anyhow!("AuthService no está registrado en la app")))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Falta el header Authorization".to_string()))?;

    let raw = header_value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Header Authorization inválido".to_string()))?;

    let token = bearer_token(raw).ok_or_else(|| {
        ApiError::Unauthorized("Se esperaba 'Authorization: Bearer <token>'".to_string())
    })?;

    auth_service.authenticate(token)
}

/// Extrae el token de "Bearer <token>" (el esquema no distingue mayúsculas).
pub fn bearer_token(raw: &str) -> Option<&str> {
    let (scheme, token) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
