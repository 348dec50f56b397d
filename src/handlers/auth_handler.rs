//! handlers/auth_handler.rs
use actix_web::{web, HttpResponse};

use crate::{
    errors::ApiResult,
    models::auth_model::{AuthenticatedUser, LoginRequest},
    services::auth_service::AuthService,
};

/// POST /api/auth/login
pub async fn login_endpoint(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let token = auth_service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}

/// GET /api/auth/me
pub async fn me_endpoint(
    user: AuthenticatedUser,
    auth_service: web::Data<AuthService>,
) -> ApiResult<HttpResponse> {
    let usuario = auth_service.me(user.id).await?;
    Ok(HttpResponse::Ok().json(usuario))
}
