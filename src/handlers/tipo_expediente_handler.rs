use actix_web::{web, HttpResponse};

use crate::{
    errors::ApiResult, models::auth_model::AuthenticatedUser,
    services::tipo_expediente_service::TipoExpedienteService,
};

/// GET /api/tipos-expediente
pub async fn list_tipos_endpoint(
    _user: AuthenticatedUser,
    service: web::Data<TipoExpedienteService>,
) -> ApiResult<HttpResponse> {
    let tipos = service.list().await?;
    Ok(HttpResponse::Ok().json(tipos))
}
