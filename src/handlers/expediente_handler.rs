//! handlers/expediente_handler.rs
//! Controller REST de expedientes. Todas las rutas exigen token.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    errors::ApiResult,
    models::{
        auth_model::AuthenticatedUser,
        expediente_model::ExpedienteFilter,
        expediente_vo::{CreateExpedienteRequest, EstadoExpediente, UpdateExpedienteRequest},
    },
    services::expediente_service::ExpedienteService,
};

#[derive(Debug, Deserialize)]
pub struct ListExpedientesQuery {
    page: Option<u64>,
    page_size: Option<u64>,
    estado: Option<EstadoExpediente>,
    anio: Option<i32>,
    tipo_expediente_id: Option<i64>,
    usuario_responsable_id: Option<i64>,
}

/// GET /api/expedientes
pub async fn list_expedientes_endpoint(
    _user: AuthenticatedUser,
    service: web::Data<dyn ExpedienteService>,
    query: web::Query<ListExpedientesQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let filter = ExpedienteFilter {
        estado: query.estado.map(|e| e.as_str().to_string()),
        anio: query.anio,
        tipo_expediente_id: query.tipo_expediente_id,
        usuario_responsable_id: query.usuario_responsable_id,
    };

    let list = service
        .list(filter, query.page.unwrap_or(1), query.page_size.unwrap_or(10))
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/expedientes/{id}
pub async fn get_expediente_endpoint(
    _user: AuthenticatedUser,
    service: web::Data<dyn ExpedienteService>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let expediente = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(expediente))
}

/// POST /api/expedientes
pub async fn create_expediente_endpoint(
    user: AuthenticatedUser,
    service: web::Data<dyn ExpedienteService>,
    body: web::Json<CreateExpedienteRequest>,
) -> ApiResult<HttpResponse> {
    let expediente = service.create(body.into_inner(), &user).await?;
    Ok(HttpResponse::Created()
        .append_header(("Location", format!("/api/expedientes/{}", expediente.id)))
        .json(expediente))
}

/// PUT /api/expedientes/{id}
pub async fn update_expediente_endpoint(
    _user: AuthenticatedUser,
    service: web::Data<dyn ExpedienteService>,
    path: web::Path<i64>,
    body: web::Json<UpdateExpedienteRequest>,
) -> ApiResult<HttpResponse> {
    let expediente = service
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expediente))
}

/// DELETE /api/expedientes/{id}
pub async fn delete_expediente_endpoint(
    user: AuthenticatedUser,
    service: web::Data<dyn ExpedienteService>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    service.delete(path.into_inner(), &user).await?;
    Ok(HttpResponse::NoContent().finish())
}
