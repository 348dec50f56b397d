use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

/// GET /api/health
/// Sin autenticación; verifica además que la base responda.
pub async fn health_endpoint(db_pool: web::Data<Pool<Sqlite>>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(e) => {
            log::error!("(health) La base no responde: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "details": "database unavailable"
            }))
        }
    }
}
