//! app.rs
//! Armado de servicios y rutas. `main` y los tests usan lo mismo.

use std::sync::Arc;

use actix_web::{error, web, HttpRequest};
use sqlx::{Pool, Sqlite};

use crate::config::app_config::AppConfig;
use crate::errors::ApiError;
use crate::handlers::{
    auth_handler, expediente_handler, health_handler, tipo_expediente_handler,
};
use crate::repositories::{
    expediente_repository::SqliteExpedienteRepository,
    tipo_expediente_repository::SqliteTipoExpedienteRepository,
    usuario_repository::SqliteUsuarioRepository,
};
use crate::services::{
    auth_service::AuthService,
    expediente_service::{ExpedienteService, ExpedienteServiceImpl},
    tipo_expediente_service::TipoExpedienteService,
};

/// Servicios compartidos por todos los workers.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Pool<Sqlite>,
    pub auth_service: AuthService,
    pub expediente_service: Arc<dyn ExpedienteService>,
    pub tipo_service: TipoExpedienteService,
}

impl AppState {
    pub fn new(db_pool: Pool<Sqlite>, config: &AppConfig) -> Self {
        let expediente_repo = Arc::new(SqliteExpedienteRepository::new(db_pool.clone()));
        let tipo_repo = Arc::new(SqliteTipoExpedienteRepository::new(db_pool.clone()));
        let usuario_repo = Arc::new(SqliteUsuarioRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        );
        let expediente_service: Arc<dyn ExpedienteService> = Arc::new(
            ExpedienteServiceImpl::new(expediente_repo, tipo_repo.clone(), usuario_repo),
        );

        AppState {
            db_pool,
            auth_service,
            expediente_service,
            tipo_service: TipoExpedienteService::new(tipo_repo),
        }
    }
}

pub fn init_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.db_pool.clone()))
        .app_data(web::Data::new(state.auth_service.clone()))
        .app_data(web::Data::from(state.expediente_service.clone()))
        .app_data(web::Data::new(state.tipo_service.clone()))
        // Errores de parseo con el mismo JSON que el resto
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_handler::health_endpoint))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth_handler::login_endpoint))
                    .route("/me", web::get().to(auth_handler::me_endpoint)),
            )
            .route(
                "/tipos-expediente",
                web::get().to(tipo_expediente_handler::list_tipos_endpoint),
            )
            .service(
                web::scope("/expedientes")
                    .route(
                        "",
                        web::get().to(expediente_handler::list_expedientes_endpoint),
                    )
                    .route(
                        "",
                        web::post().to(expediente_handler::create_expediente_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(expediente_handler::get_expediente_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::put().to(expediente_handler::update_expediente_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(expediente_handler::delete_expediente_endpoint),
                    ),
            ),
    );
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    ApiError::Validation(format!("JSON inválido: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    ApiError::Validation(format!("Parámetros inválidos: {}", err)).into()
}

fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
    ApiError::Validation(format!("Ruta inválida: {}", err)).into()
}
