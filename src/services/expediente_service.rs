//! services/expediente_service.rs
//! Lógica de negocio de expedientes: validación, generación de códigos,
//! permisos y conversión Entidad -> VO.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};

use crate::{
    converters::expediente_converter::{format_fecha, to_vo, to_vo_list},
    errors::{is_unique_violation, ApiError, ApiResult},
    models::{
        auth_model::AuthenticatedUser,
        expediente_model::{ExpedienteEntity, ExpedienteFilter},
        expediente_vo::{
            CreateExpedienteRequest, ExpedienteVo, ListExpedientesResponse,
            UpdateExpedienteRequest,
        },
        tipo_expediente_model::TipoExpedienteEntity,
    },
    repositories::{
        expediente_repository::ExpedienteRepository,
        tipo_expediente_repository::TipoExpedienteRepository,
        usuario_repository::UsuarioRepository,
    },
};

pub const MAX_PAGE_SIZE: u64 = 100;
const MAX_ASUNTO_LEN: usize = 500;
const MAX_CODIGO_LEN: usize = 50;
const MIN_ANIO: i32 = 1900;
const MAX_ANIO: i32 = 2100;

#[async_trait]
pub trait ExpedienteService: Send + Sync {
    async fn list(
        &self,
        filter: ExpedienteFilter,
        page: u64,
        page_size: u64,
    ) -> ApiResult<ListExpedientesResponse>;

    async fn get(&self, id: i64) -> ApiResult<ExpedienteVo>;

    async fn create(
        &self,
        req: CreateExpedienteRequest,
        actor: &AuthenticatedUser,
    ) -> ApiResult<ExpedienteVo>;

    async fn update(&self, id: i64, req: UpdateExpedienteRequest) -> ApiResult<ExpedienteVo>;

    async fn delete(&self, id: i64, actor: &AuthenticatedUser) -> ApiResult<()>;
}

#[derive(Clone)]
pub struct ExpedienteServiceImpl {
    expediente_repo: Arc<dyn ExpedienteRepository>,
    tipo_repo: Arc<dyn TipoExpedienteRepository>,
    usuario_repo: Arc<dyn UsuarioRepository>,
}

impl ExpedienteServiceImpl {
    pub fn new(
        expediente_repo: Arc<dyn ExpedienteRepository>,
        tipo_repo: Arc<dyn TipoExpedienteRepository>,
        usuario_repo: Arc<dyn UsuarioRepository>,
    ) -> Self {
        Self {
            expediente_repo,
            tipo_repo,
            usuario_repo,
        }
    }

    async fn ensure_tipo(&self, tipo_id: i64) -> ApiResult<TipoExpedienteEntity> {
        self.tipo_repo
            .find_by_id(tipo_id)
            .await?
            .ok_or_else(|| {
                ApiError::Validation(format!("No existe el tipo de expediente {}", tipo_id))
            })
    }

    async fn ensure_responsable(&self, usuario_id: i64) -> ApiResult<()> {
        match self.usuario_repo.find_by_id(usuario_id).await? {
            Some(user) if user.activo => Ok(()),
            Some(_) => Err(ApiError::Validation(format!(
                "El usuario responsable {} está inactivo",
                usuario_id
            ))),
            None => Err(ApiError::Validation(format!(
                "No existe el usuario responsable {}",
                usuario_id
            ))),
        }
    }

    /// `{prefijo}-{anio}-{seq:05}`, saltando códigos ya usados (p.ej. tras borrados).
    async fn generate_codigo(&self, tipo: &TipoExpedienteEntity, anio: i32) -> ApiResult<String> {
        let mut seq = self.expediente_repo.next_sequence(tipo.id, anio).await?;
        loop {
            let candidate = format!("{}-{}-{:05}", tipo.prefijo, anio, seq);
            if self
                .expediente_repo
                .find_by_codigo(tipo.id, anio, &candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
            seq += 1;
        }
    }

    /// 409 si ya hay otro expediente con la misma (tipo, año, código).
    async fn ensure_codigo_libre(&self, entity: &ExpedienteEntity) -> ApiResult<()> {
        let existing = self
            .expediente_repo
            .find_by_codigo(entity.tipo_expediente_id, entity.anio, &entity.codigo)
            .await?;

        match existing {
            Some(other) if other.id != entity.id => Err(duplicate_codigo(entity)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ExpedienteService for ExpedienteServiceImpl {
    async fn list(
        &self,
        filter: ExpedienteFilter,
        page: u64,
        page_size: u64,
    ) -> ApiResult<ListExpedientesResponse> {
        if page == 0 {
            return Err(ApiError::Validation("page debe ser >= 1".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ApiError::Validation(format!(
                "page_size debe estar entre 1 y {}",
                MAX_PAGE_SIZE
            )));
        }

        let offset = i64::try_from((page - 1).saturating_mul(page_size)).unwrap_or(i64::MAX);
        let total = self.expediente_repo.count(&filter).await?;
        let rows = self
            .expediente_repo
            .find_all(&filter, page_size as i64, offset)
            .await?;

        Ok(ListExpedientesResponse {
            total: total as u64,
            page,
            page_size,
            items: to_vo_list(rows)?,
        })
    }

    async fn get(&self, id: i64) -> ApiResult<ExpedienteVo> {
        let entity = self
            .expediente_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(to_vo(entity)?)
    }

    async fn create(
        &self,
        req: CreateExpedienteRequest,
        actor: &AuthenticatedUser,
    ) -> ApiResult<ExpedienteVo> {
        let asunto = validate_asunto(&req.asunto)?;
        let anio = match req.anio {
            Some(anio) => validate_anio(anio)?,
            None => Utc::now().year(),
        };
        let tipo = self.ensure_tipo(req.tipo_expediente_id).await?;

        let responsable_id = req.usuario_responsable_id.unwrap_or(actor.id);
        self.ensure_responsable(responsable_id).await?;

        let codigo = match req.codigo.as_deref() {
            Some(codigo) => validate_codigo(codigo)?,
            None => self.generate_codigo(&tipo, anio).await?,
        };

        let now = format_fecha(&Utc::now());
        let mut entity = ExpedienteEntity {
            id: 0,
            tipo_expediente_id: tipo.id,
            anio,
            codigo,
            fecha_creacion: now.clone(),
            estado: req.estado.unwrap_or_default().as_str().to_string(),
            usuario_responsable_id: responsable_id,
            asunto,
            fecha_actualizacion: now,
        };
        self.ensure_codigo_libre(&entity).await?;

        // El índice UNIQUE resuelve la carrera entre dos creaciones simultáneas
        entity.id = self
            .expediente_repo
            .save(&entity)
            .await
            .map_err(|e| map_write_error(e, &entity))?;

        log::info!(
            "(create) Expediente {} creado con id={} por {}",
            entity.codigo,
            entity.id,
            actor.username
        );
        Ok(to_vo(entity)?)
    }

    async fn update(&self, id: i64, req: UpdateExpedienteRequest) -> ApiResult<ExpedienteVo> {
        let mut entity = self
            .expediente_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let anterior_tipo_id = entity.tipo_expediente_id;
        let anterior_anio = entity.anio;

        let mut nuevo_tipo = None;
        if let Some(tipo_id) = req.tipo_expediente_id {
            let tipo = self.ensure_tipo(tipo_id).await?;
            entity.tipo_expediente_id = tipo.id;
            nuevo_tipo = Some(tipo);
        }
        if let Some(anio) = req.anio {
            entity.anio = validate_anio(anio)?;
        }

        match req.codigo.as_deref() {
            Some(codigo) => entity.codigo = validate_codigo(codigo)?,
            // Un código generado sigue a su tipo y año; uno manual no se toca
            None if entity.tipo_expediente_id != anterior_tipo_id
                || entity.anio != anterior_anio =>
            {
                let anterior_prefijo = self
                    .tipo_repo
                    .find_by_id(anterior_tipo_id)
                    .await?
                    .map(|t| t.prefijo);
                let generado = anterior_prefijo.map_or(false, |prefijo| {
                    is_generated_codigo(&entity.codigo, &prefijo, anterior_anio)
                });
                if generado {
                    let tipo = match nuevo_tipo {
                        Some(tipo) => tipo,
                        None => self.ensure_tipo(entity.tipo_expediente_id).await?,
                    };
                    entity.codigo = self.generate_codigo(&tipo, entity.anio).await?;
                }
            }
            None => {}
        }
        if let Some(estado) = req.estado {
            entity.estado = estado.as_str().to_string();
        }
        if let Some(usuario_id) = req.usuario_responsable_id {
            self.ensure_responsable(usuario_id).await?;
            entity.usuario_responsable_id = usuario_id;
        }
        if let Some(asunto) = req.asunto.as_deref() {
            entity.asunto = validate_asunto(asunto)?;
        }

        self.ensure_codigo_libre(&entity).await?;
        entity.fecha_actualizacion = format_fecha(&Utc::now());

        let updated = self
            .expediente_repo
            .update(&entity)
            .await
            .map_err(|e| map_write_error(e, &entity))?;
        if !updated {
            return Err(not_found(id));
        }

        log::info!("(update) Expediente id={} actualizado", id);
        Ok(to_vo(entity)?)
    }

    async fn delete(&self, id: i64, actor: &AuthenticatedUser) -> ApiResult<()> {
        if !actor.is_admin() {
            log::warn!(
                "(delete) {} intentó borrar el expediente {} sin ser ADMIN",
                actor.username,
                id
            );
            return Err(ApiError::Forbidden(
                "Sólo un ADMIN puede eliminar expedientes".to_string(),
            ));
        }

        if !self.expediente_repo.delete_by_id(id).await? {
            return Err(not_found(id));
        }

        log::info!("(delete) Expediente id={} eliminado por {}", id, actor.username);
        Ok(())
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("No se encontró el expediente {}", id))
}

fn duplicate_codigo(entity: &ExpedienteEntity) -> ApiError {
    ApiError::Conflict(format!(
        "Ya existe el expediente {} para el tipo {} y año {}",
        entity.codigo, entity.tipo_expediente_id, entity.anio
    ))
}

fn map_write_error(err: sqlx::Error, entity: &ExpedienteEntity) -> ApiError {
    if is_unique_violation(&err) {
        duplicate_codigo(entity)
    } else {
        ApiError::Database(err)
    }
}

/// true si `codigo` tiene la forma `{prefijo}-{anio}-{seq}` que produce `generate_codigo`.
fn is_generated_codigo(codigo: &str, prefijo: &str, anio: i32) -> bool {
    codigo
        .strip_prefix(&format!("{}-{}-", prefijo, anio))
        .map_or(false, |seq| {
            seq.len() >= 5 && seq.bytes().all(|b| b.is_ascii_digit())
        })
}

fn validate_asunto(raw: &str) -> ApiResult<String> {
    let asunto = raw.trim();
    if asunto.is_empty() {
        return Err(ApiError::Validation("El asunto no puede estar vacío".to_string()));
    }
    if asunto.chars().count() > MAX_ASUNTO_LEN {
        return Err(ApiError::Validation(format!(
            "El asunto no puede superar {} caracteres",
            MAX_ASUNTO_LEN
        )));
    }
    Ok(asunto.to_string())
}

fn validate_codigo(raw: &str) -> ApiResult<String> {
    let codigo = raw.trim();
    if codigo.is_empty() || codigo.chars().count() > MAX_CODIGO_LEN {
        return Err(ApiError::Validation(format!(
            "El código debe tener entre 1 y {} caracteres",
            MAX_CODIGO_LEN
        )));
    }
    Ok(codigo.to_string())
}

fn validate_anio(anio: i32) -> ApiResult<i32> {
    if !(MIN_ANIO..=MAX_ANIO).contains(&anio) {
        return Err(ApiError::Validation(format!(
            "El año debe estar entre {} y {}",
            MIN_ANIO, MAX_ANIO
        )));
    }
    Ok(anio)
}
