//! models/expediente_model.rs
//! Entidad: una fila de la tabla `expedientes`, tal cual está en la base.

use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpedienteEntity {
    pub id: i64,
    pub tipo_expediente_id: i64,
    pub anio: i32,
    pub codigo: String,
    pub fecha_creacion: String, // RFC3339
    pub estado: String,         // "ABIERTO", "EN_TRAMITE", "CERRADO", "ARCHIVADO"
    pub usuario_responsable_id: i64,
    pub asunto: String,
    pub fecha_actualizacion: String, // RFC3339
}

/// Filtros opcionales para listar expedientes
#[derive(Debug, Clone, Default)]
pub struct ExpedienteFilter {
    pub estado: Option<String>,
    pub anio: Option<i32>,
    pub tipo_expediente_id: Option<i64>,
    pub usuario_responsable_id: Option<i64>,
}
