//! models/expediente_vo.rs
//! Value Objects: lo que viaja hacia/desde el frontend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoExpediente {
    #[default]
    Abierto,
    EnTramite,
    Cerrado,
    Archivado,
}

impl EstadoExpediente {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoExpediente::Abierto => "ABIERTO",
            EstadoExpediente::EnTramite => "EN_TRAMITE",
            EstadoExpediente::Cerrado => "CERRADO",
            EstadoExpediente::Archivado => "ARCHIVADO",
        }
    }
}

impl fmt::Display for EstadoExpediente {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoExpediente {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ABIERTO" => Ok(EstadoExpediente::Abierto),
            "EN_TRAMITE" => Ok(EstadoExpediente::EnTramite),
            "CERRADO" => Ok(EstadoExpediente::Cerrado),
            "ARCHIVADO" => Ok(EstadoExpediente::Archivado),
            other => Err(format!("Estado de expediente desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpedienteVo {
    pub id: i64,
    pub tipo_expediente_id: i64,
    pub anio: i32,
    pub codigo: String,
    pub fecha_creacion: DateTime<Utc>,
    pub estado: EstadoExpediente,
    pub usuario_responsable_id: i64,
    pub asunto: String,
    pub fecha_actualizacion: DateTime<Utc>,
}

/// Request para crear un expediente.
/// Si no viene `codigo` se genera a partir del prefijo del tipo y el año.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpedienteRequest {
    pub tipo_expediente_id: i64,
    pub anio: Option<i32>,
    pub codigo: Option<String>,
    pub estado: Option<EstadoExpediente>,
    /// Por defecto, el usuario autenticado
    pub usuario_responsable_id: Option<i64>,
    pub asunto: String,
}

/// Actualización parcial: sólo se tocan los campos presentes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpedienteRequest {
    pub tipo_expediente_id: Option<i64>,
    pub anio: Option<i32>,
    pub codigo: Option<String>,
    pub estado: Option<EstadoExpediente>,
    pub usuario_responsable_id: Option<i64>,
    pub asunto: Option<String>,
}

/// Para listar expedientes con paginación
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListExpedientesResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<ExpedienteVo>,
}
