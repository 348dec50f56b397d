//! converters/expediente_converter.rs
//! Mapeo campo a campo entre las filas de la base y los VO del frontend.
//! Las fechas se guardan como RFC3339 y el estado como su código en texto.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{
    expediente_model::ExpedienteEntity,
    expediente_vo::{EstadoExpediente, ExpedienteVo},
    tipo_expediente_model::{TipoExpedienteEntity, TipoExpedienteVo},
    usuario_model::{Rol, UsuarioEntity, UsuarioVo},
};

pub fn to_vo(entity: ExpedienteEntity) -> Result<ExpedienteVo> {
    let estado: EstadoExpediente = entity.estado.parse().map_err(|e: String| {
        anyhow!("Expediente {} con estado inválido: {}", entity.id, e)
    })?;

    Ok(ExpedienteVo {
        id: entity.id,
        tipo_expediente_id: entity.tipo_expediente_id,
        anio: entity.anio,
        fecha_creacion: parse_fecha(&entity.fecha_creacion)
            .with_context(|| format!("fecha_creacion del expediente {}", entity.id))?,
        fecha_actualizacion: parse_fecha(&entity.fecha_actualizacion)
            .with_context(|| format!("fecha_actualizacion del expediente {}", entity.id))?,
        codigo: entity.codigo,
        estado,
        usuario_responsable_id: entity.usuario_responsable_id,
        asunto: entity.asunto,
    })
}

pub fn to_entity(vo: ExpedienteVo) -> ExpedienteEntity {
    ExpedienteEntity {
        id: vo.id,
        tipo_expediente_id: vo.tipo_expediente_id,
        anio: vo.anio,
        codigo: vo.codigo,
        fecha_creacion: format_fecha(&vo.fecha_creacion),
        estado: vo.estado.as_str().to_string(),
        usuario_responsable_id: vo.usuario_responsable_id,
        asunto: vo.asunto,
        fecha_actualizacion: format_fecha(&vo.fecha_actualizacion),
    }
}

pub fn to_vo_list(entities: Vec<ExpedienteEntity>) -> Result<Vec<ExpedienteVo>> {
    entities.into_iter().map(to_vo).collect()
}

pub fn tipo_to_vo(entity: TipoExpedienteEntity) -> TipoExpedienteVo {
    TipoExpedienteVo {
        id: entity.id,
        nombre: entity.nombre,
        prefijo: entity.prefijo,
    }
}

pub fn usuario_to_vo(entity: UsuarioEntity) -> Result<UsuarioVo> {
    let rol: Rol = entity
        .rol
        .parse()
        .map_err(|e: String| anyhow!("Usuario {} con rol inválido: {}", entity.id, e))?;

    Ok(UsuarioVo {
        id: entity.id,
        fecha_creacion: parse_fecha(&entity.fecha_creacion)
            .with_context(|| format!("fecha_creacion del usuario {}", entity.id))?,
        username: entity.username,
        nombre: entity.nombre,
        rol,
        activo: entity.activo,
    })
}

/// Formato único para todas las fechas persistidas (precisión de microsegundos).
pub fn format_fecha(fecha: &DateTime<Utc>) -> String {
    fecha.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_fecha(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Fecha inválida: {:?}", raw))?;
    Ok(parsed.with_timezone(&Utc))
}
