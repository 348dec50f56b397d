use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TipoExpedienteEntity {
    pub id: i64,
    pub nombre: String,
    pub prefijo: String, // "ADM", "JUD", ...
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoExpedienteVo {
    pub id: i64,
    pub nombre: String,
    pub prefijo: String,
}
