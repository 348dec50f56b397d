use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::models::tipo_expediente_model::TipoExpedienteEntity;

#[async_trait]
pub trait TipoExpedienteRepository: Send + Sync {
    async fn find_all(&self) -> sqlx::Result<Vec<TipoExpedienteEntity>>;
    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<TipoExpedienteEntity>>;
}

#[derive(Clone, Debug)]
pub struct SqliteTipoExpedienteRepository {
    db_pool: Pool<Sqlite>,
}

impl SqliteTipoExpedienteRepository {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SqliteTipoExpedienteRepository { db_pool }
    }
}

#[async_trait]
impl TipoExpedienteRepository for SqliteTipoExpedienteRepository {
    async fn find_all(&self) -> sqlx::Result<Vec<TipoExpedienteEntity>> {
        sqlx::query_as::<_, TipoExpedienteEntity>(
            "SELECT id, nombre, prefijo FROM tipos_expediente ORDER BY nombre",
        )
        .fetch_all(&self.db_pool)
        .await
    }

    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<TipoExpedienteEntity>> {
        sqlx::query_as::<_, TipoExpedienteEntity>(
            "SELECT id, nombre, prefijo FROM tipos_expediente WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
    }
}
