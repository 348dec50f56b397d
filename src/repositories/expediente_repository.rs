//! repositories/expediente_repository.rs

use async_trait::async_trait;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::models::expediente_model::{ExpedienteEntity, ExpedienteFilter};

const SELECT_EXPEDIENTE: &str = r#"
    SELECT
        id, tipo_expediente_id, anio, codigo, fecha_creacion,
        estado, usuario_responsable_id, asunto, fecha_actualizacion
    FROM expedientes
"#;

#[async_trait]
pub trait ExpedienteRepository: Send + Sync {
    async fn find_all(
        &self,
        filter: &ExpedienteFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<ExpedienteEntity>>;

    async fn count(&self, filter: &ExpedienteFilter) -> sqlx::Result<i64>;

    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<ExpedienteEntity>>;

    async fn find_by_codigo(
        &self,
        tipo_expediente_id: i64,
        anio: i32,
        codigo: &str,
    ) -> sqlx::Result<Option<ExpedienteEntity>>;

    /// Siguiente número de secuencia para (tipo, año): cantidad actual + 1
    async fn next_sequence(&self, tipo_expediente_id: i64, anio: i32) -> sqlx::Result<i64>;

    /// Inserta y devuelve el id asignado (se ignora `entity.id`)
    async fn save(&self, entity: &ExpedienteEntity) -> sqlx::Result<i64>;

    /// Devuelve false si no existía
    async fn update(&self, entity: &ExpedienteEntity) -> sqlx::Result<bool>;

    /// Devuelve false si no existía
    async fn delete_by_id(&self, id: i64) -> sqlx::Result<bool>;
}

#[derive(Clone, Debug)]
pub struct SqliteExpedienteRepository {
    db_pool: Pool<Sqlite>,
}

impl SqliteExpedienteRepository {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SqliteExpedienteRepository { db_pool }
    }
}

/// Agrega el WHERE con los filtros presentes.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ExpedienteFilter) {
    let mut sep = " WHERE ";

    if let Some(estado) = &filter.estado {
        qb.push(sep).push("estado = ").push_bind(estado.clone());
        sep = " AND ";
    }
    if let Some(anio) = filter.anio {
        qb.push(sep).push("anio = ").push_bind(anio);
        sep = " AND ";
    }
    if let Some(tipo_id) = filter.tipo_expediente_id {
        qb.push(sep).push("tipo_expediente_id = ").push_bind(tipo_id);
        sep = " AND ";
    }
    if let Some(usuario_id) = filter.usuario_responsable_id {
        qb.push(sep)
            .push("usuario_responsable_id = ")
            .push_bind(usuario_id);
    }
}

#[async_trait]
impl ExpedienteRepository for SqliteExpedienteRepository {
    async fn find_all(
        &self,
        filter: &ExpedienteFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<ExpedienteEntity>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_EXPEDIENTE);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY fecha_creacion DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        qb.build_query_as::<ExpedienteEntity>()
            .fetch_all(&self.db_pool)
            .await
    }

    async fn count(&self, filter: &ExpedienteFilter) -> sqlx::Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM expedientes");
        push_filter(&mut qb, filter);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await
    }

    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<ExpedienteEntity>> {
        let sql = format!("{} WHERE id = ?1", SELECT_EXPEDIENTE);
        sqlx::query_as::<_, ExpedienteEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
    }

    async fn find_by_codigo(
        &self,
        tipo_expediente_id: i64,
        anio: i32,
        codigo: &str,
    ) -> sqlx::Result<Option<ExpedienteEntity>> {
        let sql = format!(
            "{} WHERE tipo_expediente_id = ?1 AND anio = ?2 AND codigo = ?3",
            SELECT_EXPEDIENTE
        );
        sqlx::query_as::<_, ExpedienteEntity>(&sql)
            .bind(tipo_expediente_id)
            .bind(anio)
            .bind(codigo)
            .fetch_optional(&self.db_pool)
            .await
    }

    async fn next_sequence(&self, tipo_expediente_id: i64, anio: i32) -> sqlx::Result<i64> {
        let (cnt,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM expedientes WHERE tipo_expediente_id = ?1 AND anio = ?2",
        )
        .bind(tipo_expediente_id)
        .bind(anio)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(cnt + 1)
    }

    async fn save(&self, entity: &ExpedienteEntity) -> sqlx::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO expedientes (
                tipo_expediente_id, anio, codigo, fecha_creacion,
                estado, usuario_responsable_id, asunto, fecha_actualizacion
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(entity.tipo_expediente_id)
        .bind(entity.anio)
        .bind(&entity.codigo)
        .bind(&entity.fecha_creacion)
        .bind(&entity.estado)
        .bind(entity.usuario_responsable_id)
        .bind(&entity.asunto)
        .bind(&entity.fecha_actualizacion)
        .execute(&self.db_pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, entity: &ExpedienteEntity) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE expedientes
            SET tipo_expediente_id = ?2,
                anio = ?3,
                codigo = ?4,
                estado = ?5,
                usuario_responsable_id = ?6,
                asunto = ?7,
                fecha_actualizacion = ?8
            WHERE id = ?1
            "#,
        )
        .bind(entity.id)
        .bind(entity.tipo_expediente_id)
        .bind(entity.anio)
        .bind(&entity.codigo)
        .bind(&entity.estado)
        .bind(entity.usuario_responsable_id)
        .bind(&entity.asunto)
        .bind(&entity.fecha_actualizacion)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM expedientes WHERE id = ?1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
