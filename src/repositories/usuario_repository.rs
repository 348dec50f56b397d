//! repositories/usuario_repository.rs

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::models::usuario_model::UsuarioEntity;

const SELECT_USUARIO: &str = r#"
    SELECT id, username, password_hash, nombre, rol, activo, fecha_creacion
    FROM usuarios
"#;

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<UsuarioEntity>>;
    async fn find_by_username(&self, username: &str) -> sqlx::Result<Option<UsuarioEntity>>;
    async fn count(&self) -> sqlx::Result<i64>;
    /// Inserta y devuelve el id asignado
    async fn save(&self, entity: &UsuarioEntity) -> sqlx::Result<i64>;
}

#[derive(Clone, Debug)]
pub struct SqliteUsuarioRepository {
    db_pool: Pool<Sqlite>,
}

impl SqliteUsuarioRepository {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SqliteUsuarioRepository { db_pool }
    }
}

#[async_trait]
impl UsuarioRepository for SqliteUsuarioRepository {
    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<UsuarioEntity>> {
        let sql = format!("{} WHERE id = ?1", SELECT_USUARIO);
        sqlx::query_as::<_, UsuarioEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
    }

    async fn find_by_username(&self, username: &str) -> sqlx::Result<Option<UsuarioEntity>> {
        let sql = format!("{} WHERE username = ?1", SELECT_USUARIO);
        sqlx::query_as::<_, UsuarioEntity>(&sql)
            .bind(username)
            .fetch_optional(&self.db_pool)
            .await
    }

    async fn count(&self) -> sqlx::Result<i64> {
        let (cnt,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(cnt)
    }

    async fn save(&self, entity: &UsuarioEntity) -> sqlx::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (
                username, password_hash, nombre, rol, activo, fecha_creacion
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entity.username)
        .bind(&entity.password_hash)
        .bind(&entity.nombre)
        .bind(&entity.rol)
        .bind(entity.activo)
        .bind(&entity.fecha_creacion)
        .execute(&self.db_pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
