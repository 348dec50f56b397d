//! tests/expediente_service_tests.rs
//! Pruebas de `ExpedienteServiceImpl` contra SQLite en memoria.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{is_unique_violation, ApiError};
use crate::models::expediente_model::{ExpedienteEntity, ExpedienteFilter};
use crate::models::expediente_vo::{
    CreateExpedienteRequest, EstadoExpediente, UpdateExpedienteRequest,
};
use crate::models::usuario_model::Rol;
use crate::repositories::{
    expediente_repository::{ExpedienteRepository, SqliteExpedienteRepository},
    tipo_expediente_repository::SqliteTipoExpedienteRepository,
    usuario_repository::SqliteUsuarioRepository,
};
use crate::services::expediente_service::{ExpedienteService, ExpedienteServiceImpl};
use crate::tests::common::{actor, create_user, setup_state, TIPO_ADM, TIPO_JUD};

fn nuevo(tipo: i64, anio: i32, asunto: &str) -> CreateExpedienteRequest {
    CreateExpedienteRequest {
        tipo_expediente_id: tipo,
        anio: Some(anio),
        codigo: None,
        estado: None,
        usuario_responsable_id: None,
        asunto: asunto.to_string(),
    }
}

#[actix_rt::test]
async fn test_create_and_get() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let created = service
        .create(nuevo(TIPO_ADM, 2024, "  Solicitud de licencia  "), &ana)
        .await
        .unwrap();

    assert_eq!(created.codigo, "ADM-2024-00001");
    assert_eq!(created.asunto, "Solicitud de licencia");
    assert_eq!(created.estado, EstadoExpediente::Abierto);
    assert_eq!(created.usuario_responsable_id, ana.id);
    assert_eq!(created.fecha_creacion, created.fecha_actualizacion);

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[actix_rt::test]
async fn test_generated_codes_are_sequential_per_tipo_and_anio() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let a = service.create(nuevo(TIPO_ADM, 2024, "uno"), &ana).await.unwrap();
    let b = service.create(nuevo(TIPO_ADM, 2024, "dos"), &ana).await.unwrap();
    let c = service.create(nuevo(TIPO_ADM, 2025, "tres"), &ana).await.unwrap();
    let d = service.create(nuevo(TIPO_JUD, 2024, "cuatro"), &ana).await.unwrap();

    assert_eq!(a.codigo, "ADM-2024-00001");
    assert_eq!(b.codigo, "ADM-2024-00002");
    assert_eq!(c.codigo, "ADM-2025-00001");
    assert_eq!(d.codigo, "JUD-2024-00001");
}

#[actix_rt::test]
async fn test_generated_code_skips_codes_in_use() {
    let state = setup_state().await;
    let admin = actor(&create_user(&state, "admin", Rol::Admin).await);
    let service = &state.expediente_service;

    let first = service.create(nuevo(TIPO_ADM, 2024, "uno"), &admin).await.unwrap();
    service.create(nuevo(TIPO_ADM, 2024, "dos"), &admin).await.unwrap();
    service.delete(first.id, &admin).await.unwrap();

    // Queda 1 expediente, pero 00002 ya está tomado
    let next = service.create(nuevo(TIPO_ADM, 2024, "tres"), &admin).await.unwrap();
    assert_eq!(next.codigo, "ADM-2024-00003");
}

#[actix_rt::test]
async fn test_duplicate_codigo_is_conflict() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let mut req = nuevo(TIPO_ADM, 2024, "uno");
    req.codigo = Some("EXP-1".to_string());
    service.create(req.clone(), &ana).await.unwrap();

    let err = service.create(req.clone(), &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "{:?}", err);

    // Mismo código en otro año es válido
    req.anio = Some(2023);
    assert!(service.create(req, &ana).await.is_ok());
}

#[actix_rt::test]
async fn test_create_validations() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let err = service.create(nuevo(TIPO_ADM, 2024, "   "), &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service
        .create(nuevo(TIPO_ADM, 2024, &"x".repeat(501)), &ana)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service.create(nuevo(999, 2024, "tipo raro"), &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service.create(nuevo(TIPO_ADM, 1800, "antiguo"), &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let mut req = nuevo(TIPO_ADM, 2024, "sin responsable");
    req.usuario_responsable_id = Some(999);
    let err = service.create(req, &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let mut req = nuevo(TIPO_ADM, 2024, "código vacío");
    req.codigo = Some("  ".to_string());
    let err = service.create(req, &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_rt::test]
async fn test_inactive_responsable_is_rejected() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let beto = create_user(&state, "beto", Rol::Usuario).await;

    sqlx::query("UPDATE usuarios SET activo = 0 WHERE id = ?1")
        .bind(beto.id)
        .execute(&state.db_pool)
        .await
        .unwrap();

    let mut req = nuevo(TIPO_ADM, 2024, "para beto");
    req.usuario_responsable_id = Some(beto.id);
    let err = state.expediente_service.create(req, &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_rt::test]
async fn test_list_pagination_and_filters() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    for i in 0..3 {
        service
            .create(nuevo(TIPO_ADM, 2024, &format!("adm {}", i)), &ana)
            .await
            .unwrap();
    }
    let mut req = nuevo(TIPO_JUD, 2023, "judicial cerrado");
    req.estado = Some(EstadoExpediente::Cerrado);
    let cerrado = service.create(req, &ana).await.unwrap();

    let page1 = service.list(ExpedienteFilter::default(), 1, 3).await.unwrap();
    assert_eq!(page1.total, 4);
    assert_eq!(page1.items.len(), 3);
    // Más reciente primero
    assert_eq!(page1.items[0].id, cerrado.id);

    let page2 = service.list(ExpedienteFilter::default(), 2, 3).await.unwrap();
    assert_eq!(page2.total, 4);
    assert_eq!(page2.items.len(), 1);

    let filter = ExpedienteFilter {
        estado: Some("CERRADO".to_string()),
        ..Default::default()
    };
    let cerrados = service.list(filter, 1, 10).await.unwrap();
    assert_eq!(cerrados.total, 1);
    assert_eq!(cerrados.items[0].codigo, "JUD-2023-00001");

    let filter = ExpedienteFilter {
        anio: Some(2024),
        tipo_expediente_id: Some(TIPO_ADM),
        usuario_responsable_id: Some(ana.id),
        ..Default::default()
    };
    assert_eq!(service.list(filter, 1, 10).await.unwrap().total, 3);
}

#[actix_rt::test]
async fn test_list_rejects_bad_paging() {
    let state = setup_state().await;
    let service = &state.expediente_service;

    let err = service.list(ExpedienteFilter::default(), 0, 10).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service.list(ExpedienteFilter::default(), 1, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service.list(ExpedienteFilter::default(), 1, 101).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let empty = service.list(ExpedienteFilter::default(), 5, 100).await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.items.is_empty());
}

#[actix_rt::test]
async fn test_update_merges_fields() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let beto = create_user(&state, "beto", Rol::Usuario).await;
    let service = &state.expediente_service;

    let created = service.create(nuevo(TIPO_ADM, 2024, "original"), &ana).await.unwrap();

    let updated = service
        .update(
            created.id,
            UpdateExpedienteRequest {
                estado: Some(EstadoExpediente::EnTramite),
                usuario_responsable_id: Some(beto.id),
                asunto: Some("modificado".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.codigo, created.codigo);
    assert_eq!(updated.fecha_creacion, created.fecha_creacion);
    assert_eq!(updated.estado, EstadoExpediente::EnTramite);
    assert_eq!(updated.usuario_responsable_id, beto.id);
    assert_eq!(updated.asunto, "modificado");
    assert!(updated.fecha_actualizacion >= created.fecha_actualizacion);

    assert_eq!(service.get(created.id).await.unwrap(), updated);
}

#[actix_rt::test]
async fn test_update_errors() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let err = service
        .update(42, UpdateExpedienteRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let a = service.create(nuevo(TIPO_ADM, 2024, "a"), &ana).await.unwrap();
    let b = service.create(nuevo(TIPO_ADM, 2024, "b"), &ana).await.unwrap();

    let err = service
        .update(
            b.id,
            UpdateExpedienteRequest {
                codigo: Some(a.codigo.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // Reasignar su propio código no es conflicto
    let same = service
        .update(
            a.id,
            UpdateExpedienteRequest {
                codigo: Some(a.codigo.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(same.is_ok());

    let err = service
        .update(
            a.id,
            UpdateExpedienteRequest {
                tipo_expediente_id: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[actix_rt::test]
async fn test_delete_requires_admin() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let admin = actor(&create_user(&state, "admin", Rol::Admin).await);
    let service = &state.expediente_service;

    let created = service.create(nuevo(TIPO_ADM, 2024, "borrar"), &ana).await.unwrap();

    let err = service.delete(created.id, &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert!(service.get(created.id).await.is_ok());

    service.delete(created.id, &admin).await.unwrap();
    let err = service.get(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = service.delete(created.id, &admin).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

/// Repositorio que nunca encuentra códigos: simula que otra petición insertó
/// el mismo código entre la verificación y el INSERT.
struct CodigoSiempreLibre(SqliteExpedienteRepository);

#[async_trait]
impl ExpedienteRepository for CodigoSiempreLibre {
    async fn find_all(
        &self,
        filter: &ExpedienteFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<ExpedienteEntity>> {
        self.0.find_all(filter, limit, offset).await
    }

    async fn count(&self, filter: &ExpedienteFilter) -> sqlx::Result<i64> {
        self.0.count(filter).await
    }

    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<ExpedienteEntity>> {
        self.0.find_by_id(id).await
    }

    async fn find_by_codigo(
        &self,
        _tipo_expediente_id: i64,
        _anio: i32,
        _codigo: &str,
    ) -> sqlx::Result<Option<ExpedienteEntity>> {
        Ok(None)
    }

    async fn next_sequence(&self, tipo_expediente_id: i64, anio: i32) -> sqlx::Result<i64> {
        self.0.next_sequence(tipo_expediente_id, anio).await
    }

    async fn save(&self, entity: &ExpedienteEntity) -> sqlx::Result<i64> {
        self.0.save(entity).await
    }

    async fn update(&self, entity: &ExpedienteEntity) -> sqlx::Result<bool> {
        self.0.update(entity).await
    }

    async fn delete_by_id(&self, id: i64) -> sqlx::Result<bool> {
        self.0.delete_by_id(id).await
    }
}

#[actix_rt::test]
async fn test_unique_index_rejects_duplicate_insert() {
    let state = setup_state().await;
    let ana = create_user(&state, "ana", Rol::Usuario).await;
    let repo = SqliteExpedienteRepository::new(state.db_pool.clone());

    let entity = ExpedienteEntity {
        id: 0,
        tipo_expediente_id: TIPO_ADM,
        anio: 2024,
        codigo: "EXP-1".to_string(),
        fecha_creacion: "2024-01-01T00:00:00.000000Z".to_string(),
        estado: "ABIERTO".to_string(),
        usuario_responsable_id: ana.id,
        asunto: "uno".to_string(),
        fecha_actualizacion: "2024-01-01T00:00:00.000000Z".to_string(),
    };

    repo.save(&entity).await.unwrap();
    let err = repo.save(&entity).await.unwrap_err();
    assert!(is_unique_violation(&err), "{:?}", err);
}

#[actix_rt::test]
async fn test_lost_race_on_insert_is_conflict() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let pool = state.db_pool.clone();

    let service = ExpedienteServiceImpl::new(
        Arc::new(CodigoSiempreLibre(SqliteExpedienteRepository::new(pool.clone()))),
        Arc::new(SqliteTipoExpedienteRepository::new(pool.clone())),
        Arc::new(SqliteUsuarioRepository::new(pool)),
    );

    let mut req = nuevo(TIPO_ADM, 2024, "uno");
    req.codigo = Some("EXP-1".to_string());
    service.create(req.clone(), &ana).await.unwrap();

    let err = service.create(req, &ana).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "{:?}", err);

    // Lo mismo al actualizar hacia un código ocupado
    let otro = service.create(nuevo(TIPO_ADM, 2024, "dos"), &ana).await.unwrap();
    let err = service
        .update(
            otro.id,
            UpdateExpedienteRequest {
                codigo: Some("EXP-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "{:?}", err);
}

#[actix_rt::test]
async fn test_generated_codigo_follows_tipo_and_anio() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    service.create(nuevo(TIPO_JUD, 2025, "ya existe"), &ana).await.unwrap();
    let created = service.create(nuevo(TIPO_ADM, 2024, "mover"), &ana).await.unwrap();
    assert_eq!(created.codigo, "ADM-2024-00001");

    let moved = service
        .update(
            created.id,
            UpdateExpedienteRequest {
                tipo_expediente_id: Some(TIPO_JUD),
                anio: Some(2025),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.tipo_expediente_id, TIPO_JUD);
    assert_eq!(moved.anio, 2025);
    assert_eq!(moved.codigo, "JUD-2025-00002");

    // Sólo cambia el año
    let moved = service
        .update(
            created.id,
            UpdateExpedienteRequest {
                anio: Some(2026),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.codigo, "JUD-2026-00001");
}

#[actix_rt::test]
async fn test_manual_codigo_is_kept_when_tipo_changes() {
    let state = setup_state().await;
    let ana = actor(&create_user(&state, "ana", Rol::Usuario).await);
    let service = &state.expediente_service;

    let mut req = nuevo(TIPO_ADM, 2024, "manual");
    req.codigo = Some("EXP-MANUAL".to_string());
    let created = service.create(req, &ana).await.unwrap();

    let moved = service
        .update(
            created.id,
            UpdateExpedienteRequest {
                tipo_expediente_id: Some(TIPO_JUD),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.codigo, "EXP-MANUAL");

    // Con código explícito manda el del request
    let renamed = service
        .update(
            created.id,
            UpdateExpedienteRequest {
                anio: Some(2023),
                codigo: Some("EXP-2023".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.codigo, "EXP-2023");
}
