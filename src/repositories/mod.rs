//! repositories/mod.rs
//! Acceso a datos. Cada repositorio es un trait con su implementación SQLite.

pub mod expediente_repository;
pub mod tipo_expediente_repository;
pub mod usuario_repository;
