//! services/mod.rs
//! Capa de negocio: coordina repositorios y conversiones.

pub mod auth_service;
pub mod expediente_service;
pub mod tipo_expediente_service;
