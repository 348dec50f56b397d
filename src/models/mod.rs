//! models/mod.rs
//! Módulo raíz para entidades y VOs.

pub mod auth_model;
pub mod expediente_model;
pub mod expediente_vo;
pub mod tipo_expediente_model;
pub mod usuario_model;
