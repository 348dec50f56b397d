//! converters/mod.rs
//! Conversión Entidad <-> Value Object.

pub mod expediente_converter;
