//! tests/mod.rs
//! Pruebas del servicio sobre SQLite en memoria.

mod common;
mod expediente_service_tests;
