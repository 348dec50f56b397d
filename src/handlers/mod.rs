//! handlers/mod.rs
//! Controllers HTTP (auth, expedientes, tipos, health).
pub mod auth_handler;
pub mod expediente_handler;
pub mod health_handler;
pub mod tipo_expediente_handler;
