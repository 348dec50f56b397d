//! middleware/mod.rs
pub mod auth_middleware;
