//! logger.rs
//! Logs de la API con env_logger.

/// Filtro por defecto: info para la app, sin el log por sentencia de sqlx.
const DEFAULT_FILTER: &str = "info,sqlx::query=warn";

/// `RUST_LOG` manda si está definido y no vacío.
fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

pub fn init_logger() {
    let filter = log_filter(std::env::var("RUST_LOG").ok());

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_secs()
        .init();

    log::debug!("(init_logger) Filtro de logs: {}", filter);
}
