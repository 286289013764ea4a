use sqlx::PgPool;

/// Shared application state: the one database pool, opened at startup and
/// injected into every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
