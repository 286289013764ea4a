use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use atelier_api::config;
use atelier_api::database::pool;
use atelier_api::handlers;
use atelier_api::middleware::jwt_auth_middleware;
use atelier_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("starting atelier-api in {:?} mode", config.environment);

    let pg = pool::connect(config)
        .await
        .unwrap_or_else(|e| panic!("database connection failed: {}", e));

    pool::run_migrations(&pg)
        .await
        .unwrap_or_else(|e| panic!("migrations failed: {}", e));

    let app = app(AppState::new(pg.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("atelier-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    pool::close(&pg).await;
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::auth::login))
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(lead_routes())
        .merge(contact_routes())
        .merge(conversion_routes())
        .merge(user_routes())
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn auth_routes() -> Router<AppState> {
    use atelier_api::handlers::auth;

    Router::new().route("/api/auth/whoami", get(auth::whoami))
}

fn lead_routes() -> Router<AppState> {
    use atelier_api::handlers::leads;

    Router::new()
        .route("/api/leads", get(leads::list_leads).post(leads::create_lead))
        .route(
            "/api/leads/:id",
            get(leads::get_lead).patch(leads::update_lead).delete(leads::delete_lead),
        )
}

fn contact_routes() -> Router<AppState> {
    use atelier_api::handlers::contacts;

    Router::new()
        .route("/api/contacts", get(contacts::list_contacts))
        .route("/api/contacts/:id", get(contacts::get_contact))
}

fn conversion_routes() -> Router<AppState> {
    use atelier_api::handlers::conversions;

    Router::new().route("/api/conversions", get(conversions::list_conversions))
}

fn user_routes() -> Router<AppState> {
    use atelier_api::handlers::users;

    Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", get(users::get_user))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Atelier API",
            "version": version,
            "description": "Multi-tenant CRM backend for an interior-design studio",
            "endpoints": {
                "home": "/ (public)",
                "login": "/auth/login (public - token acquisition)",
                "auth": "/api/auth/whoami (protected)",
                "leads": "/api/leads[/:id] (protected)",
                "contacts": "/api/contacts[/:id] (protected)",
                "conversions": "/api/conversions (protected)",
                "users": "/api/users[/:id] (protected, role-restricted)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match pool::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
