use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use fynda_api::config::SecurityConfig;
use fynda_api::state::AppState;
use fynda_api::{config, database, handlers, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, FYNDA_* vars.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Fynda API in {:?} mode", config.environment);

    let pool = match database::connect(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to set up database pool: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(config, pool);
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("FYNDA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Fynda API server listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app(state: AppState) -> Router {
    let security = &state.config.security;

    // Per-endpoint CORS: submissions and login are POST-only, everything
    // else is GET-only. Preflight OPTIONS is answered by the layer itself.
    let post_routes = Router::new()
        .route("/waitlist", post(handlers::public::waitlist_submit))
        .route("/admin/login", post(handlers::public::admin_login))
        .layer(cors_layer(security, Method::POST));

    let public_get_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .layer(cors_layer(security, Method::GET));

    let protected_routes = Router::new()
        .route("/admin/waitlist", get(handlers::protected::waitlist_summary))
        .route_layer(axum_middleware::from_fn(middleware::admin_auth_middleware))
        .layer(cors_layer(security, Method::GET));

    Router::new()
        .merge(post_routes)
        .merge(public_get_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Restrict CORS to the single configured origin and the method this route
/// group serves.
fn cors_layer(security: &SecurityConfig, method: Method) -> CorsLayer {
    let origin = security
        .cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| panic!("invalid CORS origin: {}", security.cors_origin));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Fynda API",
            "version": version,
            "description": "Waitlist signup and admin back-office API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "waitlist": "POST /waitlist (public, rate limited)",
                "admin_login": "POST /admin/login (public, rate limited)",
                "admin_waitlist": "GET /admin/waitlist (admin session required)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match fynda_api::database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
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
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
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
