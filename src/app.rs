use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{
    CultivationPlanning, Culture, Experiment, Project, Record, Strain, StrainProcessing, SubstanceIdentification,
};
use crate::database::DatabaseManager;
use crate::handlers;
use crate::middleware::{jwt_auth_middleware, session_middleware, validate_user_middleware};

/// Shared by every handler: the pool and the configuration it was built from
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Public API
        .merge(api_public_routes())
        // Bearer-token API
        .merge(api_routes(state.clone()))
        // Browser pages
        .merge(page_public_routes())
        .merge(page_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public;

    Router::new()
        .route("/api/", get(public::api_root))
        .route("/api/auth/login", post(public::auth_login))
}

fn api_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::auth;

    let router = Router::new().route("/api/auth/whoami", get(auth::whoami));

    let router = record_routes::<Strain>(router);
    let router = record_routes::<StrainProcessing>(router);
    let router = record_routes::<SubstanceIdentification>(router);
    let router = record_routes::<Experiment>(router);
    let router = record_routes::<CultivationPlanning>(router);
    let router = record_routes::<Project>(router);
    let router = record_routes::<Culture>(router);

    // Layers run bottom-up: token first, then the read/write split
    router
        .route_layer(from_fn(validate_user_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

/// Collection and member routes for one record type. GET routes also
/// answer HEAD.
fn record_routes<T: Record>(router: Router<AppState>) -> Router<AppState> {
    use handlers::protected::data;

    let resource = T::KIND.resource();

    router
        .route(
            &format!("/api/{}/", resource),
            get(data::schema_get::<T>)
                .post(data::schema_post::<T>)
                .options(data::schema_options::<T>),
        )
        .route(
            &format!("/api/{}/:id/", resource),
            get(data::record_get::<T>)
                .put(data::record_put::<T>)
                .patch(data::record_patch::<T>)
                .delete(data::record_delete::<T>)
                .options(data::record_options::<T>),
        )
}

fn page_public_routes() -> Router<AppState> {
    use handlers::pages::login;

    Router::new()
        .route("/", get(login::show).post(login::submit))
        .route("/logout/", get(login::logout))
}

fn page_routes(state: AppState) -> Router<AppState> {
    use handlers::pages::{chooser, create_all, home, lists};

    Router::new()
        .route("/home/", get(home::show))
        .route("/strains/", get(lists::strains))
        .route("/planning/", get(lists::planning))
        .route("/experiments/", get(lists::experiments))
        .route("/create_all/", get(create_all::show).post(create_all::submit))
        .route("/choose_model/", get(chooser::choose_model).post(chooser::choose_model_submit))
        .route(
            "/choose_object/:model/",
            get(chooser::choose_object).post(chooser::choose_object_submit),
        )
        .route(
            "/edit_model/:model/:id/",
            get(chooser::edit_model).post(chooser::edit_model_submit),
        )
        .route_layer(from_fn_with_state(state, session_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
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
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing(request_logging: bool) {
    let default_filter = if request_logging {
        "biobase=info,tower_http=info"
    } else {
        "biobase=info,tower_http=warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();
}

/// Opens the database, applies migrations and serves until the process ends
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SECURITY_JWT_SECRET is not set; logins will fail until it is configured");
    }

    let pool = DatabaseManager::connect_and_migrate(&config.database).await?;
    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(pool, config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Biobase listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
