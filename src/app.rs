use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{companies, health, jobs, session};
use crate::middleware::{authenticate_jwt, ensure_admin, ensure_logged_in};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health::get))
        // Any valid token
        .route(
            "/auth/whoami",
            get(session::whoami).route_layer(middleware::from_fn(ensure_logged_in)),
        )
        .merge(company_routes())
        .merge(job_routes())
        .layer(middleware::from_fn(authenticate_jwt))
        .layer(CorsLayer::permissive());

    if crate::config::config().api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Restrict a method router to admins.
fn admin(methods: MethodRouter<AppState>) -> MethodRouter<AppState> {
    methods.route_layer(middleware::from_fn(ensure_admin))
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(admin(post(companies::create))),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(admin(
                axum::routing::patch(companies::update).delete(companies::remove),
            )),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).merge(admin(post(jobs::create))))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(admin(axum::routing::patch(jobs::update).delete(jobs::remove))),
        )
}

async fn root() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "companies": "/companies[/:handle] (list/get public, writes admin)",
                "jobs": "/jobs[/:id] (list/get public, writes admin)",
                "whoami": "/auth/whoami (logged in)",
                "health": "/health (public)",
            }
        }
    }))
}
