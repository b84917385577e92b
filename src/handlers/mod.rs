pub mod search;

use axum::{
    routing::{get, get_service, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tera::Tera;
use time::Duration;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::features::view::ViewRegistry;
use search::search as view;

pub fn router(
    views: Arc<ViewRegistry>,
    templates: Arc<Tera>,
    static_dir: &str,
    session_idle_days: i64,
) -> Router {
    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(session_idle_days)))
        .with_secure(false);

    // JSON mirror of the page actions
    let api_router = Router::new()
        .route("/state", get(view::state_api))
        .route("/search", post(view::search_api))
        .route("/items/{id}", put(view::toggle_api));

    Router::new()
        .route("/", get(view::search_page))
        .route("/search", post(view::submit_search))
        .route("/items/{id}/toggle", post(view::submit_toggle))
        .route("/close", post(view::close_view))
        .nest("/api", api_router)
        .nest_service("/static", get_service(ServeDir::new(static_dir)))
        .with_state(views)
        .layer(Extension(templates))
        .layer(session_layer)
}
