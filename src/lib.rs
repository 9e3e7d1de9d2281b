use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod handlers;
pub mod models;
pub mod store;

pub use config::AppConfig;

use store::PatientStore;

/// Shared application state: the injected store plus the global lock that
/// serializes load+mutate+save in the write handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PatientStore>,
    pub write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Info endpoints
        .route("/", get(handlers::root))
        .route("/about", get(handlers::about))
        // Record endpoints
        .route("/view", get(handlers::view))
        .route("/patients/:id", get(handlers::get_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:id", put(handlers::edit_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
