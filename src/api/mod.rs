mod handlers;
mod page;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::flash::FlashSigner;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub flash: FlashSigner,
}

impl AppState {
    pub fn new(db: Database, secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            db,
            flash: FlashSigner::new(secret_key),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_notes))
        .route("/add", post(handlers::add_note))
        .route("/edit/{id}", post(handlers::edit_note))
        .route("/delete/{id}", post(handlers::delete_note))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
