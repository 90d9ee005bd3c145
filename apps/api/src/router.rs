use std::sync::Arc;

use axum::{routing::get, Router};

use scheduling_cell::scheduling_routes;
use shared_store::ClinicStore;

pub fn create_router(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/", get(|| async { "MediWell scheduling API is running!" }))
        .merge(scheduling_routes(store))
}
