use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use shared_store::ClinicStore;

use crate::handlers;

/// Routes for clinic setup, availability lookups and appointment booking.
pub fn scheduling_routes(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/clinics", post(handlers::create_clinic))
        .route("/doctors", post(handlers::create_doctor))
        .route(
            "/doctors/{doctor_id}/slots",
            get(handlers::get_available_slots),
        )
        .route("/appointments", post(handlers::book_appointment))
        .route(
            "/appointments/{appointment_id}",
            get(handlers::get_appointment),
        )
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .with_state(store)
}
