pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::BookingError;
pub use router::scheduling_routes;
pub use services::booking::AppointmentBookingService;
pub use services::slots::AvailabilityService;
