pub mod models;
pub mod services;

pub use models::{PatientError, PatientIdentity};
pub use services::identity::PatientIdentityService;
