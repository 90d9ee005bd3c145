use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact details a caller supplies when booking. Matched against existing
/// patient records by phone first, then email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientIdentity {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum PatientError {
    #[error("Validation error: {0}")]
    Validation(String),
}
