pub mod memory;
pub mod records;

pub use memory::ClinicStore;
pub use records::{
    Appointment, AppointmentStatus, AppointmentType, Clinic, Doctor, OpenHours, Patient,
    WeeklyHours,
};

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Clinic not found")]
    ClinicNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Invalid clinic hours: {0}")]
    InvalidHours(String),
}
