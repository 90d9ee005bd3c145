use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use patient_cell::{PatientError, PatientIdentity};
use shared_store::{AppointmentType, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayHoursInput {
    pub day: DayOfWeek,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClinicRequest {
    pub name: String,
    pub weekly_hours: Vec<DayHoursInput>,
    pub appointment_duration: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub cancellation_notice_hours: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub clinic_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub consultation_fee: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub reason: String,
    #[serde(flatten)]
    pub patient: PatientIdentity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Clinic not found")]
    ClinicNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Requested time is outside the bookable window")]
    OutsideBookingWindow,

    #[error("This time slot is no longer available")]
    SlotNoLongerAvailable,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cancellation requires at least {0} hours notice")]
    CancellationNoticeTooShort(i32),

    #[error("Appointment can no longer be cancelled")]
    NotCancellable,
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::DoctorNotFound
            | BookingError::ClinicNotFound
            | BookingError::AppointmentNotFound => "not_found",
            BookingError::OutsideBookingWindow => "outside_booking_window",
            BookingError::SlotNoLongerAvailable => "slot_no_longer_available",
            BookingError::Validation(_) => "validation_error",
            BookingError::CancellationNoticeTooShort(_) => "cancellation_notice_too_short",
            BookingError::NotCancellable => "not_cancellable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BookingError::DoctorNotFound
            | BookingError::ClinicNotFound
            | BookingError::AppointmentNotFound => StatusCode::NOT_FOUND,
            BookingError::SlotNoLongerAvailable => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ClinicNotFound => BookingError::ClinicNotFound,
            StoreError::DoctorNotFound => BookingError::DoctorNotFound,
            StoreError::AppointmentNotFound => BookingError::AppointmentNotFound,
            StoreError::InvalidHours(msg) => BookingError::Validation(msg),
        }
    }
}

impl From<PatientError> for BookingError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(msg) => BookingError::Validation(msg),
        }
    }
}
