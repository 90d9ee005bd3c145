use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use shared_store::{Clinic, ClinicStore, Doctor, WeeklyHours};

use crate::models::{
    BookAppointmentRequest, BookingError, CancelAppointmentRequest, CreateClinicRequest,
    CreateDoctorRequest, SlotQuery,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::slots::AvailabilityService;

pub async fn create_clinic(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<CreateClinicRequest>,
) -> Result<impl IntoResponse, BookingError> {
    if request.name.trim().is_empty() {
        return Err(BookingError::Validation("Clinic name is required".to_string()));
    }
    if request.weekly_hours.is_empty() {
        return Err(BookingError::Validation(
            "At least one day of opening hours is required".to_string(),
        ));
    }

    let mut weekly_hours = WeeklyHours::new();
    for entry in &request.weekly_hours {
        weekly_hours.set(entry.day.into(), entry.open, entry.close)?;
    }

    let clinic = Clinic {
        id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
        weekly_hours,
        appointment_duration: request.appointment_duration.unwrap_or(30),
        advance_booking_days: request.advance_booking_days.unwrap_or(30),
        cancellation_notice_hours: request.cancellation_notice_hours.unwrap_or(24),
        is_active: true,
        created_at: Utc::now(),
    };
    if clinic.appointment_duration <= 0 {
        return Err(BookingError::Validation(
            "Appointment duration must be positive".to_string(),
        ));
    }
    if clinic.advance_booking_days <= 0 {
        return Err(BookingError::Validation(
            "Advance booking days must be positive".to_string(),
        ));
    }
    if clinic.cancellation_notice_hours <= 0 {
        return Err(BookingError::Validation(
            "Cancellation notice hours must be positive".to_string(),
        ));
    }

    info!("Registered clinic {} ({})", clinic.name, clinic.id);
    store.insert_clinic(clinic.clone()).await;

    Ok((StatusCode::CREATED, Json(clinic)))
}

pub async fn create_doctor(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<impl IntoResponse, BookingError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(BookingError::Validation("Doctor name is required".to_string()));
    }

    let doctor = Doctor {
        id: Uuid::new_v4(),
        clinic_id: request.clinic_id,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        specialization: request.specialization.trim().to_string(),
        consultation_fee: request.consultation_fee,
        is_active: true,
        created_at: Utc::now(),
    };
    store.insert_doctor(doctor.clone()).await?;

    info!("Registered {} ({})", doctor.full_name(), doctor.id);
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn get_available_slots(
    State(store): State<Arc<ClinicStore>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<impl IntoResponse, BookingError> {
    let now = Local::now().naive_local();

    // An unparseable date means no slots, not an error.
    let date = match &query.date {
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(date) => date,
            Err(_) => {
                return Ok(Json(json!({
                    "doctor_id": doctor_id,
                    "date": raw,
                    "slots": Vec::<String>::new(),
                })))
            }
        },
        None => now.date(),
    };

    let service = AvailabilityService::new(store);
    let slots = service.available_slots(doctor_id, date, now).await?;

    let formatted: Vec<String> = slots
        .iter()
        .map(|slot| slot.format("%H:%M").to_string())
        .collect();

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": date,
        "slots": formatted,
    })))
}

pub async fn book_appointment(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let now = Local::now().naive_local();

    let service = AppointmentBookingService::new(store);
    let appointment = service.book(request, now).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn get_appointment(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<impl IntoResponse, BookingError> {
    let service = AppointmentBookingService::new(store);
    let appointment = service.get_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
    request: Option<Json<CancelAppointmentRequest>>,
) -> Result<impl IntoResponse, BookingError> {
    let now = Local::now().naive_local();
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let service = AppointmentBookingService::new(store);
    let appointment = service.cancel_appointment(appointment_id, request, now).await?;

    Ok(Json(appointment))
}
