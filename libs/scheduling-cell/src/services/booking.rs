use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use patient_cell::PatientIdentityService;
use shared_store::{Appointment, AppointmentStatus, ClinicStore};

use crate::models::{BookAppointmentRequest, BookingError, CancelAppointmentRequest};
use crate::services::conflict::has_conflict;
use crate::services::lifecycle::validate_cancellation;
use crate::services::slots::eligible_start;

/// Books and cancels appointments against the shared store.
#[derive(Clone)]
pub struct AppointmentBookingService {
    store: Arc<ClinicStore>,
    identity: PatientIdentityService,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        let identity = PatientIdentityService::new(store.clone());
        Self { store, identity }
    }

    /// Book an appointment at the requested start time.
    ///
    /// The conflict check runs while holding the doctor's booking lock, so
    /// two concurrent requests for the same interval cannot both succeed;
    /// the loser sees the winner's row and gets `SlotNoLongerAvailable`.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        let doctor = self.store.doctor(request.doctor_id).await?;
        if !doctor.is_active {
            return Err(BookingError::DoctorNotFound);
        }
        let clinic = self.store.clinic(doctor.clinic_id).await?;
        if !clinic.is_active {
            return Err(BookingError::ClinicNotFound);
        }

        if !eligible_start(&clinic, request.date, request.start_time, now) {
            return Err(BookingError::OutsideBookingWindow);
        }

        self.identity.validate(&request.patient)?;

        let lock = self.store.booking_lock(doctor.id);
        let _guard = lock.lock().await;

        let booked = self
            .store
            .reserving_appointments(doctor.id, request.date)
            .await;
        if has_conflict(
            &booked,
            request.date,
            request.start_time,
            clinic.appointment_duration,
        ) {
            warn!(
                "Booking for doctor {} at {} {} lost to an existing appointment",
                doctor.id,
                request.date,
                request.start_time.format("%H:%M")
            );
            return Err(BookingError::SlotNoLongerAvailable);
        }

        let patient = self.identity.resolve_or_create(&request.patient).await?;

        let created_at = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            clinic_id: clinic.id,
            appointment_type: request.appointment_type,
            scheduled_date: request.date,
            scheduled_time: request.start_time,
            duration_minutes: Some(clinic.appointment_duration),
            status: AppointmentStatus::Scheduled,
            reason: request.reason,
            consultation_fee: doctor.consultation_fee,
            created_at,
            updated_at: created_at,
            cancelled_at: None,
        };
        self.store.insert_appointment(appointment.clone()).await;

        info!(
            "Booked appointment {} with {} on {} at {}",
            appointment.id,
            doctor.full_name(),
            appointment.scheduled_date,
            appointment.scheduled_time.format("%H:%M")
        );
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        Ok(self.store.appointment(appointment_id).await?)
    }

    /// Cancel an appointment, enforcing the clinic's notice period. The
    /// freed interval becomes bookable again immediately.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        request: CancelAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        let appointment = self.store.appointment(appointment_id).await?;
        let clinic = self.store.clinic(appointment.clinic_id).await?;

        validate_cancellation(&appointment, clinic.cancellation_notice_hours, now)?;

        let cancelled = self
            .store
            .set_appointment_status(appointment_id, AppointmentStatus::Cancelled, Utc::now())
            .await?;

        info!(
            "Cancelled appointment {} ({})",
            appointment_id,
            request.reason.as_deref().unwrap_or("no reason given")
        );
        Ok(cancelled)
    }
}
