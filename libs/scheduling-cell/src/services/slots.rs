use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_store::{Clinic, ClinicStore};

use crate::models::BookingError;
use crate::services::conflict::has_conflict;

/// Same-day bookings must start at least this many minutes from now.
pub const TODAY_CUTOFF_BUFFER_MINUTES: i64 = 5;

/// Every slot the clinic's schedule offers on `date`, before any bookings
/// are taken into account. Pure in `now`, so the same inputs always produce
/// the same grid.
///
/// Slots start at opening time and step forward by the clinic's appointment
/// duration; a slot is kept only if it ends by closing time. For today,
/// slots starting before `now` plus a short buffer are dropped.
pub fn candidate_slots(clinic: &Clinic, date: NaiveDate, now: NaiveDateTime) -> Vec<NaiveTime> {
    if clinic.appointment_duration <= 0 {
        return Vec::new();
    }

    let last_bookable = now.date() + Duration::days(clinic.advance_booking_days as i64);
    if date < now.date() || date > last_bookable {
        return Vec::new();
    }

    let hours = match clinic.weekly_hours.hours_for(date.weekday()) {
        Some(hours) => hours,
        None => return Vec::new(),
    };

    let step = Duration::minutes(clinic.appointment_duration as i64);
    let close = date.and_time(hours.close);
    let earliest = now + Duration::minutes(TODAY_CUTOFF_BUFFER_MINUTES);

    let mut cursor = date.and_time(hours.open);
    if date == now.date() {
        while cursor < earliest {
            cursor += step;
        }
    }

    let mut slots = Vec::new();
    while cursor + step <= close {
        slots.push(cursor.time());
        cursor += step;
    }
    slots
}

/// Whether a requested start falls inside the bookable window: within the
/// advance-booking horizon, inside that weekday's open hours with room for
/// a full appointment, and not in the past. The start does not have to sit
/// on the slot grid; off-grid requests are settled by the conflict check.
pub fn eligible_start(
    clinic: &Clinic,
    date: NaiveDate,
    start: NaiveTime,
    now: NaiveDateTime,
) -> bool {
    if clinic.appointment_duration <= 0 {
        return false;
    }

    let last_bookable = now.date() + Duration::days(clinic.advance_booking_days as i64);
    if date < now.date() || date > last_bookable {
        return false;
    }

    let hours = match clinic.weekly_hours.hours_for(date.weekday()) {
        Some(hours) => hours,
        None => return false,
    };

    let start_at = date.and_time(start);
    let end_at = start_at + Duration::minutes(clinic.appointment_duration as i64);
    if start < hours.open || end_at > date.and_time(hours.close) {
        return false;
    }

    if date == now.date() && start_at < now + Duration::minutes(TODAY_CUTOFF_BUFFER_MINUTES) {
        return false;
    }

    true
}

/// Computes which of a doctor's slots are still open on a given date.
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<ClinicStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    /// Candidate slots for the doctor's clinic on `date`, minus any that
    /// overlap an appointment still holding its interval.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>, BookingError> {
        let doctor = self.store.doctor(doctor_id).await?;
        if !doctor.is_active {
            return Err(BookingError::DoctorNotFound);
        }
        let clinic = self.store.clinic(doctor.clinic_id).await?;
        if !clinic.is_active {
            return Err(BookingError::ClinicNotFound);
        }

        let booked = self.store.reserving_appointments(doctor_id, date).await;
        let slots: Vec<NaiveTime> = candidate_slots(&clinic, date, now)
            .into_iter()
            .filter(|slot| !has_conflict(&booked, date, *slot, clinic.appointment_duration))
            .collect();

        debug!(
            "Doctor {} has {} open slots on {} ({} booked)",
            doctor_id,
            slots.len(),
            date,
            booked.len()
        );
        Ok(slots)
    }
}
