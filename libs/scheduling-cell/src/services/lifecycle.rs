use chrono::{Duration, NaiveDateTime};

use shared_store::Appointment;

use crate::models::BookingError;

/// Check that an appointment may still be cancelled at `now`.
///
/// Only appointments that still hold their slot can be cancelled, and the
/// clinic's notice period must remain before the scheduled start.
pub fn validate_cancellation(
    appointment: &Appointment,
    notice_hours: i32,
    now: NaiveDateTime,
) -> Result<(), BookingError> {
    if !appointment.status.is_reserving() {
        return Err(BookingError::NotCancellable);
    }

    let deadline = appointment.scheduled_start() - Duration::hours(notice_hours as i64);
    if now > deadline {
        return Err(BookingError::CancellationNoticeTooShort(notice_hours));
    }

    Ok(())
}
