use chrono::{Duration, NaiveDate, NaiveTime};

use shared_store::Appointment;

/// Whether a proposed interval overlaps any appointment in `existing`.
///
/// Intervals are half-open: an appointment ending 10:30 does not conflict
/// with one starting 10:30. Callers pass only appointments whose status
/// still reserves the slot. An appointment with no stored duration is
/// assumed to run as long as the proposed one.
pub fn has_conflict(
    existing: &[Appointment],
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: i32,
) -> bool {
    let proposed_start = date.and_time(start);
    let proposed_end = proposed_start + Duration::minutes(duration_minutes as i64);

    existing.iter().any(|appointment| {
        let other_start = appointment.scheduled_start();
        let other_end = appointment.scheduled_end_or(duration_minutes);
        proposed_start < other_end && proposed_end > other_start
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_store::{AppointmentStatus, AppointmentType};
    use uuid::Uuid;

    fn booked(time: NaiveTime, duration_minutes: Option<i32>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            clinic_id: Uuid::new_v4(),
            appointment_type: AppointmentType::Consultation,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 23).unwrap(),
            scheduled_time: time,
            duration_minutes,
            status: AppointmentStatus::Scheduled,
            reason: "checkup".to_string(),
            consultation_fee: 500.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            cancelled_at: None,
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    const DATE: fn() -> NaiveDate = || NaiveDate::from_ymd_opt(2025, 6, 23).unwrap();

    #[test]
    fn detects_partial_overlap() {
        let existing = vec![booked(t(10, 0), Some(30))];
        assert!(has_conflict(&existing, DATE(), t(10, 15), 30));
        assert!(has_conflict(&existing, DATE(), t(9, 45), 30));
    }

    #[test]
    fn exact_match_conflicts() {
        let existing = vec![booked(t(10, 0), Some(30))];
        assert!(has_conflict(&existing, DATE(), t(10, 0), 30));
    }

    #[test]
    fn adjacent_intervals_do_not_conflict() {
        let existing = vec![booked(t(10, 0), Some(30))];
        assert!(!has_conflict(&existing, DATE(), t(10, 30), 30));
        assert!(!has_conflict(&existing, DATE(), t(9, 30), 30));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let existing = vec![booked(t(10, 0), Some(60))];
        assert!(has_conflict(&existing, DATE(), t(10, 15), 30));

        let existing = vec![booked(t(10, 15), Some(15))];
        assert!(has_conflict(&existing, DATE(), t(10, 0), 60));
    }

    #[test]
    fn missing_duration_falls_back_to_proposed_duration() {
        let existing = vec![booked(t(10, 0), None)];
        assert!(has_conflict(&existing, DATE(), t(10, 15), 30));
        assert!(!has_conflict(&existing, DATE(), t(10, 30), 30));
        // With a longer proposed duration the untimed appointment also
        // stretches, so the 11:00 start clears a 10:00 + 60min hold.
        assert!(!has_conflict(&existing, DATE(), t(11, 0), 60));
        assert!(has_conflict(&existing, DATE(), t(10, 45), 60));
    }

    #[test]
    fn empty_schedule_never_conflicts() {
        assert!(!has_conflict(&[], DATE(), t(10, 0), 30));
    }
}
