use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::StoreError;

/// Weekly business hours, one optional open/close pair per weekday.
///
/// Stored as a single weekday-indexed table (Monday first) so lookups never
/// go through per-day field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyHours {
    days: [Option<OpenHours>; 7],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hours for one weekday. Rejects empty or inverted windows.
    pub fn set(
        &mut self,
        weekday: Weekday,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Result<(), StoreError> {
        if open >= close {
            return Err(StoreError::InvalidHours(format!(
                "open time {} must be before close time {}",
                open.format("%H:%M"),
                close.format("%H:%M"),
            )));
        }
        self.days[weekday.num_days_from_monday() as usize] = Some(OpenHours { open, close });
        Ok(())
    }

    /// Hours for a weekday; `None` means the clinic is closed that day.
    pub fn hours_for(&self, weekday: Weekday) -> Option<OpenHours> {
        self.days[weekday.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub weekly_hours: WeeklyHours,
    /// Default bookable slot length in minutes.
    pub appointment_duration: i32,
    /// How many days ahead of "now" bookings are accepted.
    pub advance_booking_days: i32,
    /// Minimum notice, in hours, for a cancellation to be accepted.
    pub cancellation_notice_hours: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub consultation_fee: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub appointment_type: AppointmentType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    /// Stored per appointment; clinic defaults may change later without
    /// retroactively resizing past bookings. Legacy rows may lack it.
    pub duration_minutes: Option<i32>,
    pub status: AppointmentStatus,
    pub reason: String,
    pub consultation_fee: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Start of the reserved interval, in the clinic's local time.
    pub fn scheduled_start(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.scheduled_time)
    }

    /// End of the reserved interval. A missing stored duration falls back to
    /// the caller-supplied minutes.
    pub fn scheduled_end_or(&self, fallback_minutes: i32) -> NaiveDateTime {
        let minutes = self.duration_minutes.unwrap_or(fallback_minutes);
        self.scheduled_start() + Duration::minutes(minutes as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    /// Whether an appointment in this status still reserves its interval.
    pub fn is_reserving(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled
                | AppointmentStatus::Confirmed
                | AppointmentStatus::InProgress
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
            AppointmentStatus::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    Emergency,
    Checkup,
    Procedure,
    Other,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::Consultation => write!(f, "consultation"),
            AppointmentType::FollowUp => write!(f, "follow_up"),
            AppointmentType::Emergency => write!(f, "emergency"),
            AppointmentType::Checkup => write!(f, "checkup"),
            AppointmentType::Procedure => write!(f, "procedure"),
            AppointmentType::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn weekly_hours_lookup_by_weekday() {
        let mut hours = WeeklyHours::new();
        hours.set(Weekday::Mon, time(9, 0), time(12, 0)).unwrap();

        let monday = hours.hours_for(Weekday::Mon).unwrap();
        assert_eq!(monday.open, time(9, 0));
        assert_eq!(monday.close, time(12, 0));
        assert!(hours.hours_for(Weekday::Tue).is_none());
    }

    #[test]
    fn weekly_hours_rejects_inverted_and_empty_windows() {
        let mut hours = WeeklyHours::new();
        assert!(matches!(
            hours.set(Weekday::Mon, time(12, 0), time(9, 0)),
            Err(StoreError::InvalidHours(_))
        ));
        assert!(matches!(
            hours.set(Weekday::Mon, time(9, 0), time(9, 0)),
            Err(StoreError::InvalidHours(_))
        ));
        assert!(hours.hours_for(Weekday::Mon).is_none());
    }

    #[test]
    fn reserving_statuses() {
        assert!(AppointmentStatus::Scheduled.is_reserving());
        assert!(AppointmentStatus::Confirmed.is_reserving());
        assert!(AppointmentStatus::InProgress.is_reserving());
        assert!(!AppointmentStatus::Completed.is_reserving());
        assert!(!AppointmentStatus::Cancelled.is_reserving());
        assert!(!AppointmentStatus::NoShow.is_reserving());
        assert!(!AppointmentStatus::Rescheduled.is_reserving());
    }
}
