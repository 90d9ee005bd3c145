use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use std::sync::Arc;
use uuid::Uuid;

use patient_cell::PatientIdentity;
use scheduling_cell::models::{BookAppointmentRequest, BookingError, CancelAppointmentRequest};
use scheduling_cell::{AppointmentBookingService, AvailabilityService};
use shared_store::{AppointmentStatus, AppointmentType, Clinic, ClinicStore, Doctor, WeeklyHours};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_time(t(h, mi))
}

// 2025-06-23 is a Monday.
const MONDAY: fn() -> NaiveDate = || NaiveDate::from_ymd_opt(2025, 6, 23).unwrap();
const NOW: fn() -> NaiveDateTime = || at(2025, 6, 20, 12, 0);

async fn seeded_doctor(store: &Arc<ClinicStore>) -> Doctor {
    let mut weekly_hours = WeeklyHours::new();
    weekly_hours.set(Weekday::Mon, t(9, 0), t(12, 0)).unwrap();
    let clinic = Clinic {
        id: Uuid::new_v4(),
        name: "MediWell Care".to_string(),
        weekly_hours,
        appointment_duration: 30,
        advance_booking_days: 30,
        cancellation_notice_hours: 24,
        is_active: true,
        created_at: Utc::now(),
    };
    let doctor = Doctor {
        id: Uuid::new_v4(),
        clinic_id: clinic.id,
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        specialization: "General Medicine".to_string(),
        consultation_fee: 750.0,
        is_active: true,
        created_at: Utc::now(),
    };
    store.insert_clinic(clinic).await;
    store.insert_doctor(doctor.clone()).await.unwrap();
    doctor
}

fn request(doctor_id: Uuid, date: NaiveDate, start: NaiveTime, phone: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        appointment_type: AppointmentType::Consultation,
        date,
        start_time: start,
        reason: "persistent cough".to_string(),
        patient: PatientIdentity {
            first_name: "Ravi".to_string(),
            last_name: "Nair".to_string(),
            phone: phone.to_string(),
            email: None,
            date_of_birth: None,
            address: None,
        },
    }
}

#[tokio::test]
async fn overlapping_booking_rejected_adjacent_accepted() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let first = service
        .book(request(doctor.id, MONDAY(), t(10, 0), "+919876543210"), NOW())
        .await
        .unwrap();
    assert_eq!(first.status, AppointmentStatus::Scheduled);
    assert_eq!(first.consultation_fee, 750.0);
    assert_eq!(first.duration_minutes, Some(30));

    // 10:15 overlaps 10:00-10:30 even though it is off the half-hour grid.
    let overlap = service
        .book(request(doctor.id, MONDAY(), t(10, 15), "+918800112233"), NOW())
        .await;
    assert_matches!(overlap, Err(BookingError::SlotNoLongerAvailable));

    // 10:30 starts exactly when the first appointment ends.
    let adjacent = service
        .book(request(doctor.id, MONDAY(), t(10, 30), "+918800112233"), NOW())
        .await;
    assert!(adjacent.is_ok());
}

#[tokio::test]
async fn concurrent_bookings_for_the_same_slot_admit_exactly_one() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let (a, b) = tokio::join!(
        service.book(request(doctor.id, MONDAY(), t(10, 0), "+919876543210"), NOW()),
        service.book(request(doctor.id, MONDAY(), t(10, 0), "+918800112233"), NOW()),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let loser = if a.is_ok() { b } else { a };
    assert_matches!(loser, Err(BookingError::SlotNoLongerAvailable));

    assert_eq!(store.reserving_appointments(doctor.id, MONDAY()).await.len(), 1);
}

#[tokio::test]
async fn cancellation_frees_the_slot_for_rebooking() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let booked = service
        .book(request(doctor.id, MONDAY(), t(10, 0), "+919876543210"), NOW())
        .await
        .unwrap();

    let availability = AvailabilityService::new(store.clone());
    assert!(!availability
        .available_slots(doctor.id, MONDAY(), NOW())
        .await
        .unwrap()
        .contains(&t(10, 0)));

    let cancelled = service
        .cancel_appointment(booked.id, CancelAppointmentRequest::default(), NOW())
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    assert!(availability
        .available_slots(doctor.id, MONDAY(), NOW())
        .await
        .unwrap()
        .contains(&t(10, 0)));

    let rebooked = service
        .book(request(doctor.id, MONDAY(), t(10, 0), "+918800112233"), NOW())
        .await;
    assert!(rebooked.is_ok());
}

#[tokio::test]
async fn cancellation_inside_the_notice_period_is_rejected() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let booked = service
        .book(request(doctor.id, MONDAY(), t(10, 0), "+919876543210"), NOW())
        .await
        .unwrap();

    // Sunday 11:00 is within 24 hours of the Monday 10:00 start.
    let late = service
        .cancel_appointment(
            booked.id,
            CancelAppointmentRequest::default(),
            at(2025, 6, 22, 11, 0),
        )
        .await;
    assert_matches!(late, Err(BookingError::CancellationNoticeTooShort(24)));

    let twice = service
        .cancel_appointment(booked.id, CancelAppointmentRequest::default(), NOW())
        .await;
    assert!(twice.is_ok());
    let again = service
        .cancel_appointment(booked.id, CancelAppointmentRequest::default(), NOW())
        .await;
    assert_matches!(again, Err(BookingError::NotCancellable));
}

#[tokio::test]
async fn requests_outside_the_bookable_window_are_rejected() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    // Tuesday is closed.
    let closed = service
        .book(
            request(
                doctor.id,
                NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
                t(10, 0),
                "+919876543210",
            ),
            NOW(),
        )
        .await;
    assert_matches!(closed, Err(BookingError::OutsideBookingWindow));

    // Before opening.
    let early = service
        .book(request(doctor.id, MONDAY(), t(8, 0), "+919876543210"), NOW())
        .await;
    assert_matches!(early, Err(BookingError::OutsideBookingWindow));

    // 11:45 + 30 minutes runs past the 12:00 close.
    let overrun = service
        .book(request(doctor.id, MONDAY(), t(11, 45), "+919876543210"), NOW())
        .await;
    assert_matches!(overrun, Err(BookingError::OutsideBookingWindow));

    // Beyond the 30 day horizon.
    let far = service
        .book(
            request(
                doctor.id,
                NaiveDate::from_ymd_opt(2025, 7, 28).unwrap(),
                t(10, 0),
                "+919876543210",
            ),
            NOW(),
        )
        .await;
    assert_matches!(far, Err(BookingError::OutsideBookingWindow));
}

#[tokio::test]
async fn repeat_caller_is_matched_to_the_same_patient_record() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let first = service
        .book(request(doctor.id, MONDAY(), t(9, 0), "+919876543210"), NOW())
        .await
        .unwrap();
    let second = service
        .book(request(doctor.id, MONDAY(), t(11, 0), "+919876543210"), NOW())
        .await
        .unwrap();
    assert_eq!(first.patient_id, second.patient_id);
}

#[tokio::test]
async fn invalid_contact_details_fail_before_any_write() {
    let store = Arc::new(ClinicStore::new());
    let doctor = seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store.clone());

    let bad = service
        .book(request(doctor.id, MONDAY(), t(10, 0), "not-a-number"), NOW())
        .await;
    assert_matches!(bad, Err(BookingError::Validation(_)));

    assert!(store.reserving_appointments(doctor.id, MONDAY()).await.is_empty());
    assert!(store.patient_by_phone("not-a-number").await.is_none());
}

#[tokio::test]
async fn unknown_doctor_cannot_be_booked() {
    let store = Arc::new(ClinicStore::new());
    seeded_doctor(&store).await;
    let service = AppointmentBookingService::new(store);

    let result = service
        .book(request(Uuid::new_v4(), MONDAY(), t(10, 0), "+919876543210"), NOW())
        .await;
    assert_matches!(result, Err(BookingError::DoctorNotFound));
}
