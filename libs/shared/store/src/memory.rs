use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::records::{Appointment, AppointmentStatus, Clinic, Doctor, Patient};
use crate::StoreError;

#[derive(Default)]
struct Tables {
    clinics: HashMap<Uuid, Clinic>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
    appointments: HashMap<Uuid, Appointment>,
}

/// In-process store for clinics, doctors, patients and appointments.
///
/// Besides the tables it hands out one booking lock per doctor; the booking
/// service holds that lock across its conflict re-check and the appointment
/// insert so two concurrent bookings for the same doctor serialize.
pub struct ClinicStore {
    tables: RwLock<Tables>,
    booking_locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            booking_locks: StdMutex::new(HashMap::new()),
        }
    }

    // ----- clinics -----

    pub async fn insert_clinic(&self, clinic: Clinic) {
        debug!("Storing clinic {} ({})", clinic.name, clinic.id);
        self.tables.write().await.clinics.insert(clinic.id, clinic);
    }

    pub async fn clinic(&self, clinic_id: Uuid) -> Result<Clinic, StoreError> {
        self.tables
            .read()
            .await
            .clinics
            .get(&clinic_id)
            .cloned()
            .ok_or(StoreError::ClinicNotFound)
    }

    // ----- doctors -----

    pub async fn insert_doctor(&self, doctor: Doctor) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.clinics.contains_key(&doctor.clinic_id) {
            return Err(StoreError::ClinicNotFound);
        }
        debug!("Storing doctor {} ({})", doctor.full_name(), doctor.id);
        tables.doctors.insert(doctor.id, doctor);
        Ok(())
    }

    pub async fn doctor(&self, doctor_id: Uuid) -> Result<Doctor, StoreError> {
        self.tables
            .read()
            .await
            .doctors
            .get(&doctor_id)
            .cloned()
            .ok_or(StoreError::DoctorNotFound)
    }

    // ----- patients -----

    pub async fn insert_patient(&self, patient: Patient) {
        debug!("Storing patient record {}", patient.id);
        self.tables
            .write()
            .await
            .patients
            .insert(patient.id, patient);
    }

    pub async fn patient_by_phone(&self, phone: &str) -> Option<Patient> {
        self.tables
            .read()
            .await
            .patients
            .values()
            .find(|p| p.phone == phone)
            .cloned()
    }

    pub async fn patient_by_email(&self, email: &str) -> Option<Patient> {
        self.tables
            .read()
            .await
            .patients
            .values()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned()
    }

    // ----- appointments -----

    pub async fn insert_appointment(&self, appointment: Appointment) {
        debug!(
            "Storing appointment {} for doctor {} on {} at {}",
            appointment.id,
            appointment.doctor_id,
            appointment.scheduled_date,
            appointment.scheduled_time.format("%H:%M"),
        );
        self.tables
            .write()
            .await
            .appointments
            .insert(appointment.id, appointment);
    }

    pub async fn appointment(&self, appointment_id: Uuid) -> Result<Appointment, StoreError> {
        self.tables
            .read()
            .await
            .appointments
            .get(&appointment_id)
            .cloned()
            .ok_or(StoreError::AppointmentNotFound)
    }

    /// A doctor's appointments on `date` whose current status still reserves
    /// its interval, ordered by start time. Always reads live rows so a
    /// cancellation frees its slot immediately.
    pub async fn reserving_appointments(&self, doctor_id: Uuid, date: NaiveDate) -> Vec<Appointment> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id && a.scheduled_date == date && a.status.is_reserving()
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.scheduled_time);
        appointments
    }

    pub async fn set_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        let appointment = tables
            .appointments
            .get_mut(&appointment_id)
            .ok_or(StoreError::AppointmentNotFound)?;

        if status == AppointmentStatus::Cancelled {
            appointment.cancelled_at = Some(now);
        }
        appointment.status = status;
        appointment.updated_at = now;

        Ok(appointment.clone())
    }

    // ----- booking locks -----

    /// Lock guarding bookings for one doctor. The same `Arc` is returned for
    /// repeated calls with the same doctor id.
    pub fn booking_lock(&self, doctor_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .booking_locks
            .lock()
            .expect("booking lock registry poisoned");
        Arc::clone(locks.entry(doctor_id).or_default())
    }
}

impl Default for ClinicStore {
    fn default() -> Self {
        Self::new()
    }
}
