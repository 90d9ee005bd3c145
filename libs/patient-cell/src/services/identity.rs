use chrono::Utc;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{ClinicStore, Patient};

use crate::models::{PatientError, PatientIdentity};

#[derive(Clone)]
pub struct PatientIdentityService {
    store: Arc<ClinicStore>,
}

impl PatientIdentityService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    /// Validate the contact details supplied with a booking.
    pub fn validate(&self, identity: &PatientIdentity) -> Result<(), PatientError> {
        if identity.first_name.trim().is_empty() {
            return Err(PatientError::Validation(
                "First name is required".to_string(),
            ));
        }
        if identity.last_name.trim().is_empty() {
            return Err(PatientError::Validation(
                "Last name is required".to_string(),
            ));
        }

        let phone_regex =
            Regex::new(r"^\+?[1-9]\d{1,14}$|^\+?\d{1,4}[\s\-\.\(\)]*\d{1,14}$").unwrap();
        if !phone_regex.is_match(identity.phone.trim()) {
            return Err(PatientError::Validation(
                "Invalid phone number format".to_string(),
            ));
        }

        if let Some(email) = &identity.email {
            let email_regex =
                Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
            if !email_regex.is_match(email.trim()) {
                return Err(PatientError::Validation(
                    "Invalid email format".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Find the patient record these contact details belong to, creating one
    /// when no match exists. Phone is the primary identifier; email is the
    /// fallback for callers who booked with a different number before.
    pub async fn resolve_or_create(
        &self,
        identity: &PatientIdentity,
    ) -> Result<Patient, PatientError> {
        if let Some(existing) = self.store.patient_by_phone(identity.phone.trim()).await {
            debug!("Matched patient {} by phone", existing.id);
            return Ok(existing);
        }

        if let Some(email) = &identity.email {
            if let Some(existing) = self.store.patient_by_email(email.trim()).await {
                debug!("Matched patient {} by email", existing.id);
                return Ok(existing);
            }
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: identity.first_name.trim().to_string(),
            last_name: identity.last_name.trim().to_string(),
            phone: identity.phone.trim().to_string(),
            email: identity.email.as_ref().map(|e| e.trim().to_string()),
            date_of_birth: identity.date_of_birth,
            address: identity.address.clone(),
            created_at: Utc::now(),
        };

        info!(
            "Created patient record {} for {}",
            patient.id,
            patient.full_name()
        );
        self.store.insert_patient(patient.clone()).await;

        Ok(patient)
    }
}
