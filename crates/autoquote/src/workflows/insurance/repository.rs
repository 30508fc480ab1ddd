use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, ApplicationPatch, ApplicationStatus, InsuranceApplication, Person, Vehicle,
    PRIMARY_APPLICANT_RELATIONSHIP,
};

/// Stored person row. The primary applicant's row carries the reserved relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub relationship: String,
}

impl PersonRecord {
    pub fn is_primary(&self) -> bool {
        self.relationship == PRIMARY_APPLICANT_RELATIONSHIP
    }
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            first_name: Some(person.first_name.clone()),
            last_name: Some(person.last_name.clone()),
            date_of_birth: Some(person.date_of_birth),
            relationship: person.relationship.clone(),
        }
    }
}

/// Repository record for a saved or submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip_code: Option<u32>,
    pub vehicles: Vec<Vehicle>,
    /// Primary applicant row first, then additional people in submission order.
    pub people: Vec<PersonRecord>,
}

impl ApplicationRecord {
    pub fn new(application_id: ApplicationId) -> Self {
        let mut record = Self {
            application_id,
            status: ApplicationStatus::Draft,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            address_street: None,
            address_city: None,
            address_state: None,
            address_zip_code: None,
            vehicles: Vec::new(),
            people: Vec::new(),
        };
        record.refresh_primary_row();
        record
    }

    pub fn from_patch(application_id: ApplicationId, patch: &ApplicationPatch) -> Self {
        let mut record = Self::new(application_id);
        record.apply_patch(patch);
        record
    }

    pub fn from_submission(application: &InsuranceApplication) -> Self {
        let mut record = Self::new(application.application_id);
        record.apply_submission(application);
        record
    }

    /// Overwrites present scalars; a present vehicle or people list replaces the stored set.
    pub fn apply_patch(&mut self, patch: &ApplicationPatch) {
        overwrite(&mut self.first_name, &patch.first_name);
        overwrite(&mut self.last_name, &patch.last_name);
        overwrite(&mut self.date_of_birth, &patch.date_of_birth);
        overwrite(&mut self.address_street, &patch.address_street);
        overwrite(&mut self.address_city, &patch.address_city);
        overwrite(&mut self.address_state, &patch.address_state);
        overwrite(&mut self.address_zip_code, &patch.address_zip_code);

        if let Some(vehicles) = &patch.vehicles {
            self.vehicles = vehicles.clone();
        }
        let additional: Vec<PersonRecord> = match &patch.people {
            Some(people) => people.iter().map(PersonRecord::from).collect(),
            None => self.additional_people().cloned().collect(),
        };
        self.people = additional;
        self.status = ApplicationStatus::Draft;
        self.refresh_primary_row();
    }

    /// Replaces every field with the submitted application.
    pub fn apply_submission(&mut self, application: &InsuranceApplication) {
        self.first_name = Some(application.first_name.clone());
        self.last_name = Some(application.last_name.clone());
        self.date_of_birth = Some(application.date_of_birth);
        self.address_street = Some(application.address_street.clone());
        self.address_city = Some(application.address_city.clone());
        self.address_state = Some(application.address_state.clone());
        self.address_zip_code = Some(application.address_zip_code);
        self.vehicles = application.vehicles.clone();
        self.people = application.people.iter().map(PersonRecord::from).collect();
        self.status = ApplicationStatus::Submitted;
        self.refresh_primary_row();
    }

    pub fn primary_applicant(&self) -> Option<&PersonRecord> {
        self.people.iter().find(|person| person.is_primary())
    }

    pub fn additional_people(&self) -> impl Iterator<Item = &PersonRecord> {
        self.people.iter().filter(|person| !person.is_primary())
    }

    /// Rebuilds the primary row from the top-level fields, keeping additional people.
    fn refresh_primary_row(&mut self) {
        let primary = PersonRecord {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            relationship: PRIMARY_APPLICANT_RELATIONSHIP.to_string(),
        };
        self.people.retain(|person| !person.is_primary());
        self.people.insert(0, primary);
    }
}

fn overwrite<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

/// Whether a submission created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Storage port. Each call is one atomic unit: a failed call leaves the stored state untouched.
pub trait ApplicationRepository: Send + Sync {
    fn insert_draft(
        &self,
        application_id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn update_draft(
        &self,
        application_id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn upsert_submission(
        &self,
        application: &InsuranceApplication,
    ) -> Result<UpsertOutcome, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local adapter. One mutex guards every operation, so a replaced vehicle or
/// people set is never observed half written.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl InMemoryApplicationRepository {
    pub fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert_draft(
        &self,
        application_id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application_id) {
            return Err(RepositoryError::Conflict);
        }
        let record = ApplicationRecord::from_patch(application_id, patch);
        guard.insert(application_id, record.clone());
        Ok(record)
    }

    fn update_draft(
        &self,
        application_id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .get_mut(&application_id)
            .ok_or(RepositoryError::NotFound)?;
        record.apply_patch(patch);
        Ok(record.clone())
    }

    fn upsert_submission(
        &self,
        application: &InsuranceApplication,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&application.application_id) {
            Some(record) => {
                record.apply_submission(application);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                guard.insert(
                    application.application_id,
                    ApplicationRecord::from_submission(application),
                );
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
