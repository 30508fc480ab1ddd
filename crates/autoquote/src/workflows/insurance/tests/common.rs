use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::workflows::insurance::domain::{
    ApplicationDraft, ApplicationId, ApplicationPatch, BirthDateInput, InsuranceApplication,
    NumericInput, PersonDraft, VehicleDraft,
};
use crate::workflows::insurance::quote::QuoteEstimator;
use crate::workflows::insurance::repository::{
    ApplicationRecord, ApplicationRepository, InMemoryApplicationRepository, RepositoryError,
    UpsertOutcome,
};
use crate::workflows::insurance::validation::ApplicationValidator;
use crate::workflows::insurance::{application_router, InsuranceApplicationService};

pub(super) const APPLICATION_ID: &str = "88c68625-31cb-4a30-b7c4-04ce02c52001";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn validator() -> ApplicationValidator {
    ApplicationValidator::new(today())
}

pub(super) fn honda() -> VehicleDraft {
    VehicleDraft {
        vin: Some("1HGCM82633A123456".to_string()),
        year: Some(NumericInput::from(2020)),
        make_model: Some("Honda Accord".to_string()),
    }
}

pub(super) fn spouse() -> PersonDraft {
    PersonDraft {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        date_of_birth: Some(BirthDateInput::from("1985-12-09")),
        relationship: Some("Spouse".to_string()),
    }
}

pub(super) fn complete_draft() -> ApplicationDraft {
    ApplicationDraft {
        application_id: Some(APPLICATION_ID.to_string()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        date_of_birth: Some(BirthDateInput::from("1990-01-09")),
        address_street: Some("1 Main St".to_string()),
        address_city: Some("Des Moines".to_string()),
        address_state: Some("IA".to_string()),
        address_zip_code: Some(NumericInput::from(50309)),
        vehicles: Some(vec![honda()]),
        people: Some(vec![spouse()]),
    }
}

/// The same application as the form posts it, with a selector-style birth date.
pub(super) fn complete_payload() -> Value {
    json!({
        "applicationId": APPLICATION_ID,
        "firstName": "Ada",
        "lastName": "Lovelace",
        "dateOfBirth": { "month": "January", "date": "9", "year": "1990" },
        "addressStreet": "1 Main St",
        "addressCity": "Des Moines",
        "addressState": "IA",
        "addressZipCode": "50309",
        "vehicles": [
            { "vin": "1HGCM82633A123456", "year": "2020", "makeModel": "Honda Accord" }
        ],
        "people": [
            {
                "firstName": "Grace",
                "lastName": "Hopper",
                "dateOfBirth": "1985-12-09T00:00:00.000Z",
                "relationship": "Spouse"
            }
        ]
    })
}

pub(super) fn build_service() -> (
    InsuranceApplicationService<InMemoryApplicationRepository>,
    Arc<InMemoryApplicationRepository>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = InsuranceApplicationService::new(repository.clone(), QuoteEstimator::default())
        .with_reference_date(today());
    (service, repository)
}

pub(super) fn router_with_service<R>(service: InsuranceApplicationService<R>) -> axum::Router
where
    R: ApplicationRepository + 'static,
{
    application_router(Arc::new(service))
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert_draft(
        &self,
        _application_id: ApplicationId,
        _patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_draft(
        &self,
        _application_id: ApplicationId,
        _patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn upsert_submission(
        &self,
        _application: &InsuranceApplication,
    ) -> Result<UpsertOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert_draft(
        &self,
        _application_id: ApplicationId,
        _patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_draft(
        &self,
        _application_id: ApplicationId,
        _patch: &ApplicationPatch,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_submission(
        &self,
        _application: &InsuranceApplication,
    ) -> Result<UpsertOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn unavailable_service() -> InsuranceApplicationService<UnavailableRepository> {
    InsuranceApplicationService::new(Arc::new(UnavailableRepository), QuoteEstimator::default())
        .with_reference_date(today())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn messages(errors: &[crate::workflows::insurance::ValidationError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}
