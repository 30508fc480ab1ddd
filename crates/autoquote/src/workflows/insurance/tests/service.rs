use std::sync::Arc;

use super::common::*;

use crate::workflows::insurance::domain::{
    ApplicationDraft, ApplicationId, ApplicationStatus, NumericInput,
};
use crate::workflows::insurance::quote::QuoteEstimator;
use crate::workflows::insurance::repository::{
    ApplicationRepository, InMemoryApplicationRepository, RepositoryError,
};
use crate::workflows::insurance::service::{ApplicationServiceError, InsuranceApplicationService};
use crate::workflows::insurance::validation::ValidationPolicy;

fn id() -> ApplicationId {
    ApplicationId::parse(APPLICATION_ID).expect("valid id")
}

fn partial(city: &str) -> ApplicationDraft {
    ApplicationDraft {
        address_city: Some(city.to_string()),
        ..ApplicationDraft::with_id(APPLICATION_ID)
    }
}

#[test]
fn initialize_persists_draft_status() {
    let (service, repository) = build_service();
    let record = service.initialize(partial("Ames")).expect("draft stored");

    assert_eq!(record.application_id, id());
    assert_eq!(record.status, ApplicationStatus::Draft);
    let stored = repository
        .fetch(&id())
        .expect("fetch")
        .expect("record present");
    assert_eq!(stored.address_city.as_deref(), Some("Ames"));
}

#[test]
fn initialize_requires_identifier_before_validation() {
    let (service, _) = build_service();
    let mut draft = partial("Ames");
    draft.application_id = Some("   ".to_string());
    draft.address_zip_code = Some(NumericInput::from("bad"));

    match service.initialize(draft) {
        Err(ApplicationServiceError::MissingApplicationId) => {}
        other => panic!("expected missing id, got {other:?}"),
    }
}

#[test]
fn initialize_rejects_identifier_only_drafts() {
    let (service, repository) = build_service();
    match service.initialize(ApplicationDraft::with_id(APPLICATION_ID)) {
        Err(ApplicationServiceError::EmptyDraft) => {}
        other => panic!("expected empty draft, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn initialize_surfaces_validation_errors_without_storing() {
    let (service, repository) = build_service();
    let mut draft = partial("Ames");
    draft.address_zip_code = Some(NumericInput::from("ABCDE"));

    match service.initialize(draft) {
        Err(ApplicationServiceError::Validation(errors)) => {
            assert_eq!(
                errors.messages(),
                vec!["Primary Applicant zip code must be a valid number."]
            );
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn duplicate_initialize_conflicts() {
    let (service, _) = build_service();
    service.initialize(partial("Ames")).expect("first save");
    match service.initialize(partial("Ames")) {
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn update_uses_path_identifier_and_keeps_absent_lists() {
    let (service, _) = build_service();
    let mut first = partial("Ames");
    first.vehicles = Some(vec![honda()]);
    service.initialize(first).expect("draft stored");

    let mut body = partial("Iowa City");
    body.application_id = Some("11111111-1111-4111-8111-111111111111".to_string());
    let record = service.update(APPLICATION_ID, body).expect("update succeeds");

    assert_eq!(record.application_id, id());
    assert_eq!(record.address_city.as_deref(), Some("Iowa City"));
    assert_eq!(record.vehicles.len(), 1);
}

#[test]
fn update_of_unknown_application_is_not_found() {
    let (service, _) = build_service();
    match service.update(APPLICATION_ID, partial("Ames")) {
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn submit_returns_quote_and_marks_submitted() {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = InsuranceApplicationService::new(repository, QuoteEstimator::new(900, 901))
        .with_reference_date(today());

    let quote = service.submit(complete_draft()).expect("submission accepted");
    assert_eq!(quote.application_id, id());
    assert_eq!(quote.six_month_premium, 900);
    assert_eq!(
        quote.message,
        "Thank you for your application. Your auto insurance quote is $900 per every six months."
    );

    let stored = service.get(APPLICATION_ID).expect("stored");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
    assert_eq!(stored.people.len(), 2);
    assert!(stored.people[0].is_primary());
}

#[test]
fn resubmission_overwrites_previous_submission() {
    let (service, _) = build_service();
    service.submit(complete_draft()).expect("first submission");

    let mut revised = complete_draft();
    revised.people = Some(Vec::new());
    revised.address_city = Some("Cedar Rapids".to_string());
    service.submit(revised).expect("second submission");

    let stored = service.get(APPLICATION_ID).expect("stored");
    assert_eq!(stored.address_city.as_deref(), Some("Cedar Rapids"));
    assert_eq!(stored.additional_people().count(), 0);
}

#[test]
fn submit_applies_custom_policy() {
    let (service, _) = build_service();
    let service = service.with_policy(ValidationPolicy::new(40, 1985, 3, 17));

    match service.submit(complete_draft()) {
        Err(ApplicationServiceError::Validation(errors)) => {
            assert!(errors
                .messages()
                .contains(&"Primary applicant must be at least 40 years old.".to_string()));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn get_treats_malformed_identifier_as_missing() {
    let (service, _) = build_service();
    match service.get("not-a-uuid") {
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn repository_outage_is_reported_as_repository_error() {
    let service = unavailable_service();
    match service.submit(complete_draft()) {
        Err(ApplicationServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}
