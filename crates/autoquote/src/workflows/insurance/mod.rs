//! Auto-insurance application intake: draft decoding, layered validation, the form error
//! view, persistence, and the HTTP surface.

pub mod domain;
pub mod form;
pub mod quote;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationStatus, BirthDateInput,
    DateParts, InsuranceApplication, NumericInput, Person, PersonDraft, Vehicle, VehicleDraft,
    PRIMARY_APPLICANT_RELATIONSHIP,
};
pub use form::FormErrors;
pub use quote::{QuoteConfirmation, QuoteEstimator};
pub use repository::{
    ApplicationRecord, ApplicationRepository, InMemoryApplicationRepository, PersonRecord,
    RepositoryError, UpsertOutcome,
};
pub use router::application_router;
pub use service::{ApplicationServiceError, InsuranceApplicationService};
pub use validation::{
    ApplicationValidator, ErrorKind, ErrorScope, Field, PersonValidator, ValidationError,
    ValidationErrors, ValidationMode, ValidationPolicy, VehicleValidator,
};
