//! Layered validation for insurance application drafts.
//!
//! A single [`ApplicationValidator`] serves both the lenient "save for later" flow and the
//! strict final submission; the [`ValidationMode`] only decides whether an absent field is
//! an error. Present fields always run the same rule.

pub mod age;
mod error;
mod person;
mod policy;
mod rules;
mod vehicle;

use chrono::{Local, NaiveDate};
use tracing::debug;

pub use age::{age_in_years, is_at_least, is_at_least_16_years_old, MINIMUM_APPLICANT_AGE};
pub use error::{ErrorKind, ErrorScope, Field, ValidationError, ValidationErrors};
pub use person::PersonValidator;
pub use policy::ValidationPolicy;
pub use vehicle::VehicleValidator;

use super::domain::{
    ApplicationDraft, ApplicationPatch, InsuranceApplication, Person, Vehicle,
};
use rules::ErrorSink;

/// Whether absent fields are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Saved drafts: only `applicationId` and the fields that are present are checked.
    #[default]
    Partial,
    /// Final submission: every mandatory field must be present.
    Complete,
}

impl ValidationMode {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationMode::Partial => "partial",
            ValidationMode::Complete => "complete",
        }
    }
}

/// Validates whole application drafts against a fixed reference date.
#[derive(Debug, Clone)]
pub struct ApplicationValidator {
    policy: ValidationPolicy,
    today: NaiveDate,
}

impl ApplicationValidator {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_policy(ValidationPolicy::default(), today)
    }

    pub fn with_policy(policy: ValidationPolicy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    /// Validator pinned to the local calendar date.
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate(&self, draft: &ApplicationDraft, mode: ValidationMode) -> Vec<ValidationError> {
        self.run(draft, mode).0
    }

    pub fn validate_partial(&self, draft: &ApplicationDraft) -> Vec<ValidationError> {
        self.validate(draft, ValidationMode::Partial)
    }

    pub fn validate_complete(&self, draft: &ApplicationDraft) -> Vec<ValidationError> {
        self.validate(draft, ValidationMode::Complete)
    }

    /// Validates a saved draft and returns the fields that are present, typed.
    pub fn validate_partial_patch(
        &self,
        draft: &ApplicationDraft,
    ) -> Result<ApplicationPatch, ValidationErrors> {
        let (errors, patch) = self.run(draft, ValidationMode::Partial);
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ValidationErrors::new(errors))
        }
    }

    /// Validates a final submission into a typed application.
    pub fn validate_complete_application(
        &self,
        draft: &ApplicationDraft,
    ) -> Result<InsuranceApplication, ValidationErrors> {
        let (errors, patch) = self.run(draft, ValidationMode::Complete);
        match patch.into_complete() {
            Some(application) if errors.is_empty() => Ok(application),
            _ => Err(ValidationErrors::new(errors)),
        }
    }

    fn run(
        &self,
        draft: &ApplicationDraft,
        mode: ValidationMode,
    ) -> (Vec<ValidationError>, ApplicationPatch) {
        let mut sink = ErrorSink::new(ErrorScope::Primary, mode);
        let mut patch = ApplicationPatch {
            application_id: sink.require(
                Field::ApplicationId,
                rules::application_id(draft.application_id.as_deref()),
            ),
            ..ApplicationPatch::default()
        };

        let primary = PersonValidator::new(self.policy.clone(), self.today, mode);
        let (applicant, applicant_errors) = primary.check(&draft.primary_applicant(), None);
        sink.extend(applicant_errors);
        patch.first_name = applicant.first_name;
        patch.last_name = applicant.last_name;
        patch.date_of_birth = applicant.date_of_birth;

        patch.address_street = sink.check(
            Field::AddressStreet,
            rules::non_blank(draft.address_street.as_deref()),
        );
        patch.address_city = sink.check(
            Field::AddressCity,
            rules::non_blank(draft.address_city.as_deref()),
        );
        patch.address_state = sink.check(
            Field::AddressState,
            rules::non_blank(draft.address_state.as_deref()),
        );
        patch.address_zip_code = sink.check(
            Field::AddressZipCode,
            rules::zip_code(draft.address_zip_code.as_ref()),
        );

        patch.vehicles = self.check_vehicles(draft, mode, &mut sink);
        patch.people = self.check_people(draft, &mut sink);

        let errors = sink.into_errors();
        debug!(
            mode = mode.label(),
            error_count = errors.len(),
            "application draft validated"
        );
        (errors, patch)
    }

    fn check_vehicles(
        &self,
        draft: &ApplicationDraft,
        mode: ValidationMode,
        sink: &mut ErrorSink,
    ) -> Option<Vec<Vehicle>> {
        let Some(vehicles) = draft.vehicles.as_deref() else {
            if mode == ValidationMode::Complete {
                sink.push(Field::Vehicles, ErrorKind::TooFew { min: 1 });
            }
            return None;
        };
        if vehicles.is_empty() {
            if mode == ValidationMode::Complete {
                sink.push(Field::Vehicles, ErrorKind::TooFew { min: 1 });
                return None;
            }
            return Some(Vec::new());
        }
        if vehicles.len() > self.policy.max_vehicles() {
            sink.push(
                Field::Vehicles,
                ErrorKind::TooMany {
                    max: self.policy.max_vehicles(),
                },
            );
            return None;
        }

        let validator = VehicleValidator::new(self.policy.clone(), self.today);
        let mut typed = Vec::with_capacity(vehicles.len());
        for (index, vehicle) in vehicles.iter().enumerate() {
            let (checked, errors) = validator.check(vehicle, Some(index));
            sink.extend(errors);
            typed.extend(checked);
        }
        (typed.len() == vehicles.len()).then_some(typed)
    }

    fn check_people(
        &self,
        draft: &ApplicationDraft,
        sink: &mut ErrorSink,
    ) -> Option<Vec<Person>> {
        let people = draft.people.as_deref()?;
        let validator =
            PersonValidator::new(self.policy.clone(), self.today, ValidationMode::Complete);
        let mut typed = Vec::with_capacity(people.len());
        for (ordinal, person) in people.iter().enumerate() {
            let (checked, errors) = validator.check(person, Some(ordinal));
            sink.extend(errors);
            typed.extend(checked.into_person());
        }
        (typed.len() == people.len()).then_some(typed)
    }
}
