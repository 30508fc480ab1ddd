use chrono::NaiveDate;

use super::super::domain::{Person, PersonDraft, PRIMARY_APPLICANT_RELATIONSHIP};
use super::error::{ErrorKind, ErrorScope, Field, ValidationError};
use super::policy::ValidationPolicy;
use super::rules::{self, ErrorSink, FieldCheck};
use super::ValidationMode;

/// Fields of a person that passed validation. Absent fields stay `None` in partial mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CheckedPerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub relationship: Option<String>,
}

impl CheckedPerson {
    pub(crate) fn into_person(self) -> Option<Person> {
        Some(Person {
            first_name: self.first_name?,
            last_name: self.last_name?,
            date_of_birth: self.date_of_birth?,
            relationship: self.relationship?,
        })
    }
}

/// Validates the primary applicant (no ordinal) or an additional household member.
#[derive(Debug, Clone)]
pub struct PersonValidator {
    policy: ValidationPolicy,
    today: NaiveDate,
    mode: ValidationMode,
}

impl PersonValidator {
    pub fn new(policy: ValidationPolicy, today: NaiveDate, mode: ValidationMode) -> Self {
        Self {
            policy,
            today,
            mode,
        }
    }

    /// Ordered errors for one person.
    ///
    /// With an ordinal the errors are scoped to that additional person and the
    /// relationship becomes mandatory; without one they describe the primary applicant.
    pub fn validate(&self, person: &PersonDraft, ordinal: Option<usize>) -> Vec<ValidationError> {
        self.check(person, ordinal).1
    }

    pub(crate) fn check(
        &self,
        person: &PersonDraft,
        ordinal: Option<usize>,
    ) -> (CheckedPerson, Vec<ValidationError>) {
        let scope = ordinal.map_or(ErrorScope::Primary, ErrorScope::Person);
        let mut sink = ErrorSink::new(scope, self.mode);

        let first_name = sink.check(
            Field::FirstName,
            rules::non_blank(person.first_name.as_deref()),
        );
        let last_name = sink.check(
            Field::LastName,
            rules::non_blank(person.last_name.as_deref()),
        );
        let date_of_birth = sink.check(
            Field::DateOfBirth,
            rules::birth_date(
                person.date_of_birth.as_ref(),
                self.today,
                self.policy.minimum_age_years(),
            ),
        );

        let relationship = match ordinal {
            Some(_) => sink.require(
                Field::Relationship,
                checked_relationship(person.relationship.as_deref()),
            ),
            None => Some(PRIMARY_APPLICANT_RELATIONSHIP.to_string()),
        };

        let checked = CheckedPerson {
            first_name,
            last_name,
            date_of_birth,
            relationship,
        };
        (checked, sink.into_errors())
    }
}

fn checked_relationship(value: Option<&str>) -> FieldCheck<String> {
    match rules::non_blank(value) {
        FieldCheck::Valid(text) if text.eq_ignore_ascii_case(PRIMARY_APPLICANT_RELATIONSHIP) => {
            FieldCheck::Invalid(ErrorKind::Reserved)
        }
        other => other,
    }
}
