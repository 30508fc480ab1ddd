//! Per-field rules shared by every validator and both validation modes.

use chrono::NaiveDate;

use super::super::domain::{ApplicationId, BirthDateInput, NumericInput};
use super::age::is_at_least;
use super::error::{ErrorKind, ErrorScope, Field, ValidationError};
use super::ValidationMode;

/// Outcome of a single field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldCheck<T> {
    Absent,
    Valid(T),
    Invalid(ErrorKind),
}

pub(crate) fn non_blank(value: Option<&str>) -> FieldCheck<String> {
    match value {
        None => FieldCheck::Absent,
        Some(text) if text.trim().is_empty() => FieldCheck::Invalid(ErrorKind::Required),
        Some(text) => FieldCheck::Valid(text.trim().to_string()),
    }
}

pub(crate) fn application_id(value: Option<&str>) -> FieldCheck<ApplicationId> {
    match value {
        None => FieldCheck::Absent,
        Some(raw) if raw.trim().is_empty() => FieldCheck::Invalid(ErrorKind::Required),
        Some(raw) => ApplicationId::parse(raw)
            .map(FieldCheck::Valid)
            .unwrap_or(FieldCheck::Invalid(ErrorKind::InvalidFormat)),
    }
}

/// Missing and undecodable dates take precedence over the age check.
pub(crate) fn birth_date(
    value: Option<&BirthDateInput>,
    today: NaiveDate,
    minimum_age_years: u32,
) -> FieldCheck<NaiveDate> {
    let Some(input) = value else {
        return FieldCheck::Absent;
    };
    if input.is_blank() {
        return FieldCheck::Invalid(ErrorKind::Required);
    }
    match input.to_date() {
        None => FieldCheck::Invalid(ErrorKind::InvalidFormat),
        Some(date) if !is_at_least(date, today, minimum_age_years) => {
            FieldCheck::Invalid(ErrorKind::BelowMinimumAge {
                years: minimum_age_years,
            })
        }
        Some(date) => FieldCheck::Valid(date),
    }
}

/// Largest accepted zip code: nine digits, a ZIP+4 written without the hyphen.
const MAX_ZIP_CODE: u32 = 999_999_999;

/// Zip codes are digits only and strictly positive. Longer digit runs are out of range.
pub(crate) fn zip_code(value: Option<&NumericInput>) -> FieldCheck<u32> {
    let Some(input) = value else {
        return FieldCheck::Absent;
    };
    if input.is_blank() {
        return FieldCheck::Invalid(ErrorKind::Required);
    }
    let Some(digits) = input.as_digits() else {
        return FieldCheck::Invalid(ErrorKind::InvalidFormat);
    };
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return FieldCheck::Invalid(ErrorKind::InvalidFormat);
    }
    match significant.parse::<u32>() {
        Ok(zip) if zip <= MAX_ZIP_CODE => FieldCheck::Valid(zip),
        _ => FieldCheck::Invalid(ErrorKind::OutOfRange {
            min: 1,
            max: MAX_ZIP_CODE as i32,
        }),
    }
}

/// VIN length is counted in characters after trimming surrounding whitespace.
pub(crate) fn vin(value: Option<&str>, expected: usize) -> FieldCheck<String> {
    match non_blank(value) {
        FieldCheck::Valid(vin) if vin.chars().count() != expected => {
            FieldCheck::Invalid(ErrorKind::WrongLength { expected })
        }
        other => other,
    }
}

/// A missing or non-numeric year is reported as out of range.
pub(crate) fn model_year(value: Option<&NumericInput>, min: i32, max: i32) -> FieldCheck<i32> {
    value
        .and_then(NumericInput::as_integer)
        .and_then(|year| i32::try_from(year).ok())
        .filter(|year| (min..=max).contains(year))
        .map(FieldCheck::Valid)
        .unwrap_or(FieldCheck::Invalid(ErrorKind::OutOfRange { min, max }))
}

/// Collects errors for one scope, applying the mode's handling of absent fields.
pub(crate) struct ErrorSink {
    scope: ErrorScope,
    mode: ValidationMode,
    errors: Vec<ValidationError>,
}

impl ErrorSink {
    pub(crate) fn new(scope: ErrorScope, mode: ValidationMode) -> Self {
        Self {
            scope,
            mode,
            errors: Vec::new(),
        }
    }

    /// Records the outcome; absent fields are only an error in complete mode.
    pub(crate) fn check<T>(&mut self, field: Field, check: FieldCheck<T>) -> Option<T> {
        match check {
            FieldCheck::Absent => {
                if self.mode == ValidationMode::Complete {
                    self.push(field, ErrorKind::Required);
                }
                None
            }
            FieldCheck::Valid(value) => Some(value),
            FieldCheck::Invalid(kind) => {
                self.push(field, kind);
                None
            }
        }
    }

    /// Records the outcome; absent fields are an error in every mode.
    pub(crate) fn require<T>(&mut self, field: Field, check: FieldCheck<T>) -> Option<T> {
        match check {
            FieldCheck::Absent => {
                self.push(field, ErrorKind::Required);
                None
            }
            other => self.check(field, other),
        }
    }

    pub(crate) fn push(&mut self, field: Field, kind: ErrorKind) {
        self.errors
            .push(ValidationError::new(self.scope, field, kind));
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
