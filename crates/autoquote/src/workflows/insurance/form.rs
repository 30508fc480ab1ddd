//! Field-keyed view of validation errors for the web form.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{ErrorScope, Field, ValidationError};

/// Row ordinals parsed out of message text past this bound are ignored rather than
/// allocating sparse rows. Structured errors carry real list positions and are never capped.
const MAX_CLASSIFIED_ROWS: usize = 64;

fn vehicle_message() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Vehicle (\d+): (.+)$").expect("vehicle regex is valid"))
}

fn applicant_message() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^Applicant (\d+): (.+)$").expect("applicant regex is valid"))
}

const PRIMARY_KEYWORDS: &[(&str, Field)] = &[
    ("applicationId", Field::ApplicationId),
    ("Primary Applicant first name", Field::FirstName),
    ("Primary Applicant last name", Field::LastName),
    ("Primary Applicant date of birth", Field::DateOfBirth),
    ("Primary applicant must be at least", Field::DateOfBirth),
    ("Primary Applicant street address", Field::AddressStreet),
    ("Primary Applicant city", Field::AddressCity),
    ("Primary Applicant state", Field::AddressState),
    ("Primary Applicant zip code", Field::AddressZipCode),
    ("vehicle", Field::Vehicles),
    ("VIN", Field::Vin),
    ("Year must be", Field::Year),
    ("Make and model", Field::MakeModel),
];

const APPLICANT_KEYWORDS: &[(&str, Field)] = &[
    ("First name", Field::FirstName),
    ("Last name", Field::LastName),
    ("Date of birth", Field::DateOfBirth),
    ("years old", Field::DateOfBirth),
    ("Relationship", Field::Relationship),
];

/// Errors bucketed the way the form renders them.
///
/// The first message for a field wins; vehicle rows keep every message in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    pub generic_errors: BTreeMap<String, String>,
    pub vehicle_errors: Vec<Vec<String>>,
    pub applicant_errors: Vec<BTreeMap<String, String>>,
}

impl FormErrors {
    /// Buckets structured errors by their scope and field.
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        let mut form = Self::default();
        for error in errors {
            let detail = error.detail();
            match error.scope {
                ErrorScope::Primary => form.push_generic(error.field, detail),
                ErrorScope::Vehicle(index) => form.push_vehicle(index, detail),
                ErrorScope::Person(index) => form.push_applicant(index, error.field, detail),
            }
        }
        form
    }

    /// Buckets rendered messages by their prefix and wording. Unrecognised messages are dropped.
    pub fn classify<S: AsRef<str>>(messages: &[S]) -> Self {
        let mut form = Self::default();
        for message in messages {
            let message = message.as_ref();

            if let Some(captures) = vehicle_message().captures(message) {
                if let Some((index, detail)) = row(&captures) {
                    form.push_vehicle(index, detail.to_string());
                }
            } else if let Some(captures) = applicant_message().captures(message) {
                if let Some((index, detail)) = row(&captures) {
                    if let Some(field) = keyword_field(APPLICANT_KEYWORDS, detail) {
                        form.push_applicant(index, field, detail.to_string());
                    }
                }
            } else if let Some(field) = keyword_field(PRIMARY_KEYWORDS, message) {
                form.push_generic(field, message.to_string());
            }
        }
        form
    }

    pub fn has_errors(&self) -> bool {
        !self.generic_errors.is_empty()
            || self.vehicle_errors.iter().any(|row| !row.is_empty())
            || self.applicant_errors.iter().any(|row| !row.is_empty())
    }

    fn push_generic(&mut self, field: Field, message: String) {
        self.generic_errors
            .entry(field.key().to_string())
            .or_insert(message);
    }

    fn push_vehicle(&mut self, index: usize, message: String) {
        if self.vehicle_errors.len() <= index {
            self.vehicle_errors.resize_with(index + 1, Vec::new);
        }
        self.vehicle_errors[index].push(message);
    }

    fn push_applicant(&mut self, index: usize, field: Field, message: String) {
        if self.applicant_errors.len() <= index {
            self.applicant_errors.resize_with(index + 1, BTreeMap::new);
        }
        self.applicant_errors[index]
            .entry(field.key().to_string())
            .or_insert(message);
    }
}

/// Zero-based row index and message body of a `"<Label> N: message"` match.
fn row<'a>(captures: &regex::Captures<'a>) -> Option<(usize, &'a str)> {
    let ordinal: usize = captures.get(1)?.as_str().parse().ok()?;
    let detail = captures.get(2)?.as_str();
    ordinal
        .checked_sub(1)
        .filter(|index| *index < MAX_CLASSIFIED_ROWS)
        .map(|index| (index, detail))
}

fn keyword_field(table: &[(&str, Field)], message: &str) -> Option<Field> {
    table
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, field)| *field)
}
