use std::fmt;

use serde::Serialize;

/// Which part of the application an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum ErrorScope {
    Primary,
    /// Zero-based position in the vehicle list.
    Vehicle(usize),
    /// Zero-based position in the additional-people list.
    Person(usize),
}

/// Form field an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ApplicationId,
    FirstName,
    LastName,
    DateOfBirth,
    AddressStreet,
    AddressCity,
    AddressState,
    AddressZipCode,
    Vehicles,
    Vin,
    Year,
    MakeModel,
    Relationship,
}

impl Field {
    /// Key used by the form UI for this field.
    pub const fn key(self) -> &'static str {
        match self {
            Field::ApplicationId => "applicationId",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::DateOfBirth => "dateOfBirth",
            Field::AddressStreet => "addressStreet",
            Field::AddressCity => "addressCity",
            Field::AddressState => "addressState",
            Field::AddressZipCode => "addressZipCode",
            Field::Vehicles => "vehicles",
            Field::Vin => "vin",
            Field::Year => "year",
            Field::MakeModel => "makeModel",
            Field::Relationship => "relationship",
        }
    }

    const fn primary_label(self) -> &'static str {
        match self {
            Field::ApplicationId => "applicationId",
            Field::FirstName => "Primary Applicant first name",
            Field::LastName => "Primary Applicant last name",
            Field::DateOfBirth => "Primary Applicant date of birth",
            Field::AddressStreet => "Primary Applicant street address",
            Field::AddressCity => "Primary Applicant city",
            Field::AddressState => "Primary Applicant state",
            Field::AddressZipCode => "Primary Applicant zip code",
            Field::Vehicles => "Vehicles",
            Field::Vin => "VIN",
            Field::Year => "Year",
            Field::MakeModel => "Make and model",
            Field::Relationship => "Relationship",
        }
    }

    const fn person_label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::DateOfBirth => "Date of birth",
            Field::Relationship => "Relationship",
            other => other.primary_label(),
        }
    }
}

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    InvalidFormat,
    WrongLength { expected: usize },
    OutOfRange { min: i32, max: i32 },
    TooFew { min: usize },
    TooMany { max: usize },
    BelowMinimumAge { years: u32 },
    Reserved,
}

/// A single field violation.
///
/// `Display` renders the message vocabulary consumed by the web form: vehicle errors are
/// prefixed `Vehicle N: ` and additional-person errors `Applicant N: ` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationError {
    pub scope: ErrorScope,
    pub field: Field,
    pub kind: ErrorKind,
}

impl ValidationError {
    pub const fn new(scope: ErrorScope, field: Field, kind: ErrorKind) -> Self {
        Self { scope, field, kind }
    }

    pub const fn primary(field: Field, kind: ErrorKind) -> Self {
        Self::new(ErrorScope::Primary, field, kind)
    }

    /// The message without its row prefix.
    pub fn detail(&self) -> String {
        match (self.scope, self.field) {
            (_, Field::Vin | Field::Year | Field::MakeModel) => self.vehicle_detail(),
            (ErrorScope::Person(_), _) => self.person_detail(),
            _ => self.primary_detail(),
        }
    }

    fn primary_detail(&self) -> String {
        let label = self.field.primary_label();
        match (self.field, self.kind) {
            (Field::ApplicationId, ErrorKind::InvalidFormat) => {
                "applicationId must be a valid UUID.".to_string()
            }
            (Field::DateOfBirth, ErrorKind::InvalidFormat) => {
                format!("{label} must be a valid date.")
            }
            (_, ErrorKind::BelowMinimumAge { years }) => {
                format!("Primary applicant must be at least {years} years old.")
            }
            (Field::Vehicles, ErrorKind::TooFew { min: 1 }) => {
                "At least one vehicle is required.".to_string()
            }
            (Field::Vehicles, ErrorKind::TooFew { min }) => {
                format!("At least {min} vehicles are required.")
            }
            (Field::Vehicles, ErrorKind::TooMany { max }) => {
                format!("A policy cannot have more than {max} vehicles.")
            }
            _ => generic_detail(label, self.kind),
        }
    }

    fn vehicle_detail(&self) -> String {
        let label = self.field.primary_label();
        match self.kind {
            ErrorKind::Required => format!("{label} must be a non-empty string."),
            ErrorKind::WrongLength { expected } => {
                format!("{label} must be exactly {expected} characters.")
            }
            ErrorKind::OutOfRange { min, max } => {
                format!("{label} must be between {min} and {max}.")
            }
            kind => generic_detail(label, kind),
        }
    }

    fn person_detail(&self) -> String {
        let label = self.field.person_label();
        match self.kind {
            ErrorKind::InvalidFormat if self.field == Field::DateOfBirth => {
                format!("{label} must be a valid date.")
            }
            ErrorKind::BelowMinimumAge { years } => {
                format!("Person must be at least {years} years old.")
            }
            kind => generic_detail(label, kind),
        }
    }
}

fn generic_detail(label: &str, kind: ErrorKind) -> String {
    match kind {
        ErrorKind::Required => format!("{label} is required."),
        ErrorKind::InvalidFormat => format!("{label} must be a valid number."),
        ErrorKind::WrongLength { expected } => {
            format!("{label} must be exactly {expected} characters.")
        }
        ErrorKind::OutOfRange { min, max } => format!("{label} must be between {min} and {max}."),
        ErrorKind::TooFew { min } => format!("{label} requires at least {min} entries."),
        ErrorKind::TooMany { max } => format!("{label} cannot have more than {max} entries."),
        ErrorKind::BelowMinimumAge { years } => format!("{label} must be at least {years} years old."),
        ErrorKind::Reserved => format!("{label} cannot be \"Primary Applicant\"."),
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            ErrorScope::Primary => {}
            ErrorScope::Vehicle(index) => write!(f, "Vehicle {}: ", index + 1)?,
            ErrorScope::Person(index) => write!(f, "Applicant {}: ", index + 1)?,
        }
        f.write_str(&self.detail())
    }
}

/// Ordered validation failures for one payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application failed validation with {} error(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
