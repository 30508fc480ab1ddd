use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Relationship recorded on the primary applicant's stored person row.
pub const PRIMARY_APPLICANT_RELATIONSHIP: &str = "Primary Applicant";

const HYPHENATED_UUID_LEN: usize = 36;

/// Identifier wrapper for insurance applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    /// Parses the hyphenated `8-4-4-4-12` form generated by the web client.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != HYPHENATED_UUID_LEN {
            return None;
        }
        Uuid::parse_str(raw).ok().map(Self)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Numeric form input that may arrive as a JSON number or as text.
///
/// Decoding never fails; values that cannot be read as a number surface later as
/// validation errors instead of rejected requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericInput {
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(text) if text.trim().is_empty())
    }

    /// Integer reading used for vehicle years.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumericInput::Integer(value) => Some(*value),
            NumericInput::Decimal(value) => integral(*value),
            NumericInput::Text(text) => text.trim().parse().ok(),
            NumericInput::Other(_) => None,
        }
    }

    /// Strict digits-only reading used for zip codes: no sign, no fraction, no padding.
    pub fn as_digits(&self) -> Option<String> {
        match self {
            NumericInput::Integer(value) if *value >= 0 => Some(value.to_string()),
            NumericInput::Decimal(value) => integral(*value)
                .filter(|value| *value >= 0)
                .map(|value| value.to_string()),
            NumericInput::Text(text)
                if !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit()) =>
            {
                Some(text.clone())
            }
            _ => None,
        }
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Integer(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Date-of-birth selector output: `{ "month": "January", "date": "9", "year": "1990" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateParts {
    pub month: NumericInput,
    pub date: NumericInput,
    pub year: NumericInput,
}

/// Birth date as submitted by the form, either as text or as selector parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BirthDateInput {
    Text(String),
    Parts(DateParts),
    Other(serde_json::Value),
}

impl BirthDateInput {
    pub fn is_blank(&self) -> bool {
        matches!(self, BirthDateInput::Text(text) if text.trim().is_empty())
    }

    /// Resolves the input to a calendar date, or `None` when it is not a real date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            BirthDateInput::Text(text) => parse_date_text(text.trim()),
            BirthDateInput::Parts(parts) => {
                let year = i32::try_from(parts.year.as_integer()?).ok()?;
                let month = month_number(&parts.month)?;
                let day = u32::try_from(parts.date.as_integer()?).ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            BirthDateInput::Other(_) => None,
        }
    }
}

impl From<NaiveDate> for BirthDateInput {
    fn from(value: NaiveDate) -> Self {
        BirthDateInput::Text(value.format("%Y-%m-%d").to_string())
    }
}

impl From<&str> for BirthDateInput {
    fn from(value: &str) -> Self {
        BirthDateInput::Text(value.to_string())
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_number(input: &NumericInput) -> Option<u32> {
    if let NumericInput::Text(text) = input {
        let lowered = text.trim().to_ascii_lowercase();
        if lowered.len() >= 3 {
            if let Some(position) = MONTH_NAMES
                .iter()
                .position(|name| name.starts_with(lowered.as_str()))
            {
                return u32::try_from(position + 1).ok();
            }
        }
    }

    input
        .as_integer()
        .and_then(|value| u32::try_from(value).ok())
        .filter(|month| (1..=12).contains(month))
}

/// Application payload as sent by the multi-step form.
///
/// Every field is optional so a saved draft can distinguish "not provided yet" from
/// "provided but blank". JSON `null` counts as not provided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<BirthDateInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_zip_code: Option<NumericInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<Vec<VehicleDraft>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<PersonDraft>>,
}

impl ApplicationDraft {
    /// An empty draft carrying only the given identifier.
    pub fn with_id(application_id: impl Into<String>) -> Self {
        Self {
            application_id: Some(application_id.into()),
            ..Self::default()
        }
    }

    /// The primary applicant's fields viewed as a person.
    pub fn primary_applicant(&self) -> PersonDraft {
        PersonDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            relationship: Some(PRIMARY_APPLICANT_RELATIONSHIP.to_string()),
        }
    }

    /// Whether anything besides the identifier was provided.
    pub fn has_content(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.date_of_birth.is_some()
            || self.address_street.is_some()
            || self.address_city.is_some()
            || self.address_state.is_some()
            || self.address_zip_code.is_some()
            || self.vehicles.as_ref().is_some_and(|list| !list.is_empty())
            || self.people.as_ref().is_some_and(|list| !list.is_empty())
    }
}

/// Additional household member as sent by the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<BirthDateInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// Vehicle row as sent by the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<NumericInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make_model: Option<String>,
}

/// A validated vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vin: String,
    pub year: i32,
    pub make_model: String,
}

/// A validated additional household member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub relationship: String,
}

/// Fields of a draft that passed partial validation; absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub application_id: Option<ApplicationId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip_code: Option<u32>,
    pub vehicles: Option<Vec<Vehicle>>,
    pub people: Option<Vec<Person>>,
}

impl ApplicationPatch {
    /// Promotes the patch to a full application when every mandatory field is present.
    pub fn into_complete(self) -> Option<InsuranceApplication> {
        let vehicles = self.vehicles.filter(|list| !list.is_empty())?;
        Some(InsuranceApplication {
            application_id: self.application_id?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            date_of_birth: self.date_of_birth?,
            address_street: self.address_street?,
            address_city: self.address_city?,
            address_state: self.address_state?,
            address_zip_code: self.address_zip_code?,
            vehicles,
            people: self.people.unwrap_or_default(),
        })
    }
}

/// A fully validated application, ready for final submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceApplication {
    pub application_id: ApplicationId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip_code: u32,
    pub vehicles: Vec<Vehicle>,
    pub people: Vec<Person>,
}

/// Lifecycle status tracked for stored applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
        }
    }
}
