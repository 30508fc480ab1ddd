use autoquote::error::AppError;
use autoquote::workflows::insurance::{
    ApplicationDraft, ApplicationServiceError, ApplicationValidator, FormErrors, ValidationErrors,
    ValidationMode,
};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Application JSON document in the shape the form submits
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Which rule set to apply
    #[arg(long, value_enum, default_value_t = ModeArg::Partial)]
    pub(crate) mode: ModeArg,
    /// Reference date for age and model-year rules (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    /// Saved draft: absent fields are allowed
    Partial,
    /// Final submission: every mandatory field is required
    Complete,
}

impl From<ModeArg> for ValidationMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Partial => ValidationMode::Partial,
            ModeArg::Complete => ValidationMode::Complete,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidationReport {
    pub(crate) mode: &'static str,
    pub(crate) today: NaiveDate,
    pub(crate) errors: Vec<String>,
    pub(crate) field_errors: FormErrors,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs { file, mode, today } = args;

    let raw = std::fs::read_to_string(&file)?;
    let draft: ApplicationDraft = serde_json::from_str(&raw)?;
    let validator = today.map_or_else(ApplicationValidator::for_today, ApplicationValidator::new);
    debug!(file = %file.display(), today = %validator.today(), "validating application document");

    let (report, errors) = build_report(&validator, &draft, mode.into());
    render_report(&report)?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApplicationServiceError::Validation(errors).into())
    }
}

pub(crate) fn build_report(
    validator: &ApplicationValidator,
    draft: &ApplicationDraft,
    mode: ValidationMode,
) -> (ValidationReport, ValidationErrors) {
    let errors = ValidationErrors::new(validator.validate(draft, mode));
    let report = ValidationReport {
        mode: mode.label(),
        today: validator.today(),
        errors: errors.messages(),
        field_errors: FormErrors::from_errors(errors.as_slice()),
    };
    (report, errors)
}

fn render_report(report: &ValidationReport) -> Result<(), AppError> {
    println!(
        "Validated application in {} mode as of {}",
        report.mode, report.today
    );
    if report.errors.is_empty() {
        println!("No validation errors.");
        return Ok(());
    }

    println!("\n{} validation error(s):", report.errors.len());
    for message in &report.errors {
        println!("  - {message}");
    }
    println!(
        "\nField errors:\n{}",
        serde_json::to_string_pretty(&report.field_errors)?
    );
    Ok(())
}
