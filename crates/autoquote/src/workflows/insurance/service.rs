use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use super::domain::{ApplicationDraft, ApplicationId};
use super::quote::{QuoteConfirmation, QuoteEstimator};
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use super::validation::{ApplicationValidator, ValidationErrors, ValidationPolicy};

/// Service composing validation, persistence, and the placeholder quote.
pub struct InsuranceApplicationService<R> {
    repository: Arc<R>,
    quotes: QuoteEstimator,
    policy: ValidationPolicy,
    reference_date: Option<NaiveDate>,
}

impl<R> InsuranceApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, quotes: QuoteEstimator) -> Self {
        Self {
            repository,
            quotes,
            policy: ValidationPolicy::default(),
            reference_date: None,
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pins "today" for age and model-year rules instead of reading the local clock.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self
    }

    fn validator(&self) -> ApplicationValidator {
        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        ApplicationValidator::with_policy(self.policy.clone(), today)
    }

    /// Creates a saved draft. The draft must carry an id and at least one other field.
    pub fn initialize(
        &self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        if draft
            .application_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
        {
            return Err(ApplicationServiceError::MissingApplicationId);
        }

        let patch = self
            .validator()
            .validate_partial_patch(&draft)
            .map_err(|errors| self.rejected("initialize", errors))?;
        if !draft.has_content() {
            return Err(ApplicationServiceError::EmptyDraft);
        }
        let application_id = patch
            .application_id
            .ok_or(ApplicationServiceError::MissingApplicationId)?;

        let record = self
            .repository
            .insert_draft(application_id, &patch)
            .map_err(|err| self.failed("initialize", err))?;
        info!(
            %application_id,
            status = record.status.label(),
            "application draft initialized"
        );
        Ok(record)
    }

    /// Saves a partial update. The path identifier overrides any id in the body.
    pub fn update(
        &self,
        application_id: &str,
        mut draft: ApplicationDraft,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        draft.application_id = Some(application_id.to_string());

        let patch = self
            .validator()
            .validate_partial_patch(&draft)
            .map_err(|errors| self.rejected("update", errors))?;
        let application_id = patch
            .application_id
            .ok_or(ApplicationServiceError::MissingApplicationId)?;

        let record = self
            .repository
            .update_draft(application_id, &patch)
            .map_err(|err| self.failed("update", err))?;
        info!(
            %application_id,
            status = record.status.label(),
            vehicles = record.vehicles.len(),
            "application draft updated"
        );
        Ok(record)
    }

    /// Validates the full application, stores it, and returns the quote.
    pub fn submit(
        &self,
        draft: ApplicationDraft,
    ) -> Result<QuoteConfirmation, ApplicationServiceError> {
        let application = self
            .validator()
            .validate_complete_application(&draft)
            .map_err(|errors| self.rejected("submit", errors))?;

        let outcome = self
            .repository
            .upsert_submission(&application)
            .map_err(|err| self.failed("submit", err))?;

        let quote = self.quotes.estimate(application.application_id);
        info!(
            application_id = %application.application_id,
            ?outcome,
            premium = quote.six_month_premium,
            "application submitted"
        );
        Ok(quote)
    }

    /// Fetches a stored application. Malformed identifiers are reported as not found.
    pub fn get(&self, application_id: &str) -> Result<ApplicationRecord, ApplicationServiceError> {
        let id = ApplicationId::parse(application_id).ok_or(RepositoryError::NotFound)?;
        let record = self
            .repository
            .fetch(&id)
            .map_err(|err| self.failed("get", err))?
            .ok_or(RepositoryError::NotFound)?;
        debug!(%id, status = record.status.label(), "application fetched");
        Ok(record)
    }

    fn rejected(
        &self,
        operation: &'static str,
        errors: ValidationErrors,
    ) -> ApplicationServiceError {
        warn!(
            operation,
            error_count = errors.len(),
            "application rejected by validation"
        );
        ApplicationServiceError::Validation(errors)
    }

    fn failed(&self, operation: &'static str, err: RepositoryError) -> ApplicationServiceError {
        match err {
            RepositoryError::Unavailable(_) => {
                error!(operation, error = %err, "repository failure");
            }
            _ => warn!(operation, error = %err, "repository rejected request"),
        }
        ApplicationServiceError::Repository(err)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("applicationId is required.")]
    MissingApplicationId,
    #[error("No valid fields provided for initialization.")]
    EmptyDraft,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
