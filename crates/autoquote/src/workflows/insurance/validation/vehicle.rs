use chrono::NaiveDate;

use super::super::domain::{Vehicle, VehicleDraft};
use super::error::{ErrorScope, Field, ValidationError};
use super::policy::ValidationPolicy;
use super::rules::{self, ErrorSink};
use super::ValidationMode;

/// Validates one vehicle row. Every field is mandatory regardless of mode.
#[derive(Debug, Clone)]
pub struct VehicleValidator {
    policy: ValidationPolicy,
    today: NaiveDate,
}

impl VehicleValidator {
    pub fn new(policy: ValidationPolicy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    /// Ordered errors for a vehicle with no positional prefix.
    pub fn validate(&self, vehicle: &VehicleDraft) -> Vec<ValidationError> {
        self.check(vehicle, None).1
    }

    /// Errors scoped to `Vehicle(index)`, plus the typed vehicle when it passed.
    pub(crate) fn check(
        &self,
        vehicle: &VehicleDraft,
        index: Option<usize>,
    ) -> (Option<Vehicle>, Vec<ValidationError>) {
        let scope = index.map_or(ErrorScope::Primary, ErrorScope::Vehicle);
        let mut sink = ErrorSink::new(scope, ValidationMode::Complete);

        let vin = sink.check(
            Field::Vin,
            rules::vin(vehicle.vin.as_deref(), self.policy.vin_length()),
        );
        let year = sink.check(
            Field::Year,
            rules::model_year(
                vehicle.year.as_ref(),
                self.policy.minimum_vehicle_year(),
                self.policy.maximum_vehicle_year(self.today),
            ),
        );
        let make_model = sink.check(
            Field::MakeModel,
            rules::non_blank(vehicle.make_model.as_deref()),
        );

        let typed = match (vin, year, make_model) {
            (Some(vin), Some(year), Some(make_model)) => Some(Vehicle {
                vin,
                year,
                make_model,
            }),
            _ => None,
        };
        (typed, sink.into_errors())
    }
}
