use chrono::{Datelike, NaiveDate};

use super::age::MINIMUM_APPLICANT_AGE;

pub const DEFAULT_MINIMUM_VEHICLE_YEAR: i32 = 1985;
pub const DEFAULT_MAX_VEHICLES: usize = 3;
pub const DEFAULT_VIN_LENGTH: usize = 17;

/// Underwriting dials applied by the validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    minimum_age_years: u32,
    minimum_vehicle_year: i32,
    max_vehicles: usize,
    vin_length: usize,
}

impl ValidationPolicy {
    /// Builds a policy; zero vehicle caps and VIN lengths fall back to the defaults.
    pub fn new(
        minimum_age_years: u32,
        minimum_vehicle_year: i32,
        max_vehicles: usize,
        vin_length: usize,
    ) -> Self {
        Self {
            minimum_age_years,
            minimum_vehicle_year,
            max_vehicles: if max_vehicles == 0 {
                DEFAULT_MAX_VEHICLES
            } else {
                max_vehicles
            },
            vin_length: if vin_length == 0 {
                DEFAULT_VIN_LENGTH
            } else {
                vin_length
            },
        }
    }

    pub fn minimum_age_years(&self) -> u32 {
        self.minimum_age_years
    }

    pub fn minimum_vehicle_year(&self) -> i32 {
        self.minimum_vehicle_year
    }

    /// Newest accepted model year, one past the reference year.
    pub fn maximum_vehicle_year(&self, today: NaiveDate) -> i32 {
        today.year() + 1
    }

    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    pub fn vin_length(&self) -> usize {
        self.vin_length
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(
            MINIMUM_APPLICANT_AGE,
            DEFAULT_MINIMUM_VEHICLE_YEAR,
            DEFAULT_MAX_VEHICLES,
            DEFAULT_VIN_LENGTH,
        )
    }
}
