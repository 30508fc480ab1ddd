use chrono::{Datelike, NaiveDate};

pub const MINIMUM_APPLICANT_AGE: u32 = 16;

/// Whole years elapsed between `birth_date` and `today`.
///
/// The birthday counts as reached once today's month/day is on or after the birth
/// month/day, so a Feb 29 birthday is reached on Mar 1 in common years. Returns a
/// negative value for birth dates in the future.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn is_at_least(birth_date: NaiveDate, today: NaiveDate, minimum_years: u32) -> bool {
    i64::from(age_in_years(birth_date, today)) >= i64::from(minimum_years)
}

pub fn is_at_least_16_years_old(birth_date: NaiveDate, today: NaiveDate) -> bool {
    is_at_least(birth_date, today, MINIMUM_APPLICANT_AGE)
}
