// src/types/validation.rs
//! Record invariants checked before anything is stored or scored.

use chrono::{Months, NaiveDate};
use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EXPERIENCE_YEARS: i32 = 80;
pub const MAX_BIRTH_AGE_YEARS: u32 = 120;
pub const MAX_EXPERIENCE_MONTHS: i64 = MAX_EXPERIENCE_YEARS as i64 * 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("experience_years must be within 0..=80, got {0}")]
    ExperienceYears(i32),

    #[error("experience_months must be within 0..=11, got {0}")]
    ExperienceMonths(i32),

    #[error("birth_date {0} is in the future")]
    BirthDateInFuture(NaiveDate),

    #[error("birth_date {0} is more than 120 years ago")]
    BirthDateTooOld(NaiveDate),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be at most {max} months, got {value}")]
    ExperienceBound {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("min_exp_months ({min}) cannot be greater than max_exp_months ({max})")]
    ExperienceRange { min: i64, max: i64 },
}

pub(crate) fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

pub(crate) fn check_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

pub(crate) fn check_experience(years: i32, months: i32) -> Result<(), ValidationError> {
    if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
        return Err(ValidationError::ExperienceYears(years));
    }
    if !(0..=11).contains(&months) {
        return Err(ValidationError::ExperienceMonths(months));
    }
    Ok(())
}

/// Birth date must lie in `(today - 120 years, today]`.
pub(crate) fn check_birth_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date > today {
        return Err(ValidationError::BirthDateInFuture(date));
    }
    let oldest = today.checked_sub_months(Months::new(MAX_BIRTH_AGE_YEARS * 12));
    match oldest {
        Some(oldest) if date > oldest => Ok(()),
        _ => Err(ValidationError::BirthDateTooOld(date)),
    }
}

pub(crate) fn check_experience_range(
    min: Option<i64>,
    max: Option<i64>,
) -> Result<(), ValidationError> {
    for (field, value) in [("min_exp_months", min), ("max_exp_months", max)] {
        if let Some(value) = value {
            if value < 0 {
                return Err(ValidationError::Negative { field, value });
            }
            if value > MAX_EXPERIENCE_MONTHS {
                return Err(ValidationError::ExperienceBound {
                    field,
                    value,
                    max: MAX_EXPERIENCE_MONTHS,
                });
            }
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::ExperienceRange { min, max });
        }
    }
    Ok(())
}
