//! Error types for the hydration domain

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to normalize a free-form value into one of the closed domain types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown activity level: {0}")]
    ActivityLevel(String),

    #[error("Unknown climate: {0}")]
    Climate(String),

    #[error("Unknown lifestyle: {0}")]
    Lifestyle(String),

    #[error("Unknown gender: {0}")]
    Gender(String),

    #[error("Unknown special condition: {0}")]
    SpecialCondition(String),

    #[error("Unknown volume unit: {0}")]
    VolumeUnit(String),

    #[error("Invalid time of day '{0}', expected HH:MM")]
    TimeOfDay(String),

    #[error("Date {date} is outside the supported range")]
    DateOutOfRange { field: &'static str, date: NaiveDate },
}

impl ParseError {
    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ParseError::ActivityLevel(_) => "activity_level",
            ParseError::Climate(_) => "climate",
            ParseError::Lifestyle(_) => "lifestyle",
            ParseError::Gender(_) => "gender",
            ParseError::SpecialCondition(_) => "special_condition",
            ParseError::VolumeUnit(_) => "unit",
            ParseError::TimeOfDay(_) => "time",
            ParseError::DateOutOfRange { field, .. } => *field,
        }
    }
}
