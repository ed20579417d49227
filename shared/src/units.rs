//! Volume unit handling
//!
//! All intake amounts and goals are stored in milliliters. Ounces only exist
//! at the display boundary.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliliters per US fluid ounce
pub const ML_PER_OZ: f64 = 29.5735;

/// Preferred display unit for fluid volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    #[default]
    Ml,
    Oz,
}

impl VolumeUnit {
    /// Convert a whole-milliliter value into this unit, rounded to an integer
    pub fn from_ml_rounded(&self, ml: i64) -> i64 {
        match self {
            VolumeUnit::Ml => ml,
            VolumeUnit::Oz => (ml as f64 / ML_PER_OZ).round() as i64,
        }
    }

    /// Convert a value in this unit to whole milliliters
    pub fn to_ml(&self, value: f64) -> i64 {
        match self {
            VolumeUnit::Ml => value.round() as i64,
            VolumeUnit::Oz => (value * ML_PER_OZ).round() as i64,
        }
    }

    /// Display amount: whole ml, or ounces with one decimal
    pub fn display_amount(&self, ml: i64) -> f64 {
        match self {
            VolumeUnit::Ml => ml as f64,
            VolumeUnit::Oz => ((ml as f64 / ML_PER_OZ) * 10.0).round() / 10.0,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            VolumeUnit::Ml => "ml",
            VolumeUnit::Oz => "oz",
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for VolumeUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Ok(VolumeUnit::Ml),
            "oz" | "fl oz" | "ounce" | "ounces" => Ok(VolumeUnit::Oz),
            _ => Err(ParseError::VolumeUnit(s.to_string())),
        }
    }
}
