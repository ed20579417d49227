//! User profile model and the closed enums that feed the goal calculator
//!
//! Every enum parses from trimmed, case-insensitive text and accepts the
//! synonyms the mobile client has historically sent. Unknown input is an
//! error; nothing falls back silently.

use crate::errors::ParseError;
use crate::goal::calculate_goal_ml;
use crate::units::VolumeUnit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Enums
// ============================================================================

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Extra daily intake in ml
    pub fn intake_bonus_ml(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 0.0,
            ActivityLevel::Light => 300.0,
            ActivityLevel::Moderate => 600.0,
            ActivityLevel::Active => 900.0,
            ActivityLevel::VeryActive => 1200.0,
        }
    }

    /// Whether reminders should use the high-activity tone
    pub fn is_high(&self) -> bool {
        matches!(self, ActivityLevel::Active | ActivityLevel::VeryActive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "sedentary" | "low" | "none" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately active" | "medium" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very active" | "veryactive" | "high" | "extra active" => Ok(ActivityLevel::VeryActive),
            _ => Err(ParseError::ActivityLevel(s.to_string())),
        }
    }
}

/// Climate the user lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Cold,
    Moderate,
    Hot,
}

impl Climate {
    pub fn intake_bonus_ml(&self) -> f64 {
        match self {
            Climate::Cold => 100.0,
            Climate::Moderate => 250.0,
            Climate::Hot => 500.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Climate::Cold => "cold",
            Climate::Moderate => "moderate",
            Climate::Hot => "hot",
        }
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Climate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "cold" | "cool" => Ok(Climate::Cold),
            "moderate" | "temperate" | "mild" => Ok(Climate::Moderate),
            "hot" | "warm" | "tropical" => Ok(Climate::Hot),
            _ => Err(ParseError::Climate(s.to_string())),
        }
    }
}

/// Lifestyle modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lifestyle {
    #[default]
    Standard,
    Athlete,
    OfficeWorker,
    OutdoorWorker,
    Senior,
}

impl Lifestyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifestyle::Standard => "standard",
            Lifestyle::Athlete => "athlete",
            Lifestyle::OfficeWorker => "office_worker",
            Lifestyle::OutdoorWorker => "outdoor_worker",
            Lifestyle::Senior => "senior",
        }
    }
}

impl fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifestyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "standard" | "normal" | "default" | "" => Ok(Lifestyle::Standard),
            "athlete" => Ok(Lifestyle::Athlete),
            "office worker" | "office" => Ok(Lifestyle::OfficeWorker),
            "outdoor worker" | "outdoor" => Ok(Lifestyle::OutdoorWorker),
            "senior" | "elderly" => Ok(Lifestyle::Senior),
            _ => Err(ParseError::Lifestyle(s.to_string())),
        }
    }
}

/// Gender, only used for the goal's physiological adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" | "m" | "man" => Ok(Gender::Male),
            "female" | "f" | "woman" => Ok(Gender::Female),
            "unspecified" | "other" | "prefer not to say" | "" => Ok(Gender::Unspecified),
            _ => Err(ParseError::Gender(s.to_string())),
        }
    }
}

/// Physiological condition that raises fluid needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCondition {
    #[default]
    None,
    Pregnant,
    Breastfeeding,
}

impl SpecialCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialCondition::None => "none",
            SpecialCondition::Pregnant => "pregnant",
            SpecialCondition::Breastfeeding => "breastfeeding",
        }
    }
}

impl fmt::Display for SpecialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecialCondition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" | "" => Ok(SpecialCondition::None),
            "pregnant" | "pregnancy" => Ok(SpecialCondition::Pregnant),
            "breastfeeding" | "lactating" | "nursing" => Ok(SpecialCondition::Breastfeeding),
            _ => Err(ParseError::SpecialCondition(s.to_string())),
        }
    }
}

/// Lowercase, trim and fold `_`/`-` separators into single spaces
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Profiles
// ============================================================================

/// Everything the goal calculator reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydrationProfile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<i32>,
    #[serde(default)]
    pub gender: Gender,
    pub activity_level: Option<ActivityLevel>,
    pub climate: Option<Climate>,
    #[serde(default)]
    pub special_condition: SpecialCondition,
    #[serde(default)]
    pub pregnant: bool,
    #[serde(default)]
    pub breastfeeding: bool,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub preferred_unit: VolumeUnit,
}

/// A user's stored profile with its cached daily goal
///
/// The goal is private: the only way to change calculator inputs is through
/// [`UserProfile::update_inputs`], which recomputes it.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    inputs: HydrationProfile,
    daily_goal_ml: i64,
}

impl UserProfile {
    pub fn new(user_id: Uuid, display_name: Option<String>, inputs: HydrationProfile) -> Self {
        let daily_goal_ml = calculate_goal_ml(&inputs);
        Self {
            user_id,
            display_name,
            inputs,
            daily_goal_ml,
        }
    }

    pub fn inputs(&self) -> &HydrationProfile {
        &self.inputs
    }

    /// Daily goal in milliliters
    pub fn daily_goal_ml(&self) -> i64 {
        self.daily_goal_ml
    }

    /// Daily goal in the user's preferred unit
    pub fn display_goal(&self) -> i64 {
        self.inputs.preferred_unit.from_ml_rounded(self.daily_goal_ml)
    }

    /// Mutate the calculator inputs and recompute the cached goal.
    /// Returns true when the goal changed.
    pub fn update_inputs<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut HydrationProfile),
    {
        f(&mut self.inputs);
        let goal = calculate_goal_ml(&self.inputs);
        let changed = goal != self.daily_goal_ml;
        self.daily_goal_ml = goal;
        changed
    }
}
