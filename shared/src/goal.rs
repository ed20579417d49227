//! Daily hydration goal calculation
//!
//! Pure functions over a [`HydrationProfile`]. The running intake starts
//! from body weight and is adjusted in a fixed order:
//!
//! 1. base = weight x 35 ml (flat 2000 ml when weight is missing or invalid)
//! 2. age: x0.90 from 65, x0.95 from 55
//! 3. gender: x1.05 for male
//! 4. BMI: x1.05 under 18.5, x1.10 for 25..30, x1.15 from 30
//! 5. activity, 6. climate, 7. special condition: additive
//! 8. lifestyle: additive, except senior which scales the running total
//! 9. round, 10. convert to ounces when preferred

use crate::profile::{Gender, HydrationProfile, Lifestyle, SpecialCondition};

/// Milliliters of water per kilogram of body weight
pub const ML_PER_KG: f64 = 35.0;

/// Base intake when no usable weight is known
pub const FALLBACK_BASE_ML: f64 = 2000.0;

const PREGNANCY_BONUS_ML: f64 = 700.0;
const BREASTFEEDING_BONUS_ML: f64 = 1000.0;

/// Calculate the daily goal in the profile's preferred unit
pub fn calculate_goal(profile: &HydrationProfile) -> i64 {
    profile
        .preferred_unit
        .from_ml_rounded(calculate_goal_ml(profile))
}

/// Calculate the daily goal in milliliters
pub fn calculate_goal_ml(profile: &HydrationProfile) -> i64 {
    let weight = profile.weight_kg.filter(|w| w.is_finite() && *w > 0.0);

    let mut intake = match weight {
        Some(w) => w * ML_PER_KG,
        None => FALLBACK_BASE_ML,
    };

    intake *= age_factor(profile.age_years.unwrap_or(0));

    if profile.gender == Gender::Male {
        intake *= 1.05;
    }

    if let Some(bmi) = weight.and_then(|w| bmi(w, profile.height_cm?)) {
        intake *= bmi_factor(bmi);
    }

    if let Some(level) = profile.activity_level {
        intake += level.intake_bonus_ml();
    }

    if let Some(climate) = profile.climate {
        intake += climate.intake_bonus_ml();
    }

    if profile.special_condition == SpecialCondition::Pregnant || profile.pregnant {
        intake += PREGNANCY_BONUS_ML;
    }
    if profile.special_condition == SpecialCondition::Breastfeeding || profile.breastfeeding {
        intake += BREASTFEEDING_BONUS_ML;
    }

    intake = match profile.lifestyle {
        Lifestyle::Standard => intake,
        Lifestyle::Athlete => intake + 800.0,
        Lifestyle::OfficeWorker => intake + 200.0,
        Lifestyle::OutdoorWorker => intake + 700.0,
        Lifestyle::Senior => intake * 0.9,
    };

    intake.round() as i64
}

/// Stored goal when positive, otherwise `fallback_ml`
pub fn effective_goal_ml(stored_ml: Option<i64>, fallback_ml: i64) -> i64 {
    stored_ml.filter(|g| *g > 0).unwrap_or(fallback_ml)
}

/// Goal reminders pace against: the stored goal, never below `floor_ml`
pub fn reminder_goal_ml(stored_ml: Option<i64>, floor_ml: i64) -> i64 {
    stored_ml.unwrap_or(0).max(floor_ml)
}

/// Body mass index, `None` when height is not usable
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

fn age_factor(age_years: i32) -> f64 {
    if age_years >= 65 {
        0.9
    } else if age_years >= 55 {
        0.95
    } else {
        1.0
    }
}

fn bmi_factor(bmi: f64) -> f64 {
    if bmi < 18.5 {
        1.05
    } else if bmi < 25.0 {
        1.0
    } else if bmi < 30.0 {
        1.1
    } else {
        1.15
    }
}
