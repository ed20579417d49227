//! Hydration Tracker WASM Module
//!
//! Bindings that let the client preview goals, reminder windows and unit
//! conversions with the same code the backend runs.

use hydration_shared::goal::{bmi, calculate_goal};
use hydration_shared::profile::HydrationProfile;
use hydration_shared::time_window::{DayWindow, TimeOfDay};
use hydration_shared::types::UpdateProfileRequest;
use hydration_shared::units::VolumeUnit;
use validator::Validate;
use wasm_bindgen::prelude::*;

/// Daily goal in the profile's preferred unit, from a JSON profile
///
/// Accepts the same body as `POST /api/v1/profile/goal/calculate`.
#[wasm_bindgen]
pub fn calculate_goal_preview(profile_json: &str) -> Result<f64, JsValue> {
    goal_preview(profile_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether `at` (HH:MM) falls in the half-open window `[start, end)`
#[wasm_bindgen]
pub fn is_within_window(start: &str, end: &str, at: &str) -> Result<bool, JsValue> {
    within_window(start, end, at).map_err(|e| JsValue::from_str(&e))
}

/// Milliliters expressed in `unit` for display
#[wasm_bindgen]
pub fn to_display_amount(ml: f64, unit: &str) -> Result<f64, JsValue> {
    display_amount(ml, unit).map_err(|e| JsValue::from_str(&e))
}

/// A value in `unit` converted to whole milliliters
#[wasm_bindgen]
pub fn to_ml_amount(value: f64, unit: &str) -> Result<f64, JsValue> {
    ml_amount(value, unit).map_err(|e| JsValue::from_str(&e))
}

/// Calculate BMI from weight (kg) and height (cm), 0 when height is unusable
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    bmi(weight_kg, height_cm).unwrap_or(0.0)
}

fn goal_preview(profile_json: &str) -> Result<f64, String> {
    let req: UpdateProfileRequest =
        serde_json::from_str(profile_json).map_err(|e| format!("Invalid profile: {e}"))?;
    req.validate().map_err(|e| format!("Invalid profile: {e}"))?;

    let mut profile = HydrationProfile::default();
    req.apply_to(&mut profile).map_err(|e| e.to_string())?;
    Ok(calculate_goal(&profile) as f64)
}

fn within_window(start: &str, end: &str, at: &str) -> Result<bool, String> {
    let parse = |s: &str| s.parse::<TimeOfDay>().map_err(|e| e.to_string());
    let window = DayWindow::new(parse(start)?, parse(end)?);
    Ok(window.contains(parse(at)?))
}

fn display_amount(ml: f64, unit: &str) -> Result<f64, String> {
    let unit: VolumeUnit = unit.parse().map_err(|e: hydration_shared::ParseError| e.to_string())?;
    Ok(unit.display_amount(ml.round() as i64))
}

fn ml_amount(value: f64, unit: &str) -> Result<f64, String> {
    let unit: VolumeUnit = unit.parse().map_err(|e: hydration_shared::ParseError| e.to_string())?;
    Ok(unit.to_ml(value) as f64)
}
