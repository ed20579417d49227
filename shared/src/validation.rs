//! Input validation functions
//!
//! Checks for values that arrive outside the `validator`-derived request
//! DTOs in [`crate::types`]: converted intake amounts and push tokens.

/// Largest single intake entry accepted, in ml
pub const MAX_INTAKE_ML: i64 = 10_000;

/// Validate a logged intake amount (in ml)
pub fn validate_amount_ml(amount_ml: i64) -> Result<(), String> {
    if amount_ml <= 0 {
        return Err("Invalid water amount".to_string());
    }
    if amount_ml > MAX_INTAKE_ML {
        return Err(format!("Amount cannot exceed {MAX_INTAKE_ML} ml"));
    }
    Ok(())
}

/// Validate a push delivery token
pub fn validate_push_token(token: &str) -> Result<(), String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("Push token cannot be empty".to_string());
    }
    if token.len() > 255 {
        return Err("Push token too long".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "weight_kg" => "Weight",
        "height" | "height_cm" => "Height",
        "age" | "age_years" => "Age",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        "climate" => "Climate",
        "lifestyle" => "Lifestyle",
        "special_condition" => "Special Condition",
        "preferred_unit" | "unit" => "Preferred Unit",
        "amount" | "amount_ml" => "Amount",
        "interval" | "interval_minutes" => "Reminder Interval",
        "pause_duration_minutes" => "Pause Duration",
        "start_time" | "end_time" | "time" => "Time",
        "sleep_start" | "sleep_end" => "Sleep Time",
        "push_token" => "Push Token",
        _ => field_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount_ml(250).is_ok());
        assert_eq!(validate_amount_ml(0), Err("Invalid water amount".to_string()));
        assert!(validate_amount_ml(-5).is_err());
        assert!(validate_amount_ml(MAX_INTAKE_ML + 1).is_err());
    }

    #[test]
    fn test_validate_push_token() {
        assert!(validate_push_token("ExponentPushToken[xyz]").is_ok());
        assert!(validate_push_token("  ").is_err());
        assert!(validate_push_token(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("interval_minutes"), "Reminder Interval");
        assert_eq!(get_field_display_label("weight_kg"), "Weight");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_amount_range(amount in 1i64..=MAX_INTAKE_ML) {
            prop_assert!(validate_amount_ml(amount).is_ok());
        }

        #[test]
        fn prop_amount_above_max_rejected(amount in (MAX_INTAKE_ML + 1)..=i64::MAX) {
            prop_assert!(validate_amount_ml(amount).is_err());
        }
    }
}
