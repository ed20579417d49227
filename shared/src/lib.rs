//! Hydration Tracker Shared Library
//!
//! Pure domain logic shared by the backend and the WASM bindings: goal
//! calculation, reminder policy, insights and the API types. Nothing in
//! this crate performs I/O.

pub mod analytics;
pub mod errors;
pub mod goal;
pub mod insights;
pub mod models;
pub mod profile;
pub mod reminder;
pub mod time_window;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use goal::{calculate_goal, calculate_goal_ml};
pub use insights::{compute_insights, Badge, HydrationInsights};
pub use models::IntakeLog;
pub use profile::*;
pub use reminder::{should_notify, ReminderConfig, ReminderDecision, ReminderMessage};
pub use time_window::{DayWindow, TimeOfDay};
pub use types::*;
pub use units::*;
