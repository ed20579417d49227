//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod intake;
pub mod profile;
pub mod reminder;

pub use intake::{IntakeLogRecord, IntakeRepository};
pub use profile::{ProfileRecord, ProfileRepository};
pub use reminder::{ReminderRecord, ReminderRepository};
