//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the pure domain code in `hydration_shared`.

pub mod analytics;
pub mod export;
pub mod intake;
pub mod profile;
pub mod reminder;

pub use analytics::AnalyticsService;
pub use export::ExportService;
pub use intake::IntakeService;
pub use profile::ProfileService;
pub use reminder::ReminderService;
