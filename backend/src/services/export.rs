//! Intake history export
//!
//! CSV rows are one entry each, oldest first, with local date and time.

use crate::error::ApiError;
use crate::services::intake::IntakeService;
use chrono::{DateTime, FixedOffset, NaiveDate};
use hydration_shared::analytics::resolve_history_range;
use hydration_shared::models::IntakeLog;
use hydration_shared::types::HistoryQuery;
use hydration_shared::units::VolumeUnit;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// One exported intake entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeLogExport {
    pub date: NaiveDate,
    pub time: String,
    pub amount_ml: i64,
    pub amount: f64,
    pub unit: String,
}

impl IntakeLogExport {
    pub fn from_log(log: &IntakeLog, unit: VolumeUnit, offset: &FixedOffset) -> Self {
        Self {
            date: log.local_date(offset),
            time: log.local_time_label(offset),
            amount_ml: log.amount_ml,
            amount: unit.display_amount(log.amount_ml),
            unit: unit.to_string(),
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Every entry in the resolved history range as CSV; pagination is ignored
    pub async fn history_csv(
        pool: &PgPool,
        user_id: Uuid,
        query: &HistoryQuery,
        unit: VolumeUnit,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ApiError> {
        let (from, to) = resolve_history_range(query.from, query.to, now.date_naive())?;
        let logs = IntakeService::logs_between(pool, user_id, from, to, now.offset()).await?;

        let rows: Vec<IntakeLogExport> = logs
            .iter()
            .map(|log| IntakeLogExport::from_log(log, unit, now.offset()))
            .collect();

        to_csv(&rows)
    }

    /// Attachment name for a history export
    pub fn history_filename(query: &HistoryQuery, today: NaiveDate) -> Result<String, ApiError> {
        let (from, to) = resolve_history_range(query.from, query.to, today)?;
        Ok(format!("water-history-{from}-to-{to}.csv"))
    }
}

/// Convert a slice of serializable rows to CSV with a header line
fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    for item in data {
        writer
            .serialize(item)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV writer error: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("UTF-8 conversion error: {}", e)))
}
