//! Intake log repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use hydration_shared::models::IntakeLog;
use sqlx::PgPool;
use uuid::Uuid;

/// Intake log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IntakeLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i64,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<IntakeLogRecord> for IntakeLog {
    fn from(record: IntakeLogRecord) -> Self {
        IntakeLog {
            id: record.id,
            user_id: record.user_id,
            amount_ml: record.amount_ml,
            logged_at: record.logged_at,
        }
    }
}

/// Intake log repository
///
/// Every query is scoped by user id. Ranges are `[from, to)` instants.
pub struct IntakeRepository;

impl IntakeRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        amount_ml: i64,
        logged_at: DateTime<Utc>,
    ) -> Result<IntakeLogRecord> {
        let record = sqlx::query_as::<_, IntakeLogRecord>(
            r#"
            INSERT INTO intake_logs (user_id, amount_ml, logged_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, amount_ml, logged_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(amount_ml)
        .bind(logged_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Correct the amount of an entry, `None` if the user owns no such entry
    pub async fn update_amount(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        amount_ml: i64,
    ) -> Result<Option<IntakeLogRecord>> {
        let record = sqlx::query_as::<_, IntakeLogRecord>(
            r#"
            UPDATE intake_logs SET amount_ml = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, amount_ml, logged_at, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(amount_ml)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM intake_logs WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All entries in range, oldest first
    pub async fn list_between(
        pool: &PgPool,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IntakeLogRecord>> {
        let records = sqlx::query_as::<_, IntakeLogRecord>(
            r#"
            SELECT id, user_id, amount_ml, logged_at, created_at
            FROM intake_logs
            WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
            ORDER BY logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// One page of entries in range, newest first
    pub async fn page_between(
        pool: &PgPool,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IntakeLogRecord>> {
        let records = sqlx::query_as::<_, IntakeLogRecord>(
            r#"
            SELECT id, user_id, amount_ml, logged_at, created_at
            FROM intake_logs
            WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
            ORDER BY logged_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn count_between(
        pool: &PgPool,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)::bigint FROM intake_logs
            WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
