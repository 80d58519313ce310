use crate::config::PlanLimits;
use crate::error::AppError;
use crate::usage::{month_start, Plan, UsageLedger, UsageStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Each in-memory connection is its own database.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_usage (
            user_id TEXT PRIMARY KEY,
            plan TEXT NOT NULL DEFAULT 'free',
            usage_count INTEGER NOT NULL DEFAULT 0,
            period_start INTEGER NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Usage ledger persisted in SQLite. `period_start` is the UTC month start
/// as a unix timestamp; a stale period reads as zero usage.
#[derive(Debug, Clone)]
pub struct SqliteUsageLedger {
    pool: SqlitePool,
    limits: PlanLimits,
}

impl SqliteUsageLedger {
    pub fn new(pool: SqlitePool, limits: PlanLimits) -> Self {
        Self { pool, limits }
    }

    pub async fn connect(database_url: &str, limits: PlanLimits) -> Result<Self, AppError> {
        let pool = init_db(database_url).await?;
        Ok(Self::new(pool, limits))
    }

    fn status(&self, plan: &str, usage: i64, now: DateTime<Utc>) -> Result<UsageStatus, AppError> {
        let plan = Plan::from_str(plan)?;
        let usage = u32::try_from(usage).unwrap_or(u32::MAX);
        Ok(UsageStatus::new(plan, usage, &self.limits, now))
    }

    pub async fn check_usage_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let period = month_start(now).timestamp();
        let row = sqlx::query_as::<_, (String, i64, i64)>(
            "SELECT plan, usage_count, period_start FROM user_usage WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((plan, usage, period_start)) if period_start == period => {
                self.status(&plan, usage, now)
            }
            Some((plan, _, _)) => self.status(&plan, 0, now),
            None => self.status(Plan::Free.as_str(), 0, now),
        }
    }

    /// Creates the row if needed and zeroes a counter left over from an
    /// earlier month.
    async fn ensure_current_period(&self, user_id: &str, period: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_usage (user_id, plan, usage_count, period_start)
            VALUES (?, 'free', 0, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                usage_count = CASE
                    WHEN user_usage.period_start = excluded.period_start
                        THEN user_usage.usage_count
                    ELSE 0
                END,
                period_start = excluded.period_start
            "#,
        )
        .bind(user_id)
        .bind(period)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn try_charge_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let period = month_start(now).timestamp();
        self.ensure_current_period(user_id, period).await?;

        // The limit check and the increment are a single statement
        let charged = sqlx::query_as::<_, (String, i64)>(
            r#"
            UPDATE user_usage
            SET usage_count = usage_count + 1
            WHERE user_id = ?
                AND period_start = ?
                AND usage_count < CASE plan WHEN 'pro' THEN ? ELSE ? END
            RETURNING plan, usage_count
            "#,
        )
        .bind(user_id)
        .bind(period)
        .bind(i64::from(self.limits.pro))
        .bind(i64::from(self.limits.free))
        .fetch_optional(&self.pool)
        .await?;

        match charged {
            Some((plan, usage)) => self.status(&plan, usage, now),
            None => {
                let status = self.check_usage_at(user_id, now).await?;
                Err(AppError::QuotaExceeded {
                    limit: status.limit,
                })
            }
        }
    }

    pub async fn refund_usage_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let period = month_start(now).timestamp();
        let refunded = sqlx::query_as::<_, (String, i64)>(
            r#"
            UPDATE user_usage
            SET usage_count = usage_count - 1
            WHERE user_id = ? AND period_start = ? AND usage_count > 0
            RETURNING plan, usage_count
            "#,
        )
        .bind(user_id)
        .bind(period)
        .fetch_optional(&self.pool)
        .await?;

        match refunded {
            Some((plan, usage)) => self.status(&plan, usage, now),
            None => self.check_usage_at(user_id, now).await,
        }
    }

    pub async fn set_plan_at(
        &self,
        user_id: &str,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let period = month_start(now).timestamp();
        let (plan_text, usage) = sqlx::query_as::<_, (String, i64)>(
            r#"
            INSERT INTO user_usage (user_id, plan, usage_count, period_start)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                plan = excluded.plan,
                usage_count = CASE
                    WHEN user_usage.period_start = excluded.period_start
                        THEN user_usage.usage_count
                    ELSE 0
                END,
                period_start = excluded.period_start
            RETURNING plan, usage_count
            "#,
        )
        .bind(user_id)
        .bind(plan.as_str())
        .bind(period)
        .fetch_one(&self.pool)
        .await?;

        info!("User {} moved to {} plan", user_id, plan);
        self.status(&plan_text, usage, now)
    }
}

#[async_trait]
impl UsageLedger for SqliteUsageLedger {
    async fn check_usage(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.check_usage_at(user_id, Utc::now()).await
    }

    async fn try_charge(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.try_charge_at(user_id, Utc::now()).await
    }

    async fn refund_usage(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.refund_usage_at(user_id, Utc::now()).await
    }

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<UsageStatus, AppError> {
        self.set_plan_at(user_id, plan, Utc::now()).await
    }
}
