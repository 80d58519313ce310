//! Per-user monthly rewrite allowance.

use crate::config::PlanLimits;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    pub fn limit(self, limits: &PlanLimits) -> u32 {
        match self {
            Plan::Free => limits.free,
            Plan::Pro => limits.pro,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            other => Err(AppError::Validation(format!("unknown plan '{}'", other))),
        }
    }
}

/// Snapshot of a user's allowance for the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    pub plan: Plan,
    pub usage: u32,
    pub limit: u32,
    pub remaining: u32,
    pub can_use: bool,
    pub reset_date: DateTime<Utc>,
}

impl UsageStatus {
    pub fn new(plan: Plan, usage: u32, limits: &PlanLimits, now: DateTime<Utc>) -> Self {
        let limit = plan.limit(limits);
        Self {
            plan,
            usage,
            limit,
            remaining: limit.saturating_sub(usage),
            can_use: usage < limit,
            reset_date: next_month_start(now),
        }
    }
}

/// Storage for monthly counters.
#[async_trait]
pub trait UsageLedger: Send + Sync + 'static {
    async fn check_usage(&self, user_id: &str) -> Result<UsageStatus, AppError>;

    /// Reserves one rewrite, or fails with `QuotaExceeded` when the month's
    /// allowance is spent. Check and increment happen as one step.
    async fn try_charge(&self, user_id: &str) -> Result<UsageStatus, AppError>;

    /// Gives back a reservation whose request produced nothing.
    async fn refund_usage(&self, user_id: &str) -> Result<UsageStatus, AppError>;

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<UsageStatus, AppError>;
}

/// First instant of the month containing `now`, UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// First instant of the month after `now`, UTC.
pub fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[derive(Debug, Clone, Copy)]
struct UsageRecord {
    plan: Plan,
    usage: u32,
    period_start: DateTime<Utc>,
}

impl UsageRecord {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            plan: Plan::Free,
            usage: 0,
            period_start: month_start(now),
        }
    }

    /// Zeroes the counter when `now` is in a later month.
    fn roll_over(&mut self, now: DateTime<Utc>) {
        let current = month_start(now);
        if self.period_start != current {
            self.usage = 0;
            self.period_start = current;
        }
    }
}

/// Process-local ledger. Counters are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUsageLedger {
    limits: PlanLimits,
    records: Mutex<HashMap<String, UsageRecord>>,
}

impl InMemoryUsageLedger {
    pub fn new(limits: PlanLimits) -> Self {
        Self {
            limits,
            records: Mutex::new(HashMap::new()),
        }
    }

    fn with_record<T>(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut UsageRecord) -> T,
    ) -> Result<T, AppError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| AppError::Internal("usage ledger lock poisoned".to_string()))?;
        let record = records
            .entry(user_id.to_string())
            .or_insert_with(|| UsageRecord::fresh(now));
        record.roll_over(now);
        Ok(f(record))
    }

    pub fn check_usage_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let limits = self.limits;
        self.with_record(user_id, now, |r| UsageStatus::new(r.plan, r.usage, &limits, now))
    }

    pub fn try_charge_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let limits = self.limits;
        self.with_record(user_id, now, |r| {
            let limit = r.plan.limit(&limits);
            if r.usage >= limit {
                return Err(AppError::QuotaExceeded { limit });
            }
            r.usage += 1;
            Ok(UsageStatus::new(r.plan, r.usage, &limits, now))
        })?
    }

    pub fn refund_usage_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let limits = self.limits;
        self.with_record(user_id, now, |r| {
            r.usage = r.usage.saturating_sub(1);
            UsageStatus::new(r.plan, r.usage, &limits, now)
        })
    }

    pub fn set_plan_at(
        &self,
        user_id: &str,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus, AppError> {
        let limits = self.limits;
        let status = self.with_record(user_id, now, |r| {
            r.plan = plan;
            UsageStatus::new(r.plan, r.usage, &limits, now)
        })?;
        info!("User {} moved to {} plan", user_id, plan);
        Ok(status)
    }
}

#[async_trait]
impl UsageLedger for InMemoryUsageLedger {
    async fn check_usage(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.check_usage_at(user_id, Utc::now())
    }

    async fn try_charge(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.try_charge_at(user_id, Utc::now())
    }

    async fn refund_usage(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.refund_usage_at(user_id, Utc::now())
    }

    async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<UsageStatus, AppError> {
        self.set_plan_at(user_id, plan, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(
            month_start(at(2024, 3, 17)),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            next_month_start(at(2024, 12, 31)),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_new_user_is_free_with_full_allowance() {
        let ledger = InMemoryUsageLedger::new(PlanLimits::default());
        let status = ledger.check_usage_at("u1", at(2024, 5, 2)).unwrap();
        assert_eq!(status.plan, Plan::Free);
        assert_eq!(status.usage, 0);
        assert_eq!(status.remaining, 20);
        assert!(status.can_use);
        assert_eq!(
            status.reset_date,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_limit_is_enforced() {
        let ledger = InMemoryUsageLedger::new(PlanLimits { free: 2, pro: 5 });
        let now = at(2024, 5, 2);
        ledger.try_charge_at("u1", now).unwrap();
        let status = ledger.try_charge_at("u1", now).unwrap();
        assert_eq!(status.remaining, 0);
        assert!(!status.can_use);

        let err = ledger.try_charge_at("u1", now).unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded { limit: 2 }));
        assert_eq!(ledger.check_usage_at("u1", now).unwrap().usage, 2);

        let status = ledger.set_plan_at("u1", Plan::Pro, now).unwrap();
        assert!(status.can_use);
        assert_eq!(status.remaining, 3);
    }

    #[test]
    fn test_counter_resets_next_month() {
        let ledger = InMemoryUsageLedger::new(PlanLimits::default());
        ledger.try_charge_at("u1", at(2024, 1, 31)).unwrap();
        assert_eq!(ledger.check_usage_at("u1", at(2024, 1, 31)).unwrap().usage, 1);
        assert_eq!(ledger.check_usage_at("u1", at(2024, 2, 1)).unwrap().usage, 0);
    }

    #[test]
    fn test_users_are_independent() {
        let ledger = InMemoryUsageLedger::new(PlanLimits::default());
        let now = at(2024, 5, 2);
        ledger.try_charge_at("a", now).unwrap();
        assert_eq!(ledger.check_usage_at("b", now).unwrap().usage, 0);
    }

    #[test]
    fn test_refund_returns_reservation() {
        let ledger = InMemoryUsageLedger::new(PlanLimits { free: 1, pro: 5 });
        let now = at(2024, 5, 2);
        ledger.try_charge_at("u1", now).unwrap();
        let status = ledger.refund_usage_at("u1", now).unwrap();
        assert_eq!(status.usage, 0);
        assert!(status.can_use);

        // Never goes below zero
        assert_eq!(ledger.refund_usage_at("u1", now).unwrap().usage, 0);
    }

    #[test]
    fn test_try_charge_is_atomic_across_threads() {
        let limits = PlanLimits { free: 3, pro: 5 };
        let ledger = std::sync::Arc::new(InMemoryUsageLedger::new(limits));
        let now = at(2024, 5, 2);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = ledger.clone();
                std::thread::spawn(move || ledger.try_charge_at("u1", now).is_ok())
            })
            .collect();
        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(granted, 3);
        assert_eq!(ledger.check_usage_at("u1", now).unwrap().usage, 3);
    }

    #[test]
    fn test_plan_parse() {
        assert_eq!("PRO".parse::<Plan>().unwrap(), Plan::Pro);
        assert!("gold".parse::<Plan>().is_err());
    }
}
