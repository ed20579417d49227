//! Reminder scheduler
//!
//! A single background task that wakes on a fixed cadence and evaluates every
//! active reminder in the configured UTC offset. Reminders are handled one at
//! a time; a failure for one is logged and the tick moves on. Missed ticks are
//! skipped, so evaluations never overlap or burst.

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::PgReminderStore;

use crate::notifications::{PushError, PushSender};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use hydration_shared::analytics::utc_bounds;
use hydration_shared::goal::reminder_goal_ml;
use hydration_shared::models::IntakeLog;
use hydration_shared::reminder::{check_gates, compose_message, ReminderConfig, NOTIFICATION_TITLE};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Storage the scheduler reads reminders and intake from
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn active_reminders(&self) -> Result<Vec<ReminderConfig>>;

    /// Intake logged in `[from, to)`
    async fn intake_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IntakeLog>>;

    async fn daily_goal_ml(&self, user_id: Uuid) -> Result<Option<i64>>;

    /// Persist `paused_until` and `last_notified_at` only
    async fn save_reminder_state(&self, config: &ReminderConfig) -> Result<()>;
}

/// Counts for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub evaluated: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Error, Debug)]
enum EvaluateError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error(transparent)]
    Push(#[from] PushError),
}

enum Outcome {
    Sent,
    Skipped,
}

#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn ReminderStore>,
    push: Arc<dyn PushSender>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    default_goal_ml: i64,
    tick_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        push: Arc<dyn PushSender>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
        default_goal_ml: i64,
        tick_interval: Duration,
    ) -> Self {
        Self {
            store,
            push,
            clock,
            offset,
            default_goal_ml,
            tick_interval,
        }
    }

    /// Evaluate every active reminder once at the clock's current time
    pub async fn poll_once(&self) -> TickReport {
        metrics::counter!("reminder_ticks_total").increment(1);
        let now = self.clock.now().with_timezone(&self.offset);
        let mut report = TickReport::default();

        let reminders = match self.store.active_reminders().await {
            Ok(reminders) => reminders,
            Err(e) => {
                error!(error = %e, "Failed to load active reminders");
                return report;
            }
        };

        for mut config in reminders {
            report.evaluated += 1;
            let user_id = config.user_id;
            match self.evaluate(&mut config, now).await {
                Ok(Outcome::Sent) => {
                    metrics::counter!("reminder_notifications_sent_total").increment(1);
                    report.sent += 1;
                }
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    metrics::counter!("reminder_notifications_failed_total").increment(1);
                    warn!(user_id = %user_id, error = %e, "Reminder evaluation failed");
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn evaluate(
        &self,
        config: &mut ReminderConfig,
        now: DateTime<FixedOffset>,
    ) -> Result<Outcome, EvaluateError> {
        let check = check_gates(config, now);
        if !check.gate.is_open() {
            if check.pause_cleared {
                self.store.save_reminder_state(config).await?;
            }
            debug!(user_id = %config.user_id, gate = ?check.gate, "Reminder held");
            return Ok(Outcome::Skipped);
        }

        let today = now.date_naive();
        let (from, to) = utc_bounds(today, today, &self.offset)
            .ok_or_else(|| anyhow::anyhow!("local day {today} has no UTC bounds"))?;
        let logs = self.store.intake_between(config.user_id, from, to).await?;
        let stored_goal = self.store.daily_goal_ml(config.user_id).await?;
        let goal_ml = reminder_goal_ml(stored_goal, self.default_goal_ml);
        let message = compose_message(config, now, &logs, goal_ml);

        let token = config.push_token.clone().unwrap_or_default();
        if let Err(e) = self.push.send(&token, NOTIFICATION_TITLE, message.text()).await {
            if check.pause_cleared {
                self.store.save_reminder_state(config).await?;
            }
            return Err(e.into());
        }

        config.mark_notified(now.with_timezone(&Utc));
        self.store.save_reminder_state(config).await?;
        info!(user_id = %config.user_id, message = ?message, "Reminder sent");
        Ok(Outcome::Sent)
    }

    /// Tick until `shutdown` flips to true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            tick_secs = self.tick_interval.as_secs(),
            utc_offset = %self.offset,
            "Reminder scheduler started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.poll_once().await;
                    debug!(
                        evaluated = report.evaluated,
                        sent = report.sent,
                        failed = report.failed,
                        skipped = report.skipped,
                        "Reminder tick complete"
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Reminder scheduler stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use hydration_shared::profile::ActivityLevel;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    /// 14:00 in India
    fn afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap()
    }

    #[derive(Default)]
    struct MemoryStore {
        reminders: Mutex<Vec<ReminderConfig>>,
        logs: Mutex<Vec<IntakeLog>>,
        goals: Mutex<HashMap<Uuid, i64>>,
        fail_listing: AtomicBool,
        /// Simulates the user pausing from the app while the tick is
        /// between reading and writing this reminder
        pause_mid_tick: Mutex<Option<Uuid>>,
    }

    impl MemoryStore {
        fn with(reminders: Vec<ReminderConfig>) -> Arc<Self> {
            Arc::new(Self {
                reminders: Mutex::new(reminders),
                ..Default::default()
            })
        }

        fn stored(&self, user_id: Uuid) -> ReminderConfig {
            self.reminders
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.user_id == user_id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl ReminderStore for MemoryStore {
        async fn active_reminders(&self) -> Result<Vec<ReminderConfig>> {
            if self.fail_listing.load(Ordering::SeqCst) {
                anyhow::bail!("connection refused");
            }
            Ok(self
                .reminders
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.is_active)
                .cloned()
                .collect())
        }

        async fn intake_between(
            &self,
            user_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Vec<IntakeLog>> {
            if *self.pause_mid_tick.lock().unwrap() == Some(user_id) {
                let mut reminders = self.reminders.lock().unwrap();
                if let Some(stored) = reminders.iter_mut().find(|r| r.user_id == user_id) {
                    stored.pause(from + ChronoDuration::hours(12));
                }
            }
            Ok(self
                .logs
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.user_id == user_id && l.logged_at >= from && l.logged_at < to)
                .cloned()
                .collect())
        }

        async fn daily_goal_ml(&self, user_id: Uuid) -> Result<Option<i64>> {
            Ok(self.goals.lock().unwrap().get(&user_id).copied())
        }

        async fn save_reminder_state(&self, config: &ReminderConfig) -> Result<()> {
            let mut reminders = self.reminders.lock().unwrap();
            if let Some(stored) = reminders.iter_mut().find(|r| r.user_id == config.user_id) {
                stored.paused_until = config.paused_until;
                stored.last_notified_at = config.last_notified_at;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        failing_tokens: HashSet<String>,
    }

    impl RecordingSender {
        fn failing(tokens: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                failing_tokens: tokens.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            })
        }

        fn bodies(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
        }
    }

    #[async_trait]
    impl PushSender for RecordingSender {
        async fn send(&self, token: &str, _title: &str, body: &str) -> Result<(), PushError> {
            if self.failing_tokens.contains(token) {
                return Err(PushError::Rejected("DeviceNotRegistered".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((token.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn reminder(token: &str) -> ReminderConfig {
        let mut config = ReminderConfig::new(Uuid::new_v4());
        config.push_token = Some(token.to_string());
        config
    }

    fn scheduler(
        store: Arc<MemoryStore>,
        push: Arc<RecordingSender>,
        clock: Arc<FixedClock>,
    ) -> ReminderScheduler {
        ReminderScheduler::new(
            store,
            push,
            clock,
            ist(),
            2000,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_open_reminder_fires_and_records_time() {
        let config = reminder("tok-a");
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        let report = scheduler(store.clone(), push.clone(), clock).poll_once().await;

        assert_eq!(
            report,
            TickReport {
                evaluated: 1,
                sent: 1,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(push.bodies(), vec!["No water logged yet today. Start hydrating"]);
        assert_eq!(store.stored(user_id).last_notified_at, Some(afternoon()));
    }

    #[tokio::test]
    async fn test_closed_gates_are_skipped() {
        let no_token = ReminderConfig::new(Uuid::new_v4());
        let mut paused = reminder("tok-p");
        paused.pause(afternoon());
        let mut inactive = reminder("tok-i");
        inactive.is_active = false;

        let store = MemoryStore::with(vec![no_token, paused, inactive]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        let report = scheduler(store, push.clone(), clock).poll_once().await;

        assert_eq!(report.evaluated, 2);
        assert_eq!(report.skipped, 2);
        assert!(push.bodies().is_empty());
    }

    #[tokio::test]
    async fn test_interval_gate_between_ticks() {
        let config = reminder("tok-a");
        let store = MemoryStore::with(vec![config]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));
        let scheduler = scheduler(store, push.clone(), clock.clone());

        assert_eq!(scheduler.poll_once().await.sent, 1);

        clock.advance(ChronoDuration::minutes(20));
        let report = scheduler.poll_once().await;
        assert_eq!((report.sent, report.skipped), (0, 1));

        clock.advance(ChronoDuration::minutes(11));
        assert_eq!(scheduler.poll_once().await.sent, 1);
        assert_eq!(push.bodies().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failing_push_does_not_stop_the_rest() {
        let broken = reminder("tok-broken");
        let healthy = reminder("tok-ok");
        let (broken_id, healthy_id) = (broken.user_id, healthy.user_id);
        let store = MemoryStore::with(vec![broken, healthy]);
        let push = RecordingSender::failing(&["tok-broken"]);
        let clock = Arc::new(FixedClock::new(afternoon()));

        let report = scheduler(store.clone(), push.clone(), clock).poll_once().await;

        assert_eq!((report.evaluated, report.sent, report.failed), (2, 1, 1));
        assert_eq!(store.stored(broken_id).last_notified_at, None);
        assert_eq!(store.stored(healthy_id).last_notified_at, Some(afternoon()));
    }

    #[tokio::test]
    async fn test_listing_failure_yields_empty_report_and_recovers() {
        let store = MemoryStore::with(vec![reminder("tok-a")]);
        store.fail_listing.store(true, Ordering::SeqCst);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));
        let scheduler = scheduler(store.clone(), push, clock);

        assert_eq!(scheduler.poll_once().await, TickReport::default());

        store.fail_listing.store(false, Ordering::SeqCst);
        assert_eq!(scheduler.poll_once().await.sent, 1);
    }

    #[tokio::test]
    async fn test_expired_pause_is_cleared_and_persisted() {
        let mut config = reminder("tok-a");
        config.pause(afternoon() - ChronoDuration::minutes(90));
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        let report = scheduler(store.clone(), push, clock).poll_once().await;

        assert_eq!(report.sent, 1);
        let stored = store.stored(user_id);
        assert!(!stored.is_paused());
        assert_eq!(stored.last_notified_at, Some(afternoon()));
    }

    #[tokio::test]
    async fn test_expired_pause_cleared_even_while_sleeping() {
        let mut config = reminder("tok-a");
        config.sleep_mode = true;
        // 23:30 in India
        let night = Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap();
        config.pause(night - ChronoDuration::hours(2));
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(night));

        let report = scheduler(store.clone(), push.clone(), clock).poll_once().await;

        assert_eq!(report.skipped, 1);
        assert!(push.bodies().is_empty());
        assert!(!store.stored(user_id).is_paused());
    }

    #[tokio::test]
    async fn test_message_uses_todays_logs_and_stored_goal() {
        let mut config = reminder("tok-a");
        config.activity_level = ActivityLevel::Light;
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        store.goals.lock().unwrap().insert(user_id, 3000);
        // 13:00 local, an hour before the tick
        store.logs.lock().unwrap().push(IntakeLog::new(
            user_id,
            500,
            afternoon() - ChronoDuration::hours(1),
        ));
        // yesterday's entry is ignored
        store.logs.lock().unwrap().push(IntakeLog::new(
            user_id,
            5000,
            afternoon() - ChronoDuration::days(1),
        ));
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        scheduler(store, push.clone(), clock).poll_once().await;

        assert_eq!(push.bodies(), vec!["It has been a while since your last drink"]);
    }

    #[tokio::test]
    async fn test_small_stored_goal_paces_against_default() {
        let config = reminder("tok-a");
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        store.goals.lock().unwrap().insert(user_id, 1400);
        // 600 ml by 14:00 is on pace for 1400 ml but behind 60% of 2000 ml's pace
        store.logs.lock().unwrap().push(IntakeLog::new(
            user_id,
            600,
            afternoon() - ChronoDuration::minutes(10),
        ));
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        scheduler(store, push.clone(), clock).poll_once().await;

        assert_eq!(push.bodies(), vec!["You're behind your hydration pace. Drink now!"]);
    }

    #[tokio::test]
    async fn test_high_activity_overrides_other_messages() {
        let mut config = reminder("tok-a");
        config.activity_level = ActivityLevel::VeryActive;
        let store = MemoryStore::with(vec![config]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        scheduler(store, push.clone(), clock).poll_once().await;

        assert_eq!(push.bodies(), vec!["High activity detected. Stay hydrated now!"]);
    }

    /// A pause written by the user between the tick's read and write is lost:
    /// the tick saves the state it read. Last writer wins.
    #[tokio::test]
    async fn test_pause_during_tick_is_overwritten_by_tick() {
        let config = reminder("tok-a");
        let user_id = config.user_id;
        let store = MemoryStore::with(vec![config]);
        *store.pause_mid_tick.lock().unwrap() = Some(user_id);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));

        let report = scheduler(store.clone(), push.clone(), clock).poll_once().await;

        assert_eq!(report.sent, 1);
        let stored = store.stored(user_id);
        assert!(!stored.is_paused());
        assert_eq!(stored.last_notified_at, Some(afternoon()));
    }

    #[tokio::test]
    async fn test_run_ticks_immediately_and_stops_on_shutdown() {
        let store = MemoryStore::with(vec![reminder("tok-a")]);
        let push = Arc::new(RecordingSender::default());
        let clock = Arc::new(FixedClock::new(afternoon()));
        let (tx, rx) = watch::channel(false);

        let handle = scheduler(store, push.clone(), clock).spawn(rx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(push.bodies().len(), 1);
    }
}
