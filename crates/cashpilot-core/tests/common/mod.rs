//! Shared fixtures for engine integration tests: in-process store fakes and
//! a deterministic clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use cashpilot_core::{
    AlertStore, Clock, ForecastStore, StoreError, TransactionStore, UserContextStore,
};
use cashpilot_domain::{Alert, Forecast, Transaction, UserContext};

/// One fake backing every store trait, so a test wires a single fixture into
/// the engine and inspects everything it persisted.
#[derive(Default)]
pub struct FixtureStore {
    pub transactions: Mutex<Vec<Transaction>>,
    pub users: Mutex<HashMap<Uuid, UserContext>>,
    pub alerts: Mutex<Vec<Alert>>,
    pub forecasts: Mutex<Vec<Forecast>>,
    pub time_out_reads: AtomicBool,
    pub fail_commits: AtomicBool,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, ctx: UserContext) {
        self.users.lock().unwrap().insert(ctx.user_id, ctx);
    }

    pub fn seed_transactions(&self, txns: Vec<Transaction>) {
        self.transactions.lock().unwrap().extend(txns);
    }

    pub fn seed_alert(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }

    pub fn stored_alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn stored_forecasts(&self) -> Vec<Forecast> {
        self.forecasts.lock().unwrap().clone()
    }

    pub fn active_forecasts(&self, user_id: Uuid) -> Vec<Forecast> {
        self.stored_forecasts()
            .into_iter()
            .filter(|f| f.user_id == user_id && f.is_active)
            .collect()
    }
}

impl TransactionStore for FixtureStore {
    fn list_transactions(
        &self,
        user_id: Uuid,
        since: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, StoreError> {
        if self.time_out_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout("fixture read timeout".into()));
        }
        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && since.map_or(true, |s| t.date >= s))
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.date);
        Ok(rows)
    }
}

impl UserContextStore for FixtureStore {
    fn get_user_context(&self, user_id: Uuid) -> Result<UserContext, StoreError> {
        if self.time_out_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout("fixture read timeout".into()));
        }
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::Backend(format!("unknown user {user_id}")))
    }
}

impl AlertStore for FixtureStore {
    fn list_active_alerts(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError> {
        let mut rows: Vec<Alert> = self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && !a.dismissed)
            .cloned()
            .collect();
        rows.sort_by_key(|a| std::cmp::Reverse(a.created_at));
        Ok(rows)
    }

    fn insert_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        self.alerts.lock().unwrap().extend_from_slice(alerts);
        Ok(())
    }
}

impl ForecastStore for FixtureStore {
    fn commit_forecast(&self, user_id: Uuid, forecast: Forecast) -> Result<Forecast, StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("fixture commit failure".into()));
        }
        let mut log = self.forecasts.lock().unwrap();
        log.retain(|f| f.id != forecast.id);
        log.push(forecast.clone());
        let winner = log
            .iter()
            .filter(|f| f.user_id == user_id)
            .max_by_key(|f| (f.generated_at, f.id))
            .map(|f| f.id);
        for entry in log.iter_mut().filter(|f| f.user_id == user_id) {
            entry.is_active = Some(entry.id) == winner;
        }
        Ok(log
            .iter()
            .find(|f| f.id == forecast.id)
            .cloned()
            .expect("just inserted"))
    }

    fn active_forecast(&self, user_id: Uuid) -> Result<Option<Forecast>, StoreError> {
        Ok(self
            .forecasts
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.user_id == user_id && f.is_active)
            .cloned())
    }
}

/// A clock that starts at a fixed instant and advances one second per
/// reading, so successive commits get strictly increasing timestamps while
/// the horizon date stays put.
pub struct TickingClock {
    base: DateTime<Utc>,
    ticks: Mutex<i64>,
}

impl TickingClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            ticks: Mutex::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().unwrap();
        *ticks += 1;
        self.base + Duration::seconds(*ticks)
    }

    fn today(&self) -> NaiveDate {
        self.base.date_naive()
    }
}
