//! cashpilot-storage-memory
//!
//! In-memory implementation of the engine's store traits, for unit testing
//! and local development. Forecast versioning is an append-only per-user log;
//! the active entry is recomputed inside a single lock so a commit is atomic
//! and concurrent commits resolve to exactly one winner.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use uuid::Uuid;

use cashpilot_core::{
    AlertStore, Clock, ForecastStore, StoreError, SystemClock, TransactionStore, UserContextStore,
};
use cashpilot_domain::{Alert, Forecast, Transaction, UserContext};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserContext>,
    transactions: HashMap<Uuid, Vec<Transaction>>,
    forecasts: HashMap<Uuid, Vec<Forecast>>,
    alerts: Vec<Alert>,
}

/// Fault toggles that make error paths testable without a real backend.
#[derive(Default)]
struct Faults {
    read_timeout: Option<String>,
    commit_failure: Option<String>,
}

/// Shared in-memory store backing all four engine collaborator traits.
pub struct MemoryStore {
    state: Mutex<State>,
    faults: Mutex<Faults>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// The commit timestamp comes from this clock, so tests pin it.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            faults: Mutex::new(Faults::default()),
            clock,
        }
    }

    pub fn put_user(&self, ctx: UserContext) {
        self.state.lock().users.insert(ctx.user_id, ctx);
    }

    pub fn add_transactions(&self, txns: Vec<Transaction>) {
        let mut state = self.state.lock();
        for txn in txns {
            state.transactions.entry(txn.user_id).or_default().push(txn);
        }
    }

    /// Marks an alert dismissed. Dismissal is a user action outside the
    /// engine; it exists here so suppression behavior can be exercised.
    pub fn dismiss_alert(&self, alert_id: Uuid) -> bool {
        let mut state = self.state.lock();
        match state.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                alert.dismissed = true;
                true
            }
            None => false,
        }
    }

    /// Full forecast log for a user, oldest first. Retired entries included.
    pub fn forecast_history(&self, user_id: Uuid) -> Vec<Forecast> {
        self.state
            .lock()
            .forecasts
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every stored alert for the user, dismissed or not.
    pub fn all_alerts(&self, user_id: Uuid) -> Vec<Alert> {
        self.state
            .lock()
            .alerts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn fail_next_reads(&self, reason: impl Into<String>) {
        self.faults.lock().read_timeout = Some(reason.into());
    }

    pub fn fail_next_commit(&self, reason: impl Into<String>) {
        self.faults.lock().commit_failure = Some(reason.into());
    }

    fn take_read_fault(&self) -> Option<String> {
        self.faults.lock().read_timeout.take()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore for MemoryStore {
    fn list_transactions(
        &self,
        user_id: Uuid,
        since: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, StoreError> {
        if let Some(reason) = self.take_read_fault() {
            return Err(StoreError::Timeout(reason));
        }
        let state = self.state.lock();
        let mut rows: Vec<Transaction> = state
            .transactions
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|t| since.map_or(true, |s| t.date >= s))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|t| (t.date, t.id));
        Ok(rows)
    }
}

impl UserContextStore for MemoryStore {
    fn get_user_context(&self, user_id: Uuid) -> Result<UserContext, StoreError> {
        if let Some(reason) = self.take_read_fault() {
            return Err(StoreError::Timeout(reason));
        }
        self.state
            .lock()
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::Backend(format!("unknown user {user_id}")))
    }
}

impl AlertStore for MemoryStore {
    fn list_active_alerts(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError> {
        let state = self.state.lock();
        let mut rows: Vec<Alert> = state
            .alerts
            .iter()
            .filter(|a| a.user_id == user_id && !a.dismissed)
            .cloned()
            .collect();
        rows.sort_by_key(|a| std::cmp::Reverse((a.created_at, a.id)));
        Ok(rows)
    }

    fn insert_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        self.state.lock().alerts.extend_from_slice(alerts);
        Ok(())
    }
}

impl ForecastStore for MemoryStore {
    /// Appends to the user's forecast log and recomputes the single active
    /// entry under one lock: stamp `generated_at`, retire everything else,
    /// activate the latest commit. Last writer wins by commit timestamp, with
    /// the forecast id as a stable tie-break; re-committing an id replaces
    /// its log entry instead of duplicating it.
    fn commit_forecast(&self, user_id: Uuid, forecast: Forecast) -> Result<Forecast, StoreError> {
        if let Some(reason) = self.faults.lock().commit_failure.take() {
            return Err(StoreError::Backend(reason));
        }
        if forecast.user_id != user_id {
            return Err(StoreError::Backend(format!(
                "forecast {} does not belong to user {user_id}",
                forecast.id
            )));
        }

        let mut stamped = forecast;
        stamped.generated_at = self.clock.now();
        stamped.is_active = false;

        let mut state = self.state.lock();
        let log = state.forecasts.entry(user_id).or_default();
        log.retain(|f| f.id != stamped.id);
        log.push(stamped.clone());

        let winner = log
            .iter()
            .max_by_key(|f| (f.generated_at, f.id))
            .map(|f| f.id);
        for entry in log.iter_mut() {
            entry.is_active = Some(entry.id) == winner;
        }
        let committed = log
            .iter()
            .find(|f| f.id == stamped.id)
            .cloned()
            .ok_or_else(|| StoreError::Backend("committed forecast vanished".into()))?;
        Ok(committed)
    }

    fn active_forecast(&self, user_id: Uuid) -> Result<Option<Forecast>, StoreError> {
        Ok(self
            .state
            .lock()
            .forecasts
            .get(&user_id)
            .and_then(|log| log.iter().find(|f| f.is_active))
            .cloned())
    }
}
