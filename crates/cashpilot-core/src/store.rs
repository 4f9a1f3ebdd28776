//! Trait boundary between the engine and its external collaborators.
//!
//! The sync process that populates transactions, the account platform that
//! owns user settings, and the persistence layer all sit behind these traits.
//! Implementations are injected into [`crate::ForecastEngine`], never reached
//! through ambient globals, so tests run against fixture data.

use chrono::NaiveDate;
use uuid::Uuid;

use cashpilot_domain::{Alert, Forecast, Transaction, UserContext};

use crate::StoreError;

/// Read access to the durable record of synced transactions.
pub trait TransactionStore: Send + Sync {
    /// Lists a user's transactions, optionally restricted to `date >= since`,
    /// ordered by date ascending.
    fn list_transactions(
        &self,
        user_id: Uuid,
        since: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// Read access to per-user forecasting settings.
pub trait UserContextStore: Send + Sync {
    fn get_user_context(&self, user_id: Uuid) -> Result<UserContext, StoreError>;
}

/// Alert persistence. Regeneration only ever reads non-dismissed alerts and
/// appends new ones; dismissal is a user action outside the engine.
pub trait AlertStore: Send + Sync {
    /// Non-dismissed alerts for the user, newest first.
    fn list_active_alerts(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError>;

    fn insert_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError>;
}

/// Versioned forecast persistence.
///
/// `commit_forecast` is the single state transition of the whole pipeline:
/// atomically append the new forecast, stamp its `generated_at`, and leave
/// exactly one active forecast for the user. When two commits race, the later
/// commit timestamp wins and the earlier forecast stays retired; history is
/// never deleted. Implementations must not retry internally.
pub trait ForecastStore: Send + Sync {
    fn commit_forecast(&self, user_id: Uuid, forecast: Forecast) -> Result<Forecast, StoreError>;

    /// The forecast currently considered authoritative for display.
    fn active_forecast(&self, user_id: Uuid) -> Result<Option<Forecast>, StoreError>;
}
