//! The regeneration pipeline: read, project, bucket, validate, derive,
//! commit.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cashpilot_domain::Forecast;

use crate::alerting::derive_alerts;
use crate::bucketing::{bucket_weeks, validate_weeks};
use crate::clock::Clock;
use crate::projection::{project_movements, LOOKBACK_DAYS};
use crate::store::{AlertStore, ForecastStore, TransactionStore, UserContextStore};
use crate::EngineError;

/// Orchestrates a single forecast regeneration run for one user.
///
/// Each invocation is a sequential pipeline; the only cross-invocation
/// discipline lives in the store's atomic commit, so regenerations for
/// different users are fully independent and concurrent runs for the same
/// user resolve to one active forecast. A run either commits or fails with
/// the prior active forecast untouched.
pub struct ForecastEngine {
    transactions: Arc<dyn TransactionStore>,
    users: Arc<dyn UserContextStore>,
    alerts: Arc<dyn AlertStore>,
    forecasts: Arc<dyn ForecastStore>,
    clock: Arc<dyn Clock>,
}

impl ForecastEngine {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        users: Arc<dyn UserContextStore>,
        alerts: Arc<dyn AlertStore>,
        forecasts: Arc<dyn ForecastStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions,
            users,
            alerts,
            forecasts,
            clock,
        }
    }

    /// Regenerates the user's 13-week forecast and persists it as the single
    /// active version, inserting any newly derived alerts.
    ///
    /// Returns the committed forecast. On any error nothing new is active;
    /// see [`EngineError`] for the taxonomy the caller retries against.
    pub fn generate_forecast(&self, user_id: Uuid) -> Result<Forecast, EngineError> {
        let horizon_start = self.clock.today();
        debug!(%user_id, %horizon_start, "starting forecast regeneration");

        let ctx = self
            .users
            .get_user_context(user_id)
            .map_err(EngineError::retrieval)?;
        let since = horizon_start - Duration::days(LOOKBACK_DAYS);
        let transactions = self
            .transactions
            .list_transactions(user_id, Some(since))
            .map_err(EngineError::retrieval)?;

        let movements = project_movements(user_id, &transactions, horizon_start)?;
        let weeks = bucket_weeks(&movements, horizon_start, ctx.current_balance);
        validate_weeks(&weeks, ctx.current_balance)?;

        let forecast = Forecast::new(user_id, weeks, self.clock.now());
        let existing = self
            .alerts
            .list_active_alerts(user_id)
            .map_err(EngineError::retrieval)?;
        let new_alerts = derive_alerts(&forecast, &ctx, &existing, self.clock.now());

        let committed = self
            .forecasts
            .commit_forecast(user_id, forecast)
            .map_err(EngineError::persistence)?;
        if !new_alerts.is_empty() {
            warn!(
                %user_id,
                count = new_alerts.len(),
                "forecast raised new risk alerts"
            );
            self.alerts
                .insert_alerts(&new_alerts)
                .map_err(EngineError::persistence)?;
        }

        info!(
            %user_id,
            forecast_id = %committed.id,
            movements = movements.len(),
            alerts = new_alerts.len(),
            "forecast committed"
        );
        Ok(committed)
    }
}
