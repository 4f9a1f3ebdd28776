//! Risk alerts derived from a generated forecast.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Kind of risk condition an alert flags.
pub enum AlertKind {
    /// Projected balance falls below the user's configured safety buffer.
    BufferBreach,
    /// Projected balance goes negative.
    NegativeBalance,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertKind::BufferBreach => "buffer_breach",
            AlertKind::NegativeBalance => "negative_balance",
        };
        f.write_str(label)
    }
}

/// An alert raised by forecast regeneration.
///
/// Alerts are additive: regeneration only ever inserts new rows, and only a
/// user dismissal (outside the engine) mutates one. `week_start` is the
/// absolute start of the flagged bucket; suppression compares it across
/// regenerations whose horizons have shifted, where the positional week index
/// alone would be ambiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub forecast_id: Uuid,
    pub kind: AlertKind,
    pub week_start: NaiveDate,
    pub week_label: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub dismissed: bool,
}

impl Alert {
    pub fn new(
        user_id: Uuid,
        forecast_id: Uuid,
        kind: AlertKind,
        week_start: NaiveDate,
        week_label: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            forecast_id,
            kind,
            week_start,
            week_label: week_label.into(),
            message: message.into(),
            created_at,
            dismissed: false,
        }
    }

    /// Whether this alert already covers a breach of `kind` first seen at
    /// `week_start`: same kind, not dismissed, and flagged for an equal or
    /// earlier week.
    pub fn covers(&self, kind: AlertKind, week_start: NaiveDate) -> bool {
        !self.dismissed && self.kind == kind && self.week_start <= week_start
    }
}
