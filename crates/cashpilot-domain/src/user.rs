//! Per-user forecasting context supplied by the account platform.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only user settings the engine needs: the configured safety buffer and
/// the balance the projection starts from. Both in signed minor units; the
/// buffer is never negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: Uuid,
    pub cash_buffer: i64,
    pub current_balance: i64,
}

impl UserContext {
    pub fn new(user_id: Uuid, cash_buffer: i64, current_balance: i64) -> Self {
        Self {
            user_id,
            cash_buffer: cash_buffer.max(0),
            current_balance,
        }
    }
}
