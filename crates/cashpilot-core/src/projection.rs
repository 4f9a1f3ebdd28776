//! Expansion of transaction history into expected future cash movements.
//!
//! Two sources feed the horizon. Recurring transactions expand
//! deterministically by cadence, each series anchored at its last observed
//! occurrence. Categories with no recurring template fall back to a
//! trailing-eight-week average of their non-recurring history, applied
//! uniformly to every week of the horizon.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use cashpilot_domain::{bucket_start, Cadence, Transaction, HORIZON_DAYS, WEEKS_PER_FORECAST};

use crate::EngineError;

/// Weeks of history consulted by the fallback estimate.
pub const LOOKBACK_WEEKS: i64 = 8;

/// Days of history the engine fetches ahead of the horizon start.
pub const LOOKBACK_DAYS: i64 = LOOKBACK_WEEKS * 7;

const MAX_OCCURRENCES_PER_SERIES: usize = 1024;

/// A single expected cash movement inside the forecast horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedMovement {
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub category: String,
}

/// Projects the cash movements expected in `[horizon_start, horizon_start + 91d)`.
///
/// Pure with respect to its inputs: the same transaction set and horizon
/// start always yield the same movements in the same order (date, category,
/// amount). Fails with `InsufficientData` when the user has no transactions
/// at all, so the caller can surface a connect/pending state.
pub fn project_movements(
    user_id: Uuid,
    transactions: &[Transaction],
    horizon_start: NaiveDate,
) -> Result<Vec<ProjectedMovement>, EngineError> {
    if transactions.is_empty() {
        return Err(EngineError::InsufficientData(user_id));
    }

    let horizon_end = horizon_start + Duration::days(HORIZON_DAYS);
    let mut movements = Vec::new();

    let series = collect_series(transactions);
    for ((category, cadence, amount_minor), anchor) in &series {
        expand_series(
            category,
            *cadence,
            *amount_minor,
            *anchor,
            horizon_start,
            horizon_end,
            &mut movements,
        );
    }

    let recurring_categories: HashSet<&str> = series
        .keys()
        .map(|(category, _, _)| category.as_str())
        .collect();
    fallback_movements(
        transactions,
        &recurring_categories,
        horizon_start,
        &mut movements,
    );

    movements.sort_by(|a, b| {
        (a.date, &a.category, a.amount_minor).cmp(&(b.date, &b.category, b.amount_minor))
    });
    Ok(movements)
}

/// Groups recurring transactions into series keyed by (category, cadence,
/// amount) and keeps the latest observed date per series as its anchor.
fn collect_series(transactions: &[Transaction]) -> HashMap<(String, Cadence, i64), NaiveDate> {
    let mut series: HashMap<(String, Cadence, i64), NaiveDate> = HashMap::new();
    for txn in transactions {
        let Some(cadence) = txn.recurrence_rule else {
            continue;
        };
        let key = (txn.category.clone(), cadence, txn.amount_minor);
        series
            .entry(key)
            .and_modify(|anchor| {
                if txn.date > *anchor {
                    *anchor = txn.date;
                }
            })
            .or_insert(txn.date);
    }
    series
}

/// Walks a series forward from its anchor, emitting every occurrence that
/// lands inside the horizon. The anchor itself is already realized history,
/// so projection starts strictly after it.
fn expand_series(
    category: &str,
    cadence: Cadence,
    amount_minor: i64,
    anchor: NaiveDate,
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
    out: &mut Vec<ProjectedMovement>,
) {
    let mut date = cadence.next_date(anchor);
    let mut guard = 0usize;
    while date < horizon_end && guard < MAX_OCCURRENCES_PER_SERIES {
        if date >= horizon_start {
            out.push(ProjectedMovement {
                date,
                amount_minor,
                category: category.to_string(),
            });
        }
        date = cadence.next_date(date);
        guard += 1;
    }
}

/// Trailing-eight-week average, by category, for categories with no
/// recurring template: net non-recurring minor units over
/// `[horizon_start - 56d, horizon_start)`, divided by eight (integer
/// division toward zero), emitted once per week on the week-start date.
fn fallback_movements(
    transactions: &[Transaction],
    recurring_categories: &HashSet<&str>,
    horizon_start: NaiveDate,
    out: &mut Vec<ProjectedMovement>,
) {
    let window_start = horizon_start - Duration::days(LOOKBACK_DAYS);
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for txn in transactions {
        if txn.is_recurring()
            || recurring_categories.contains(txn.category.as_str())
            || txn.date < window_start
            || txn.date >= horizon_start
        {
            continue;
        }
        *totals.entry(txn.category.as_str()).or_insert(0) += txn.amount_minor;
    }

    for (category, total) in totals {
        let weekly = total / LOOKBACK_WEEKS;
        if weekly == 0 {
            continue;
        }
        for index in 0..WEEKS_PER_FORECAST {
            out.push(ProjectedMovement {
                date: bucket_start(horizon_start, index),
                amount_minor: weekly,
                category: category.to_string(),
            });
        }
    }
}
