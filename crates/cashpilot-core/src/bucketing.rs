//! Partitioning of projected movements into weekly buckets with a running
//! projected balance.
//!
//! Week boundaries are anchored to the horizon start, not to calendar weeks:
//! week 0 is `[start, start + 7d)`. All arithmetic is integer minor units;
//! no floating point touches a balance anywhere in this module.

use chrono::{Duration, NaiveDate};

use cashpilot_domain::{
    bucket_start, week_label, ForecastWeek, DAYS_PER_WEEK, HORIZON_DAYS, WEEKS_PER_FORECAST,
};

use crate::projection::ProjectedMovement;
use crate::EngineError;

/// Sums the movement stream into exactly 13 `ForecastWeek` entries.
///
/// Positive amounts accumulate into `income`, negative ones into `expenses`
/// as absolute values, independently. Weeks with no movements carry the prior
/// projected balance forward unchanged.
pub fn bucket_weeks(
    movements: &[ProjectedMovement],
    horizon_start: NaiveDate,
    current_balance: i64,
) -> Vec<ForecastWeek> {
    let mut income = [0i64; WEEKS_PER_FORECAST];
    let mut expenses = [0i64; WEEKS_PER_FORECAST];

    for movement in movements {
        let offset = (movement.date - horizon_start).num_days();
        if !(0..HORIZON_DAYS).contains(&offset) {
            continue;
        }
        let index = (offset / DAYS_PER_WEEK) as usize;
        if movement.amount_minor >= 0 {
            income[index] += movement.amount_minor;
        } else {
            expenses[index] += movement.amount_minor.abs();
        }
    }

    let mut weeks = Vec::with_capacity(WEEKS_PER_FORECAST);
    let mut balance = current_balance;
    for index in 0..WEEKS_PER_FORECAST {
        let week_start = bucket_start(horizon_start, index);
        balance += income[index] - expenses[index];
        weeks.push(ForecastWeek {
            week_start,
            week_end: week_start + Duration::days(DAYS_PER_WEEK),
            week_label: week_label(week_start),
            income: income[index],
            expenses: expenses[index],
            projected: balance,
        });
    }
    weeks
}

/// Re-checks the structural invariants of a computed series before anything
/// is persisted. A violation is an internal defect and fails the run closed.
pub fn validate_weeks(weeks: &[ForecastWeek], current_balance: i64) -> Result<(), EngineError> {
    if weeks.len() != WEEKS_PER_FORECAST {
        return Err(EngineError::Validation(format!(
            "expected {} weeks, computed {}",
            WEEKS_PER_FORECAST,
            weeks.len()
        )));
    }

    let mut prior = current_balance;
    for (index, week) in weeks.iter().enumerate() {
        if (week.week_end - week.week_start).num_days() != DAYS_PER_WEEK {
            return Err(EngineError::Validation(format!(
                "week {index} does not span exactly {DAYS_PER_WEEK} days"
            )));
        }
        if index > 0 && week.week_start != weeks[index - 1].week_end {
            return Err(EngineError::Validation(format!(
                "week {index} is not contiguous with its predecessor"
            )));
        }
        if week.income < 0 || week.expenses < 0 {
            return Err(EngineError::Validation(format!(
                "week {index} has a negative income or expense total"
            )));
        }
        if week.projected != prior + week.income - week.expenses {
            return Err(EngineError::Validation(format!(
                "week {index} breaks the balance recurrence"
            )));
        }
        prior = week.projected;
    }
    Ok(())
}
