//! Derivation of risk alerts from a freshly computed forecast series.
//!
//! The deriver is additive only: it emits new alerts and never dismisses or
//! deletes existing ones. Duplicate suppression keeps regeneration from
//! producing alert storms: a breach is not re-flagged while a non-dismissed
//! alert of the same kind already covers an equal-or-earlier week.

use chrono::{DateTime, Utc};

use cashpilot_domain::{format_minor, Alert, AlertKind, Forecast, ForecastWeek, UserContext};

/// Scans the forecast against the user's buffer and prior alert state,
/// returning the new alerts to persist. The breach condition is evaluated
/// fresh each run; if nothing breaches, nothing is emitted.
pub fn derive_alerts(
    forecast: &Forecast,
    ctx: &UserContext,
    existing: &[Alert],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(week) = first_below(&forecast.weeks, ctx.cash_buffer) {
        if !suppressed(existing, AlertKind::BufferBreach, week) {
            alerts.push(Alert::new(
                forecast.user_id,
                forecast.id,
                AlertKind::BufferBreach,
                week.week_start,
                week.week_label.clone(),
                buffer_breach_message(ctx.cash_buffer, week),
                now,
            ));
        }
    }

    if let Some(week) = first_below(&forecast.weeks, 0) {
        if !suppressed(existing, AlertKind::NegativeBalance, week) {
            alerts.push(Alert::new(
                forecast.user_id,
                forecast.id,
                AlertKind::NegativeBalance,
                week.week_start,
                week.week_label.clone(),
                negative_balance_message(week),
                now,
            ));
        }
    }

    alerts
}

/// First week whose projected close falls below `threshold`.
fn first_below(weeks: &[ForecastWeek], threshold: i64) -> Option<&ForecastWeek> {
    weeks.iter().find(|week| week.projected < threshold)
}

fn suppressed(existing: &[Alert], kind: AlertKind, week: &ForecastWeek) -> bool {
    existing.iter().any(|alert| alert.covers(kind, week.week_start))
}

fn buffer_breach_message(cash_buffer: i64, week: &ForecastWeek) -> String {
    format!(
        "Projected balance drops below your {} cash buffer in the week of {}",
        format_minor(cash_buffer),
        week.week_start.format("%d %b %Y")
    )
}

fn negative_balance_message(week: &ForecastWeek) -> String {
    format!(
        "Projected balance goes negative ({}) in the week of {}",
        format_minor(week.projected),
        week.week_start.format("%d %b %Y")
    )
}
