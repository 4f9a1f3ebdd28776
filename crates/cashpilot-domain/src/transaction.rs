//! Domain models for synced transactions and recurrence cadences.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction synced from the accounting platform.
///
/// Records are immutable inputs to forecasting: the engine only ever reads
/// them. `amount_minor` is signed pence; income is positive, spend negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<Cadence>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        date: NaiveDate,
        amount_minor: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            amount_minor,
            category: category.into(),
            recurrence_rule: None,
        }
    }

    pub fn with_recurrence(mut self, cadence: Cadence) -> Self {
        self.recurrence_rule = Some(cadence);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// Cadence at which a recurring transaction repeats.
pub enum Cadence {
    Weekly,
    Monthly,
}

impl Cadence {
    /// Calculates the next occurrence after `from` according to the cadence.
    ///
    /// Monthly steps clamp to the last day of shorter months, so a rule
    /// observed on Jan 31 lands on Feb 28 (or 29) rather than skipping March.
    pub fn next_date(self, from: NaiveDate) -> NaiveDate {
        match self {
            Cadence::Weekly => from + Duration::weeks(1),
            Cadence::Monthly => shift_month(from, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cadence::Weekly => "Weekly",
            Cadence::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_cadence_steps_seven_days() {
        assert_eq!(
            Cadence::Weekly.next_date(date(2026, 8, 6)),
            date(2026, 8, 13)
        );
    }

    #[test]
    fn monthly_cadence_clamps_to_month_end() {
        assert_eq!(
            Cadence::Monthly.next_date(date(2026, 1, 31)),
            date(2026, 2, 28)
        );
        assert_eq!(
            Cadence::Monthly.next_date(date(2024, 1, 31)),
            date(2024, 2, 29)
        );
        assert_eq!(
            Cadence::Monthly.next_date(date(2026, 12, 15)),
            date(2027, 1, 15)
        );
    }

    #[test]
    fn recurrence_flag_follows_rule_presence() {
        let user = Uuid::new_v4();
        let plain = Transaction::new(user, date(2026, 8, 1), -1500, "Rent");
        assert!(!plain.is_recurring());
        let recurring = plain.with_recurrence(Cadence::Monthly);
        assert!(recurring.is_recurring());
    }

    #[test]
    fn transaction_serializes_with_camel_case_contract_fields() {
        let user = Uuid::new_v4();
        let txn = Transaction::new(user, date(2026, 8, 1), 2000_00, "Sales")
            .with_recurrence(Cadence::Weekly);
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["amountMinor"], 2000_00);
        assert_eq!(json["recurrenceRule"], "weekly");
        assert_eq!(json["userId"], serde_json::json!(user));
    }
}
