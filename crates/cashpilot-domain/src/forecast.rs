//! Forecast series models: weekly buckets and the versioned forecast record.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days covered by a single forecast bucket.
pub const DAYS_PER_WEEK: i64 = 7;

/// Number of weekly buckets in every forecast horizon.
pub const WEEKS_PER_FORECAST: usize = 13;

/// Total days covered by the forecast horizon.
pub const HORIZON_DAYS: i64 = WEEKS_PER_FORECAST as i64 * DAYS_PER_WEEK;

/// One seven-day bucket of the projected series.
///
/// Field names and minor-unit integer amounts are part of the persisted JSON
/// contract consumed by presentation layers, so the serde names are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastWeek {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_label: String,
    pub income: i64,
    pub expenses: i64,
    pub projected: i64,
}

impl ForecastWeek {
    /// Net movement applied to the balance during this week.
    pub fn net(&self) -> i64 {
        self.income - self.expenses
    }

    /// Whether `date` falls inside the half-open `[week_start, week_end)` span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date < self.week_end
    }
}

/// Builds the display label for the bucket starting at `week_start`.
pub fn week_label(week_start: NaiveDate) -> String {
    format!("Week of {}", week_start.format("%d %b %Y"))
}

/// A generated 13-week forecast. At most one per user is active; superseded
/// forecasts are retired but retained for history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weeks: Vec<ForecastWeek>,
    pub generated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Forecast {
    /// Creates a fresh, not-yet-committed forecast. The store stamps the
    /// authoritative `generated_at` and flips `is_active` at commit time.
    pub fn new(user_id: Uuid, weeks: Vec<ForecastWeek>, generated_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            weeks,
            generated_at,
            is_active: false,
        }
    }

    /// The balance shown as "current cash" on the dashboard: the projected
    /// close of the first week.
    pub fn current_cash(&self) -> Option<i64> {
        self.weeks.first().map(|week| week.projected)
    }

    /// Start of the horizon this forecast covers.
    pub fn horizon_start(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|week| week.week_start)
    }

    pub fn horizon_end(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|week| week.week_end)
    }
}

/// The `week_start` of bucket `index` for a horizon anchored at `start`.
pub fn bucket_start(start: NaiveDate, index: usize) -> NaiveDate {
    start + Duration::days(index as i64 * DAYS_PER_WEEK)
}
