use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::Installation;

/// Days of the backward-looking catch-up window counted by
/// `upcoming_services`. Deliberately distinct from the forward-looking
/// due-soon window used for per-record classification.
pub const CATCH_UP_WINDOW_DAYS: i64 = 30;

/// Portfolio-wide snapshot computed over the full record set, with no
/// filters applied. A point-in-time read, not a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_installations: u64,
    /// Capacity values summed at face value; kW and MW are intentionally not
    /// normalized against each other.
    pub total_capacity: f64,
    /// Mean capacity, 0 when the portfolio is empty.
    pub average_capacity: f64,
    pub serviced_installations: u64,
    pub upcoming_services: u64,
}

impl PortfolioStats {
    pub fn from_records(records: &[Installation], today: NaiveDate) -> Self {
        let totals = CapacityTotals::from_values(
            records.iter().map(|record| record.system_capacity.value),
        );
        Self {
            total_installations: records.len() as u64,
            total_capacity: totals.sum,
            average_capacity: totals.average,
            serviced_installations: serviced_count(records.iter()),
            upcoming_services: upcoming_service_count(records.iter(), today),
        }
    }
}

/// Sum and mean of `systemCapacity.value` across a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CapacityTotals {
    pub sum: f64,
    pub average: f64,
}

impl CapacityTotals {
    pub fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut sum = 0.0;
        let mut count = 0u64;
        for value in values {
            sum += value;
            count += 1;
        }

        let average = if count == 0 { 0.0 } else { sum / count as f64 };
        Self { sum, average }
    }
}

/// Records that have at least one service visit on file.
pub fn serviced_count<'a>(records: impl Iterator<Item = &'a Installation>) -> u64 {
    records
        .filter(|record| record.last_service_date.is_some())
        .count() as u64
}

/// Services that came due within the last 30 days up to `today`, both ends
/// inclusive. A catch-up count over recently missed due dates, not a
/// forecast.
pub fn upcoming_service_count<'a>(
    records: impl Iterator<Item = &'a Installation>,
    today: NaiveDate,
) -> u64 {
    let window_start = today - Duration::days(CATCH_UP_WINDOW_DAYS);
    records
        .filter(|record| {
            matches!(
                record.next_service_date(),
                Some(next) if next >= window_start && next <= today
            )
        })
        .count() as u64
}
