use chrono::{Months, NaiveDate};
use serde::Serialize;

use super::domain::Installation;

/// Calendar months between scheduled service visits.
pub const SERVICE_INTERVAL_MONTHS: u32 = 6;

/// Forward-looking window, in days, inside which a pending visit counts as
/// due soon rather than merely current.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

/// Next scheduled visit: six calendar months after the most recent service,
/// or after installation when the system has never been serviced.
///
/// Calendar-month arithmetic, not a fixed day offset. When the base date's
/// day does not exist in the target month, chrono clamps to the last valid
/// day (2024-08-31 + 6 months = 2025-02-28). `None` only when the offset
/// leaves chrono's representable range.
pub fn next_service_date(
    installation_date: NaiveDate,
    last_service_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let base = last_service_date.unwrap_or(installation_date);
    base.checked_add_months(Months::new(SERVICE_INTERVAL_MONTHS))
}

impl Installation {
    pub fn next_service_date(&self) -> Option<NaiveDate> {
        next_service_date(self.installation_date, self.last_service_date)
    }
}

/// Urgency classification of a scheduled visit relative to an explicit
/// evaluation date. Deterministic: callers supply `today`, the engine never
/// reads a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Overdue { days_overdue: i64 },
    DueSoon { days_until: i64 },
    Current { days_until: i64 },
    Unknown,
}

impl ServiceStatus {
    pub fn classify(next_service: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(next) = next_service else {
            return Self::Unknown;
        };

        let days_until = next.signed_duration_since(today).num_days();
        if days_until < 0 {
            Self::Overdue {
                days_overdue: -days_until,
            }
        } else if days_until <= DUE_SOON_WINDOW_DAYS {
            Self::DueSoon { days_until }
        } else {
            Self::Current { days_until }
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Overdue { .. } => "overdue",
            Self::DueSoon { .. } => "due-soon",
            Self::Current { .. } => "current",
            Self::Unknown => "unknown",
        }
    }

    pub const fn severity(&self) -> StatusSeverity {
        match self {
            Self::Overdue { .. } => StatusSeverity::Danger,
            Self::DueSoon { .. } => StatusSeverity::Warning,
            Self::Current { .. } => StatusSeverity::Success,
            Self::Unknown => StatusSeverity::Neutral,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Overdue { days_overdue } => format!("Overdue by {days_overdue} days"),
            Self::DueSoon { days_until } | Self::Current { days_until } => {
                format!("Due in {days_until} days")
            }
            Self::Unknown => "Unknown".to_string(),
        }
    }

    pub fn view(&self) -> ServiceStatusView {
        ServiceStatusView {
            status: self.label(),
            severity: self.severity().label(),
            message: self.message(),
        }
    }
}

/// Display severity attached to each classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSeverity {
    Danger,
    Warning,
    Success,
    Neutral,
}

impl StatusSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Neutral => "neutral",
        }
    }
}

/// Serialized form of a classification for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatusView {
    pub status: &'static str,
    pub severity: &'static str,
    pub message: String,
}
