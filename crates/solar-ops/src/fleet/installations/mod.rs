//! Installation records, their recurring service schedule, and the query,
//! validation, and reporting machinery around them.

pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod stats;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    CapacityUnit, District, Installation, InstallationDraft, InstallationId, InverterModel,
    Location, LocationDraft, SystemCapacity,
};
pub use query::{
    build_query, page_info, FilterRequest, InstallationPredicate, InstallationQuery, PageInfo,
    PageRequest, DEFAULT_PAGE_SIZE, FILTER_ALL,
};
pub use repository::{
    InstallationRepository, InstallationView, RepositoryError, StoredInstallation,
};
pub use router::installation_router;
pub use schedule::{
    next_service_date, ServiceStatus, ServiceStatusView, StatusSeverity, DUE_SOON_WINDOW_DAYS,
    SERVICE_INTERVAL_MONTHS,
};
pub use service::{InstallationPage, InstallationService, InstallationServiceError};
pub use stats::{CapacityTotals, PortfolioStats, CATCH_UP_WINDOW_DAYS};
pub use validation::{field_errors, validate, FieldErrors};
