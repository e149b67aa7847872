use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{
    Installation, InstallationId, InverterModel, Location, SystemCapacity,
};
use super::query::InstallationQuery;
use super::schedule::{ServiceStatus, ServiceStatusView};
use super::stats::CapacityTotals;

/// Repository record: the validated installation plus storage-assigned
/// identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredInstallation {
    pub id: InstallationId,
    pub record: Installation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredInstallation {
    /// Read model with the derived schedule fields computed at read time, so
    /// nothing derived is ever persisted or goes stale.
    pub fn view(&self, today: NaiveDate) -> InstallationView {
        let next_service_date = self.record.next_service_date();
        let status = ServiceStatus::classify(next_service_date, today);

        InstallationView {
            id: self.id.clone(),
            customer_name: self.record.customer_name.clone(),
            system_capacity: self.record.system_capacity,
            inverter_model: self.record.inverter_model,
            location: self.record.location.clone(),
            installation_date: self.record.installation_date,
            last_service_date: self.record.last_service_date,
            note: self.record.note.clone(),
            next_service_date,
            service_status: status.view(),
            full_location: self.record.location.full(),
            formatted_capacity: self.record.system_capacity.formatted(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serialized read model for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationView {
    pub id: InstallationId,
    pub customer_name: String,
    pub system_capacity: SystemCapacity,
    pub inverter_model: InverterModel,
    pub location: Location,
    pub installation_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_service_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_service_date: Option<NaiveDate>,
    pub service_status: ServiceStatusView,
    pub full_location: String,
    pub formatted_capacity: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so scheduling, statistics, and routing can be
/// exercised against an in-memory collaborator. All I/O lives behind this
/// trait; the core never blocks on it.
pub trait InstallationRepository: Send + Sync {
    /// Records matching the query's predicate, sorted newest-first by
    /// creation time with skip/limit applied; the second element is the
    /// total match count before pagination.
    fn find_many(
        &self,
        query: &InstallationQuery,
    ) -> Result<(Vec<StoredInstallation>, u64), RepositoryError>;

    fn find_by_id(
        &self,
        id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError>;

    fn insert(&self, record: Installation) -> Result<StoredInstallation, RepositoryError>;

    /// Full-record replacement; `None` when the id has no record.
    fn update_by_id(
        &self,
        id: &InstallationId,
        record: Installation,
    ) -> Result<Option<StoredInstallation>, RepositoryError>;

    fn delete_by_id(
        &self,
        id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError>;

    fn count_all(&self) -> Result<u64, RepositoryError>;

    fn capacity_totals(&self) -> Result<CapacityTotals, RepositoryError>;

    /// Every record, unfiltered. Statistics snapshots read the whole set.
    fn all(&self) -> Result<Vec<StoredInstallation>, RepositoryError>;
}

/// Error enumeration for repository failures. A missing id is an absent
/// result, never an error variant.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage constraint violated on {field}: {message}")]
    Constraint { field: String, message: String },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
