use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::fleet::installations::domain::{
    CapacityUnit, District, Installation, InstallationDraft, InstallationId, InverterModel,
    LocationDraft, SystemCapacity,
};
use crate::fleet::installations::query::InstallationQuery;
use crate::fleet::installations::repository::{
    InstallationRepository, RepositoryError, StoredInstallation,
};
use crate::fleet::installations::service::InstallationService;
use crate::fleet::installations::stats::CapacityTotals;
use crate::fleet::installations::{installation_router, validate};

pub(super) fn reporting_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 20).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn draft() -> InstallationDraft {
    InstallationDraft {
        customer_name: Some("Nimal Perera".to_string()),
        system_capacity: Some(SystemCapacity {
            value: 5.0,
            unit: CapacityUnit::Kilowatt,
        }),
        inverter_model: Some(InverterModel::Huawei),
        location: Some(LocationDraft {
            district: Some(District::Colombo),
            address: Some("12 Temple Road".to_string()),
        }),
        installation_date: Some(date(2024, 1, 15)),
        last_service_date: None,
        note: None,
    }
}

pub(super) fn draft_for(
    name: &str,
    capacity: f64,
    district: District,
    installed: NaiveDate,
    last_serviced: Option<NaiveDate>,
) -> InstallationDraft {
    InstallationDraft {
        customer_name: Some(name.to_string()),
        system_capacity: Some(SystemCapacity {
            value: capacity,
            unit: CapacityUnit::Kilowatt,
        }),
        inverter_model: Some(InverterModel::Solis),
        location: Some(LocationDraft {
            district: Some(district),
            address: None,
        }),
        installation_date: Some(installed),
        last_service_date: last_serviced,
        note: None,
    }
}

pub(super) fn record_for(
    name: &str,
    capacity: f64,
    district: District,
    installed: NaiveDate,
    last_serviced: Option<NaiveDate>,
) -> Installation {
    validate(
        &draft_for(name, capacity, district, installed, last_serviced),
        reporting_date(),
    )
    .expect("fixture draft validates")
}

pub(super) fn build_service() -> (
    InstallationService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = InstallationService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(
    service: InstallationService<MemoryRepository>,
) -> axum::Router {
    installation_router(Arc::new(service))
}

/// In-memory repository; insertion order stands in for creation time, so
/// `find_many` walks the records newest-first.
#[derive(Default)]
pub(super) struct MemoryRepository {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    sequence: u64,
    records: Vec<StoredInstallation>,
}

impl InstallationRepository for MemoryRepository {
    fn find_many(
        &self,
        query: &InstallationQuery,
    ) -> Result<(Vec<StoredInstallation>, u64), RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        let matching: Vec<&StoredInstallation> = guard
            .records
            .iter()
            .rev()
            .filter(|stored| query.predicate.matches(&stored.record))
            .collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.page.skip() as usize)
            .take(query.page.per_page as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    fn find_by_id(
        &self,
        id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.records.iter().find(|stored| &stored.id == id).cloned())
    }

    fn insert(&self, record: Installation) -> Result<StoredInstallation, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.sequence += 1;
        let now = Utc::now();
        let stored = StoredInstallation {
            id: InstallationId(format!("inst-{:06}", guard.sequence)),
            record,
            created_at: now,
            updated_at: now,
        };
        guard.records.push(stored.clone());
        Ok(stored)
    }

    fn update_by_id(
        &self,
        id: &InstallationId,
        record: Installation,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        match guard.records.iter_mut().find(|stored| &stored.id == id) {
            Some(stored) => {
                stored.record = record;
                stored.updated_at = Utc::now();
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_by_id(
        &self,
        id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        match guard.records.iter().position(|stored| &stored.id == id) {
            Some(index) => Ok(Some(guard.records.remove(index))),
            None => Ok(None),
        }
    }

    fn count_all(&self) -> Result<u64, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.records.len() as u64)
    }

    fn capacity_totals(&self) -> Result<CapacityTotals, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(CapacityTotals::from_values(
            guard
                .records
                .iter()
                .map(|stored| stored.record.system_capacity.value),
        ))
    }

    fn all(&self) -> Result<Vec<StoredInstallation>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.records.clone())
    }
}

/// Repository that fails every call, for surfacing storage outages.
pub(super) struct UnavailableRepository;

impl InstallationRepository for UnavailableRepository {
    fn find_many(
        &self,
        _query: &InstallationQuery,
    ) -> Result<(Vec<StoredInstallation>, u64), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_id(
        &self,
        _id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: Installation) -> Result<StoredInstallation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_by_id(
        &self,
        _id: &InstallationId,
        _record: Installation,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_by_id(
        &self,
        _id: &InstallationId,
    ) -> Result<Option<StoredInstallation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_all(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn capacity_totals(&self) -> Result<CapacityTotals, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<StoredInstallation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
