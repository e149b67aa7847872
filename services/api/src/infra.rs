use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use solar_ops::fleet::installations::{
    CapacityTotals, Installation, InstallationId, InstallationQuery, InstallationRepository,
    RepositoryError, StoredInstallation,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory repository backing the service. Insertion order stands in for
/// creation time, so queries walk the records newest-first.
#[derive(Default)]
pub(crate) struct InMemoryInstallationRepository {
    state: Mutex<RepositoryState>,
}

#[derive(Default)]
struct RepositoryState {
    sequence: u64,
    records: Vec<StoredInstallation>,
}

impl InstallationRepository for InMemoryInstallationRepository {
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

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
