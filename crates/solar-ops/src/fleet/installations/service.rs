use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{InstallationDraft, InstallationId};
use super::query::{build_query, page_info, FilterRequest, PageInfo};
use super::repository::{
    InstallationRepository, InstallationView, RepositoryError, StoredInstallation,
};
use super::stats::{self, PortfolioStats};
use super::validation::{validate, FieldErrors};

/// Service facade gating every write through validation and annotating reads
/// with the derived schedule fields. Stateless between calls; `today` is an
/// explicit parameter throughout.
pub struct InstallationService<R> {
    repository: Arc<R>,
}

/// One page of annotated installations plus its pagination envelope.
#[derive(Debug, Clone, Serialize)]
pub struct InstallationPage {
    pub data: Vec<InstallationView>,
    pub pagination: PageInfo,
}

impl<R> InstallationService<R>
where
    R: InstallationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list(
        &self,
        filter: &FilterRequest,
        today: NaiveDate,
    ) -> Result<InstallationPage, InstallationServiceError> {
        let query = build_query(filter);
        let (records, total) = self.repository.find_many(&query)?;
        let data = records.iter().map(|record| record.view(today)).collect();

        Ok(InstallationPage {
            data,
            pagination: page_info(total, &query.page),
        })
    }

    pub fn get(
        &self,
        id: &InstallationId,
        today: NaiveDate,
    ) -> Result<InstallationView, InstallationServiceError> {
        let record = self
            .repository
            .find_by_id(id)?
            .ok_or(InstallationServiceError::NotFound)?;
        Ok(record.view(today))
    }

    pub fn create(
        &self,
        draft: &InstallationDraft,
        today: NaiveDate,
    ) -> Result<StoredInstallation, InstallationServiceError> {
        let record = validate(draft, today).map_err(InstallationServiceError::Validation)?;
        Ok(self.repository.insert(record)?)
    }

    /// Full-record update; a draft without `lastServiceDate` clears any
    /// stored service date.
    pub fn update(
        &self,
        id: &InstallationId,
        draft: &InstallationDraft,
        today: NaiveDate,
    ) -> Result<StoredInstallation, InstallationServiceError> {
        let record = validate(draft, today).map_err(InstallationServiceError::Validation)?;
        self.repository
            .update_by_id(id, record)?
            .ok_or(InstallationServiceError::NotFound)
    }

    pub fn remove(
        &self,
        id: &InstallationId,
    ) -> Result<StoredInstallation, InstallationServiceError> {
        self.repository
            .delete_by_id(id)?
            .ok_or(InstallationServiceError::NotFound)
    }

    /// Portfolio overview over the full record set. Issued as separate
    /// count, aggregate, and scan calls, so the snapshot is eventually
    /// consistent with respect to concurrent writes.
    pub fn overview(
        &self,
        today: NaiveDate,
    ) -> Result<PortfolioStats, InstallationServiceError> {
        let total_installations = self.repository.count_all()?;
        let totals = self.repository.capacity_totals()?;
        let records = self.repository.all()?;

        Ok(PortfolioStats {
            total_installations,
            total_capacity: totals.sum,
            average_capacity: totals.average,
            serviced_installations: stats::serviced_count(
                records.iter().map(|stored| &stored.record),
            ),
            upcoming_services: stats::upcoming_service_count(
                records.iter().map(|stored| &stored.record),
                today,
            ),
        })
    }
}

/// Error raised by the installation service. Every variant is recoverable
/// data for the caller; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum InstallationServiceError {
    #[error("invalid installation payload")]
    Validation(FieldErrors),
    #[error("installation not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
