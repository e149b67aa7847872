//! Integration specifications for the installation tracking and service
//! scheduling workflow, exercised through the public service facade and the
//! HTTP router without reaching into private modules.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, Utc};

    use solar_ops::fleet::installations::{
        CapacityTotals, CapacityUnit, District, Installation, InstallationDraft, InstallationId,
        InstallationQuery, InstallationRepository, InstallationService, InverterModel,
        LocationDraft, RepositoryError, StoredInstallation, SystemCapacity,
    };

    pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    pub(super) fn draft(
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
            inverter_model: Some(InverterModel::Huawei),
            location: Some(LocationDraft {
                district: Some(district),
                address: Some("12 Temple Road".to_string()),
            }),
            installation_date: Some(installed),
            last_service_date: last_serviced,
            note: Some("annual maintenance contract".to_string()),
        }
    }

    pub(super) fn build_service() -> (
        InstallationService<MemoryRepository>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let service = InstallationService::new(repository.clone());
        (service, repository)
    }

    /// In-memory repository; insertion order stands in for creation time.
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
}

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use tower::ServiceExt;

use solar_ops::fleet::installations::{
    installation_router, District, FilterRequest, InstallationDraft,
};

#[test]
fn created_records_round_trip_by_id() {
    let (service, _) = build_service();
    let today = date(2024, 7, 20);

    let payload = draft(
        "Nimal Perera",
        5.0,
        District::Colombo,
        date(2024, 1, 15),
        None,
    );
    let stored = service.create(&payload, today).expect("draft is valid");

    let view = service.get(&stored.id, today).expect("record readable");
    assert_eq!(view.id, stored.id);
    assert_eq!(view.customer_name, "Nimal Perera");
    assert_eq!(view.system_capacity.value, 5.0);
    assert_eq!(view.location.district, District::Colombo);
    assert_eq!(view.installation_date, date(2024, 1, 15));
    assert_eq!(view.last_service_date, None);
    assert_eq!(view.note.as_deref(), Some("annual maintenance contract"));
    assert_eq!(view.created_at, stored.created_at);
}

#[test]
fn unserviced_installation_goes_overdue_after_six_months() {
    let (service, _) = build_service();
    let today = date(2024, 7, 20);

    let stored = service
        .create(
            &draft("Nimal Perera", 5.0, District::Colombo, date(2024, 1, 15), None),
            today,
        )
        .expect("draft is valid");

    let view = service.get(&stored.id, today).expect("record readable");
    assert_eq!(view.next_service_date, Some(date(2024, 7, 15)));
    assert_eq!(view.service_status.status, "overdue");
    assert_eq!(view.service_status.severity, "danger");
    assert_eq!(view.service_status.message, "Overdue by 5 days");
}

#[test]
fn serviced_installation_counts_from_the_service_visit() {
    let (service, _) = build_service();
    let today = date(2024, 7, 25);

    let stored = service
        .create(
            &draft(
                "Kamala Silva",
                10.0,
                District::Kandy,
                date(2024, 1, 1),
                Some(date(2024, 2, 1)),
            ),
            today,
        )
        .expect("draft is valid");

    let view = service.get(&stored.id, today).expect("record readable");
    assert_eq!(view.next_service_date, Some(date(2024, 8, 1)));
    assert_eq!(view.service_status.status, "due-soon");
    assert_eq!(view.service_status.severity, "warning");
    assert_eq!(view.service_status.message, "Due in 7 days");
}

#[test]
fn recording_a_service_visit_pushes_the_schedule_out() {
    let (service, _) = build_service();
    let today = date(2024, 7, 20);

    let stored = service
        .create(
            &draft("Nimal Perera", 5.0, District::Colombo, date(2024, 1, 15), None),
            today,
        )
        .expect("draft is valid");

    let revised = draft(
        "Nimal Perera",
        5.0,
        District::Colombo,
        date(2024, 1, 15),
        Some(date(2024, 7, 18)),
    );
    service
        .update(&stored.id, &revised, today)
        .expect("update succeeds");

    let view = service.get(&stored.id, today).expect("record readable");
    assert_eq!(view.next_service_date, Some(date(2025, 1, 18)));
    assert_eq!(view.service_status.status, "current");
}

#[test]
fn portfolio_overview_matches_the_seeded_fleet() {
    let (service, _) = build_service();
    let today = date(2024, 7, 20);

    let seeds = [
        ("A", 5.0, date(2024, 1, 15), None),
        ("B", 10.0, date(2024, 1, 1), Some(date(2024, 1, 10))),
        ("C", 20.0, date(2024, 3, 1), Some(date(2024, 6, 1))),
    ];
    for (name, capacity, installed, last_serviced) in seeds {
        service
            .create(
                &draft(name, capacity, District::Galle, installed, last_serviced),
                today,
            )
            .expect("draft is valid");
    }

    let overview = service.overview(today).expect("stats compute");
    assert_eq!(overview.total_installations, 3);
    assert_eq!(overview.total_capacity, 35.0);
    assert!((overview.average_capacity - 35.0 / 3.0).abs() < 1e-9);
    assert_eq!(overview.serviced_installations, 2);
    // A's next visit (2024-07-15) and B's (2024-07-10) fall inside the
    // 30-day catch-up window; C's is due in December.
    assert_eq!(overview.upcoming_services, 2);
}

#[test]
fn listing_paginates_newest_first() {
    let (service, _) = build_service();
    let today = date(2024, 7, 20);

    for index in 0..5 {
        service
            .create(
                &draft(
                    &format!("Customer {index}"),
                    5.0,
                    District::Matara,
                    date(2024, 1, 15),
                    None,
                ),
                today,
            )
            .expect("draft is valid");
    }

    let filter = FilterRequest {
        page: Some(2),
        limit: Some(2),
        ..FilterRequest::default()
    };
    let page = service.list(&filter, today).expect("listing succeeds");

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].customer_name, "Customer 2");
    assert_eq!(page.data[1].customer_name, "Customer 1");
    assert_eq!(page.pagination.current, 2);
    assert_eq!(page.pagination.pages, 3);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn http_flow_covers_create_list_and_stats() {
    let (service, _) = build_service();
    let router = installation_router(Arc::new(service));

    let payload = draft(
        "Nimal Perera",
        5.0,
        District::Colombo,
        date(2024, 1, 15),
        None,
    );
    let created = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/installations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/installations?search=perera")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(listed.status(), StatusCode::OK);
    let body = read_body(listed).await;
    assert_eq!(body.pointer("/pagination/total"), Some(&json!(1)));

    let stats = router
        .oneshot(
            axum::http::Request::get("/api/v1/installations/stats/overview")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(stats.status(), StatusCode::OK);
    let body = read_body(stats).await;
    assert_eq!(body.pointer("/data/totalInstallations"), Some(&json!(1)));
}

#[tokio::test]
async fn http_rejects_invalid_payloads_with_field_errors() {
    let (service, _) = build_service();
    let router = installation_router(Arc::new(service));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/installations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&InstallationDraft::default()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_body(response).await;
    assert_eq!(body.get("success"), Some(&json!(false)));
    assert_eq!(
        body.pointer("/errors/customerName"),
        Some(&json!("Customer name is required"))
    );
}

async fn read_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}
