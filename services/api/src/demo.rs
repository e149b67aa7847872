use crate::infra::{parse_date, InMemoryInstallationRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use solar_ops::error::AppError;
use solar_ops::fleet::import::FleetCsvImporter;
use solar_ops::fleet::installations::{
    CapacityUnit, District, FilterRequest, Installation, InstallationDraft,
    InstallationService, InstallationServiceError, InverterModel, Location, LocationDraft,
    PortfolioStats, ServiceStatus, SystemCapacity, DUE_SOON_WINDOW_DAYS,
};

#[derive(Args, Debug, Default)]
pub(crate) struct FleetReportArgs {
    /// Fleet CSV export to report on (defaults to a built-in sample fleet)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include the full per-installation listing in the output
    #[arg(long)]
    pub(crate) list_installations: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_fleet_report(args: FleetReportArgs) -> Result<(), AppError> {
    let FleetReportArgs {
        csv,
        today,
        list_installations,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let (records, imported) = match csv {
        Some(path) => (FleetCsvImporter::from_path(path, today)?, true),
        None => (sample_fleet(), false),
    };

    render_fleet_report(&records, today, imported, list_installations);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Solar ops demo");
    println!("Evaluation date: {today}");

    let repository = Arc::new(InMemoryInstallationRepository::default());
    let service = InstallationService::new(repository);

    println!("\nSeeding the sample fleet");
    let mut first_id = None;
    for record in sample_fleet() {
        let draft = InstallationDraft::from_record(&record);
        match service.create(&draft, today) {
            Ok(stored) => {
                first_id.get_or_insert(stored.id.clone());
                println!(
                    "- {} ({}) -> {}",
                    stored.record.customer_name,
                    stored.record.system_capacity.formatted(),
                    stored.id.0
                );
            }
            Err(err) => println!("- seed rejected: {err}"),
        }
    }

    println!("\nRejected intake example");
    let invalid = InstallationDraft {
        customer_name: Some("  ".to_string()),
        installation_date: today.succ_opt(),
        ..InstallationDraft::default()
    };
    match service.create(&invalid, today) {
        Ok(_) => println!("- unexpectedly accepted"),
        Err(InstallationServiceError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                println!("- {field}: {message}");
            }
        }
        Err(err) => println!("- service unavailable: {err}"),
    }

    println!("\nListing Colombo installations");
    let filter = FilterRequest {
        district: Some("Colombo".to_string()),
        ..FilterRequest::default()
    };
    match service.list(&filter, today) {
        Ok(page) => {
            for view in &page.data {
                println!(
                    "- {} | {} | {} | {}",
                    view.customer_name,
                    view.formatted_capacity,
                    view.full_location,
                    view.service_status.message
                );
            }
            println!(
                "  page {} of {} ({} total)",
                page.pagination.current, page.pagination.pages, page.pagination.total
            );
        }
        Err(err) => println!("- listing unavailable: {err}"),
    }

    if let Some(id) = first_id {
        println!("\nRecording a service visit for {}", id.0);
        match service.get(&id, today) {
            Ok(view) => {
                let revised = InstallationDraft {
                    customer_name: Some(view.customer_name.clone()),
                    system_capacity: Some(view.system_capacity),
                    inverter_model: Some(view.inverter_model),
                    location: Some(LocationDraft {
                        district: Some(view.location.district),
                        address: view.location.address.clone(),
                    }),
                    installation_date: Some(view.installation_date),
                    last_service_date: Some(today),
                    note: view.note.clone(),
                };

                match service.update(&id, &revised, today) {
                    Ok(updated) => {
                        let refreshed = updated.view(today);
                        println!(
                            "- next visit {} ({})",
                            refreshed
                                .next_service_date
                                .map(|date| date.to_string())
                                .unwrap_or_else(|| "unknown".to_string()),
                            refreshed.service_status.message
                        );
                        match serde_json::to_string_pretty(&refreshed) {
                            Ok(json) => println!("  Public record payload:\n{json}"),
                            Err(err) => println!("  payload unavailable: {err}"),
                        }
                    }
                    Err(err) => println!("- update rejected: {err}"),
                }
            }
            Err(err) => println!("- record unavailable: {err}"),
        }
    }

    println!("\nPortfolio overview");
    match service.overview(today) {
        Ok(overview) => render_overview(&overview),
        Err(err) => println!("- stats unavailable: {err}"),
    }

    Ok(())
}

fn render_fleet_report(
    records: &[Installation],
    today: NaiveDate,
    imported: bool,
    list_installations: bool,
) {
    println!("Fleet maintenance report");
    println!("Evaluated {today}");

    if imported {
        println!("Data source: fleet CSV import");
    } else {
        println!("Data source: built-in sample fleet (no CSV provided)");
    }

    let overview = PortfolioStats::from_records(records, today);
    println!();
    render_overview(&overview);

    let mut overdue = Vec::new();
    let mut due_soon = Vec::new();
    let mut current = 0usize;
    for record in records {
        match ServiceStatus::classify(record.next_service_date(), today) {
            ServiceStatus::Overdue { days_overdue } => overdue.push((days_overdue, record)),
            ServiceStatus::DueSoon { days_until } => due_soon.push((days_until, record)),
            _ => current += 1,
        }
    }
    overdue.sort_by(|a, b| b.0.cmp(&a.0));
    due_soon.sort_by(|a, b| a.0.cmp(&b.0));

    println!("\nStatus breakdown");
    println!("- overdue: {}", overdue.len());
    println!("- due soon: {}", due_soon.len());
    println!("- current: {current}");

    if overdue.is_empty() {
        println!("\nOverdue visits: none");
    } else {
        println!("\nOverdue visits");
        for (days, record) in &overdue {
            println!(
                "- {} | {} | {} days overdue",
                record.customer_name,
                record.location.full(),
                days
            );
        }
    }

    if !due_soon.is_empty() {
        println!("\nDue within {DUE_SOON_WINDOW_DAYS} days");
        for (days, record) in &due_soon {
            println!(
                "- {} | {} | due in {} days",
                record.customer_name,
                record.location.full(),
                days
            );
        }
    }

    if list_installations {
        println!("\nInstallation breakdown");
        for record in records {
            let status = ServiceStatus::classify(record.next_service_date(), today);
            let serviced = match record.last_service_date {
                Some(date) => format!("last serviced {date}"),
                None => "never serviced".to_string(),
            };
            println!(
                "- {} | {} | {} | installed {} | {} | {}",
                record.customer_name,
                record.system_capacity.formatted(),
                record.location.full(),
                record.installation_date,
                serviced,
                status.message()
            );
        }
    }
}

fn render_overview(overview: &PortfolioStats) {
    println!("Portfolio totals");
    println!("- installations: {}", overview.total_installations);
    println!(
        "- capacity: {} (avg {:.2})",
        overview.total_capacity, overview.average_capacity
    );
    println!("- serviced at least once: {}", overview.serviced_installations);
    println!(
        "- services due in the last 30 days: {}",
        overview.upcoming_services
    );
}

fn sample_fleet() -> Vec<Installation> {
    vec![
        Installation {
            customer_name: "Nimal Perera".to_string(),
            system_capacity: SystemCapacity {
                value: 5.0,
                unit: CapacityUnit::Kilowatt,
            },
            inverter_model: InverterModel::Huawei,
            location: Location {
                district: District::Colombo,
                address: Some("12 Temple Road".to_string()),
            },
            installation_date: date(2024, 1, 15),
            last_service_date: None,
            note: None,
        },
        Installation {
            customer_name: "Kamala Silva".to_string(),
            system_capacity: SystemCapacity {
                value: 10.0,
                unit: CapacityUnit::Kilowatt,
            },
            inverter_model: InverterModel::Solis,
            location: Location {
                district: District::Kandy,
                address: Some("8 Hill Street".to_string()),
            },
            installation_date: date(2023, 11, 1),
            last_service_date: Some(date(2024, 5, 2)),
            note: None,
        },
        Installation {
            customer_name: "Lanka Textiles Ltd".to_string(),
            system_capacity: SystemCapacity {
                value: 1.2,
                unit: CapacityUnit::Megawatt,
            },
            inverter_model: InverterModel::Huawei,
            location: Location {
                district: District::Gampaha,
                address: Some("Export Processing Zone".to_string()),
            },
            installation_date: date(2023, 6, 10),
            last_service_date: Some(date(2024, 6, 15)),
            note: Some("rooftop array, two inverter rooms".to_string()),
        },
        Installation {
            customer_name: "Ruwan Fernando".to_string(),
            system_capacity: SystemCapacity {
                value: 20.0,
                unit: CapacityUnit::Kilowatt,
            },
            inverter_model: InverterModel::Other,
            location: Location {
                district: District::Galle,
                address: None,
            },
            installation_date: date(2024, 3, 5),
            last_service_date: None,
            note: None,
        },
        Installation {
            customer_name: "Ceylon Grain Mills".to_string(),
            system_capacity: SystemCapacity {
                value: 40.0,
                unit: CapacityUnit::Kilowatt,
            },
            inverter_model: InverterModel::Huawei,
            location: Location {
                district: District::Kurunegala,
                address: Some("Mill Road".to_string()),
            },
            installation_date: date(2023, 9, 20),
            last_service_date: Some(date(2024, 3, 20)),
            note: None,
        },
        Installation {
            customer_name: "Sunrise Hotels".to_string(),
            system_capacity: SystemCapacity {
                value: 30.0,
                unit: CapacityUnit::Kilowatt,
            },
            inverter_model: InverterModel::Solis,
            location: Location {
                district: District::Hambantota,
                address: Some("Beach Road".to_string()),
            },
            installation_date: date(2024, 2, 28),
            last_service_date: None,
            note: Some("coastal site, check corrosion".to_string()),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
