//! CSV import for whole fleets of installations, used for seeding demo data
//! and for offline maintenance reports.

mod parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use super::installations::domain::Installation;
use super::installations::validation::{validate, FieldErrors};

/// Reads a fleet CSV export and validates every row into an installation
/// record. Expected header: `Customer Name, Capacity, Unit, Inverter,
/// District, Address, Installed On, Last Serviced, Note` (dates as
/// YYYY-MM-DD; Unit, Address, Last Serviced, and Note may be blank).
pub struct FleetCsvImporter;

impl FleetCsvImporter {
    pub fn from_path(
        path: impl AsRef<Path>,
        today: NaiveDate,
    ) -> Result<Vec<Installation>, FleetImportError> {
        let file = File::open(path)?;
        Self::from_reader(file, today)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        today: NaiveDate,
    ) -> Result<Vec<Installation>, FleetImportError> {
        let drafts = parser::parse_rows(reader)?;
        let mut records = Vec::with_capacity(drafts.len());

        for (index, draft) in drafts.iter().enumerate() {
            match validate(draft, today) {
                Ok(record) => records.push(record),
                Err(errors) => {
                    // Data rows are 1-indexed and follow the header line.
                    return Err(FleetImportError::InvalidRow {
                        row: index + 2,
                        errors,
                    });
                }
            }
        }

        Ok(records)
    }
}

#[derive(Debug)]
pub enum FleetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, errors: FieldErrors },
}

impl std::fmt::Display for FleetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetImportError::Io(err) => write!(f, "failed to read fleet export: {}", err),
            FleetImportError::Csv(err) => write!(f, "invalid fleet CSV data: {}", err),
            FleetImportError::InvalidRow { row, errors } => {
                write!(f, "fleet CSV row {} failed validation", row)?;
                for (field, message) in errors.iter() {
                    write!(f, "; {}: {}", field, message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FleetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FleetImportError::Io(err) => Some(err),
            FleetImportError::Csv(err) => Some(err),
            FleetImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for FleetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FleetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
