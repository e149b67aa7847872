//! Solar fleet tracking: installation records with their recurring service
//! schedule, and CSV-based fleet import for seeding and offline reporting.

pub mod import;
pub mod installations;

pub use import::{FleetCsvImporter, FleetImportError};
