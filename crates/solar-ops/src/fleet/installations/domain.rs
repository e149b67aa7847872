use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

/// Identifier wrapper for stored installations; assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationId(pub String);

/// The 25 administrative districts an installation can be located in. The
/// wire names are fixed; clients filter and search against them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum District {
    Ampara,
    Anuradhapura,
    Badulla,
    Batticaloa,
    Colombo,
    Galle,
    Gampaha,
    Hambantota,
    Jaffna,
    Kalutara,
    Kandy,
    Kegalle,
    Kilinochchi,
    Kurunegala,
    Mannar,
    Matale,
    Matara,
    Monaragala,
    Mullaitivu,
    #[serde(rename = "Nuwara Eliya")]
    NuwaraEliya,
    Polonnaruwa,
    Puttalam,
    Ratnapura,
    Trincomalee,
    Vavuniya,
}

impl District {
    pub const fn ordered() -> [Self; 25] {
        [
            Self::Ampara,
            Self::Anuradhapura,
            Self::Badulla,
            Self::Batticaloa,
            Self::Colombo,
            Self::Galle,
            Self::Gampaha,
            Self::Hambantota,
            Self::Jaffna,
            Self::Kalutara,
            Self::Kandy,
            Self::Kegalle,
            Self::Kilinochchi,
            Self::Kurunegala,
            Self::Mannar,
            Self::Matale,
            Self::Matara,
            Self::Monaragala,
            Self::Mullaitivu,
            Self::NuwaraEliya,
            Self::Polonnaruwa,
            Self::Puttalam,
            Self::Ratnapura,
            Self::Trincomalee,
            Self::Vavuniya,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ampara => "Ampara",
            Self::Anuradhapura => "Anuradhapura",
            Self::Badulla => "Badulla",
            Self::Batticaloa => "Batticaloa",
            Self::Colombo => "Colombo",
            Self::Galle => "Galle",
            Self::Gampaha => "Gampaha",
            Self::Hambantota => "Hambantota",
            Self::Jaffna => "Jaffna",
            Self::Kalutara => "Kalutara",
            Self::Kandy => "Kandy",
            Self::Kegalle => "Kegalle",
            Self::Kilinochchi => "Kilinochchi",
            Self::Kurunegala => "Kurunegala",
            Self::Mannar => "Mannar",
            Self::Matale => "Matale",
            Self::Matara => "Matara",
            Self::Monaragala => "Monaragala",
            Self::Mullaitivu => "Mullaitivu",
            Self::NuwaraEliya => "Nuwara Eliya",
            Self::Polonnaruwa => "Polonnaruwa",
            Self::Puttalam => "Puttalam",
            Self::Ratnapura => "Ratnapura",
            Self::Trincomalee => "Trincomalee",
            Self::Vavuniya => "Vavuniya",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|district| district.name() == trimmed)
    }
}

/// Supported inverter manufacturers; anything else is recorded as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InverterModel {
    Huawei,
    Solis,
    Other,
}

impl InverterModel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Huawei => "Huawei",
            Self::Solis => "Solis",
            Self::Other => "Other",
        }
    }
}

/// Unit the system capacity was recorded in. Values are NOT normalized
/// between units anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityUnit {
    #[serde(rename = "kW")]
    Kilowatt,
    #[serde(rename = "MW")]
    Megawatt,
}

impl CapacityUnit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kilowatt => "kW",
            Self::Megawatt => "MW",
        }
    }
}

impl Default for CapacityUnit {
    fn default() -> Self {
        Self::Kilowatt
    }
}

/// Rated output of the installed system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemCapacity {
    pub value: f64,
    #[serde(default)]
    pub unit: CapacityUnit,
}

impl SystemCapacity {
    /// Display form, e.g. `5kW`.
    pub fn formatted(&self) -> String {
        format!("{}{}", self.value, self.unit.label())
    }
}

/// Where the system is installed: a fixed district plus an optional street
/// address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub district: District,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Display form: `address, district` when an address is on record,
    /// otherwise just the district name.
    pub fn full(&self) -> String {
        match &self.address {
            Some(address) => format!("{}, {}", address, self.district.name()),
            None => self.district.name().to_string(),
        }
    }
}

/// A validated installation record. The persisted shape is minimal; the
/// next-service date and urgency classification are derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub customer_name: String,
    pub system_capacity: SystemCapacity,
    pub inverter_model: InverterModel,
    pub location: Location,
    pub installation_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Write payload for create and update requests. Every field is optional so
/// validation can report missing fields as data instead of rejecting the
/// payload at deserialization. Updates are full-record: an absent
/// `lastServiceDate` clears any stored service date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationDraft {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub system_capacity: Option<SystemCapacity>,
    #[serde(default)]
    pub inverter_model: Option<InverterModel>,
    #[serde(default)]
    pub location: Option<LocationDraft>,
    #[serde(default)]
    pub installation_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Location portion of a draft; the district may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    #[serde(default)]
    pub district: Option<District>,
    #[serde(default)]
    pub address: Option<String>,
}

impl InstallationDraft {
    /// Draft pre-filled from a stored record, for edit round-trips.
    pub fn from_record(record: &Installation) -> Self {
        Self {
            customer_name: Some(record.customer_name.clone()),
            system_capacity: Some(record.system_capacity),
            inverter_model: Some(record.inverter_model),
            location: Some(LocationDraft {
                district: Some(record.location.district),
                address: record.location.address.clone(),
            }),
            installation_date: Some(record.installation_date),
            last_service_date: record.last_service_date,
            note: record.note.clone(),
        }
    }
}
