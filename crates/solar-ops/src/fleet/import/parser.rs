use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::super::installations::domain::{
    CapacityUnit, District, InstallationDraft, InverterModel, LocationDraft, SystemCapacity,
};

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<InstallationDraft>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for row in csv_reader.deserialize::<FleetRow>() {
        drafts.push(row?.into_draft());
    }

    Ok(drafts)
}

#[derive(Debug, Deserialize)]
struct FleetRow {
    #[serde(rename = "Customer Name", default, deserialize_with = "empty_string_as_none")]
    customer_name: Option<String>,
    #[serde(rename = "Capacity", default)]
    capacity: Option<f64>,
    #[serde(rename = "Unit", default, deserialize_with = "empty_string_as_none")]
    unit: Option<String>,
    #[serde(rename = "Inverter", default, deserialize_with = "empty_string_as_none")]
    inverter: Option<String>,
    #[serde(rename = "District", default, deserialize_with = "empty_string_as_none")]
    district: Option<String>,
    #[serde(rename = "Address", default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(rename = "Installed On", default, deserialize_with = "empty_string_as_none")]
    installed_on: Option<String>,
    #[serde(rename = "Last Serviced", default, deserialize_with = "empty_string_as_none")]
    last_serviced: Option<String>,
    #[serde(rename = "Note", default, deserialize_with = "empty_string_as_none")]
    note: Option<String>,
}

impl FleetRow {
    /// Lossy mapping into a draft; anything unparseable lands as a missing
    /// field so validation reports it against the right key.
    fn into_draft(self) -> InstallationDraft {
        let unit = self
            .unit
            .as_deref()
            .map(parse_unit)
            .unwrap_or_default();

        InstallationDraft {
            customer_name: self.customer_name,
            system_capacity: self
                .capacity
                .map(|value| SystemCapacity { value, unit }),
            inverter_model: self.inverter.as_deref().map(parse_inverter),
            location: Some(LocationDraft {
                district: self.district.as_deref().and_then(District::from_name),
                address: self.address,
            }),
            installation_date: self.installed_on.as_deref().and_then(parse_date),
            last_service_date: self.last_serviced.as_deref().and_then(parse_date),
            note: self.note,
        }
    }
}

fn parse_unit(raw: &str) -> CapacityUnit {
    if raw.trim().eq_ignore_ascii_case("mw") {
        CapacityUnit::Megawatt
    } else {
        CapacityUnit::Kilowatt
    }
}

fn parse_inverter(raw: &str) -> InverterModel {
    match raw.trim().to_ascii_lowercase().as_str() {
        "huawei" => InverterModel::Huawei,
        "solis" => InverterModel::Solis,
        _ => InverterModel::Other,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
