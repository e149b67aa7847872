use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Installation, InstallationDraft, Location};

pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_NOTE_LEN: usize = 500;

/// Validation failures keyed by the wire name of the offending field. An
/// empty map means the draft is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn put(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

/// Evaluates every rule independently and reports all failures at once; no
/// rule short-circuits another.
pub fn field_errors(draft: &InstallationDraft, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::default();

    match draft.customer_name.as_deref().map(str::trim) {
        None | Some("") => errors.put("customerName", "Customer name is required"),
        Some(name) if name.chars().count() > MAX_CUSTOMER_NAME_LEN => errors.put(
            "customerName",
            "Customer name cannot exceed 100 characters",
        ),
        Some(_) => {}
    }

    match draft.system_capacity {
        Some(capacity) if capacity.value > 0.0 => {}
        _ => errors.put(
            "systemCapacity",
            "System capacity is required and must be greater than 0",
        ),
    }

    if draft.inverter_model.is_none() {
        errors.put("inverterModel", "Inverter model is required");
    }

    let location = draft.location.as_ref();
    if location.and_then(|location| location.district).is_none() {
        errors.put("location", "District is required");
    }
    if let Some(address) = location.and_then(|location| location.address.as_deref()) {
        if address.trim().chars().count() > MAX_ADDRESS_LEN {
            errors.put("location.address", "Address cannot exceed 200 characters");
        }
    }

    match draft.installation_date {
        None => errors.put("installationDate", "Installation date is required"),
        Some(installed) if installed > today => {
            errors.put("installationDate", "Installation date cannot be in the future")
        }
        Some(_) => {}
    }

    // Both service-date rules target the same field key; when both fail the
    // later not-in-future message replaces the ordering message. Known
    // policy, kept as-is.
    if let (Some(last_service), Some(installed)) =
        (draft.last_service_date, draft.installation_date)
    {
        if last_service < installed {
            errors.put(
                "lastServiceDate",
                "Last service date cannot be before installation date",
            );
        }
        if last_service > today {
            errors.put(
                "lastServiceDate",
                "Last service date cannot be in the future",
            );
        }
    }

    if let Some(note) = draft.note.as_deref() {
        if note.trim().chars().count() > MAX_NOTE_LEN {
            errors.put("note", "Note cannot exceed 500 characters");
        }
    }

    errors
}

/// Resolves a draft into a well-formed record once every rule passes,
/// trimming the free-text fields the way the storage schema used to.
pub fn validate(
    draft: &InstallationDraft,
    today: NaiveDate,
) -> Result<Installation, FieldErrors> {
    let errors = field_errors(draft, today);
    if !errors.is_empty() {
        return Err(errors);
    }

    let district = draft.location.as_ref().and_then(|location| location.district);
    let address = draft
        .location
        .as_ref()
        .and_then(|location| location.address.as_deref())
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string);
    let note = draft
        .note
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty())
        .map(str::to_string);

    match (
        draft.customer_name.as_deref(),
        draft.system_capacity,
        draft.inverter_model,
        district,
        draft.installation_date,
    ) {
        (Some(name), Some(capacity), Some(inverter), Some(district), Some(installed)) => {
            Ok(Installation {
                customer_name: name.trim().to_string(),
                system_capacity: capacity,
                inverter_model: inverter,
                location: Location { district, address },
                installation_date: installed,
                last_service_date: draft.last_service_date,
                note,
            })
        }
        // Presence failures were already recorded by `field_errors`.
        _ => Err(errors),
    }
}
