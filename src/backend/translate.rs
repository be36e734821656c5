//! Translation of Consul health records into the seal-status map.
//!
//! # Rules
//! - Records for other services are ignored
//! - Within a record only the first check for the service counts
//! - Records without such a check contribute nothing
//! - `passing` → unsealed, every other status → sealed
//! - Two records mapping to one endpoint poison the whole payload; scanning
//!   continues so every duplicate gets logged

use std::collections::btree_map::Entry;

use crate::backend::types::{BackendError, BackendResult, HealthRecord, SealState, StatusMap};

/// Decode a raw Consul response and translate it.
pub fn translate(body: &[u8], service: &str) -> BackendResult<StatusMap> {
    // A `null` body decodes to no records.
    let records: Option<Vec<HealthRecord>> = serde_json::from_slice(body)?;
    translate_records(&records.unwrap_or_default(), service)
}

/// Translate already-decoded health records.
pub fn translate_records(records: &[HealthRecord], service: &str) -> BackendResult<StatusMap> {
    let mut statuses = StatusMap::new();
    let mut corrupt = false;

    for record in records {
        if record.service.name != service {
            tracing::debug!(service = %record.service.name, "Skipping consul-reported service");
            continue;
        }

        let endpoint = record.service.endpoint();
        tracing::debug!(service = %record.service.name, endpoint = %endpoint, "Inspecting consul-reported service");

        let Some(check) = record.checks.iter().find(|c| c.service_name == service) else {
            continue;
        };
        tracing::debug!(endpoint = %endpoint, status = %check.status, "Found service check");

        match statuses.entry(endpoint) {
            Entry::Occupied(entry) => {
                tracing::error!(
                    endpoint = %entry.key(),
                    service = %service,
                    "Duplicate service record found in consul"
                );
                corrupt = true;
            }
            Entry::Vacant(entry) => {
                entry.insert(SealState::from_check_status(&check.status));
            }
        }
    }

    if corrupt {
        return Err(BackendError::DataCorrupted);
    }
    Ok(statuses)
}
