//! Field mapper: places heuristically-labeled extracted key/value pairs
//! onto the canonical credential fields.
//!
//! Each canonical field has a fixed list of case-insensitive label
//! substrings. The **first** candidate (in input order) whose label contains
//! any accepted substring supplies the value; unmatched fields stay absent
//! and are defaulted later by the sanitizer. Synonym lists are non-overlapping
//! by convention only - an ambiguous label may satisfy several fields, which
//! is accepted behavior.

use serde::{Deserialize, Serialize};

use super::record::PartialCredentialRecord;

/// A labeled value produced by an external recognition process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidate {
    pub label: String,
    pub value: String,
}

impl FieldCandidate {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Map extracted candidates onto a partial credential record.
///
/// The state field is never mapped from candidates; the sanitizer's default
/// supplies it when the session does not set one explicitly.
pub fn map_candidates(candidates: &[FieldCandidate]) -> PartialCredentialRecord {
    let find = |labels: &[&str]| -> Option<String> {
        candidates
            .iter()
            .find(|c| {
                let label = c.label.to_uppercase();
                labels.iter().any(|l| label.contains(l))
            })
            .map(|c| c.value.clone())
    };

    PartialCredentialRecord {
        first_name: find(&["FN", "FIRST"]),
        last_name: find(&["LN", "SURNAME", "LAST"]),
        address: find(&["ADD", "RESIDENCE"]),
        city: find(&["CITY"]),
        zip_code: find(&["ZIP"]),
        document_number: find(&["DL", "LIC", "NO"]),
        birth_date: find(&["DOB", "BIRTH"]),
        expiry_date: find(&["EXP"]),
        issue_date: find(&["ISS"]),
        sex: find(&["SEX"]),
        height: find(&["HGT", "HGI"]),
        weight: find(&["WGT"]),
        eye_color: find(&["EYE"]),
        hair_color: find(&["HAIR"]),
        ..Default::default()
    }
}
