//! Credential record types.
//!
//! A [`PartialCredentialRecord`] is what upstream extraction produces: any
//! subset of the canonical fields, raw and possibly malformed. A
//! [`CredentialRecord`] is the sanitized form: every field populated, in
//! canonical wire format, ready for [`crate::credential::encode`].

use serde::{Deserialize, Serialize};

/// A possibly-incomplete credential record. Absent fields are defaulted by
/// [`crate::credential::sanitize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCredentialRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub issuer_id: Option<String>,
}

/// A fully-populated credential record in canonical wire format.
///
/// Constructed by [`crate::credential::sanitize`]; no field is ever empty
/// of a defined value (though some, like `address`, may canonically be the
/// empty string).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub document_number: String,
    /// Unseparated `YYYYMMDD`.
    pub issue_date: String,
    /// Unseparated `YYYYMMDD`.
    pub expiry_date: String,
    /// Unseparated `YYYYMMDD`.
    pub birth_date: String,
    /// `"1"` (male) or `"2"` (female).
    pub sex: String,
    /// Digits only, at most 3.
    pub height: String,
    /// Digits only, at most 3.
    pub weight: String,
    /// 3-letter AAMVA code, e.g. `BRO`.
    pub eye_color: String,
    /// 3-letter AAMVA code, e.g. `BLK`.
    pub hair_color: String,
    pub discriminator: String,
    /// Issuer Identification Number.
    pub issuer_id: String,
}

impl From<&CredentialRecord> for PartialCredentialRecord {
    /// Wrap every sanitized field back into a partial record. Used to
    /// re-feed sanitizer output into the sanitizer (idempotence checks,
    /// incremental edits from the session).
    fn from(r: &CredentialRecord) -> Self {
        Self {
            first_name: Some(r.first_name.clone()),
            middle_name: Some(r.middle_name.clone()),
            last_name: Some(r.last_name.clone()),
            address: Some(r.address.clone()),
            city: Some(r.city.clone()),
            state: Some(r.state.clone()),
            zip_code: Some(r.zip_code.clone()),
            document_number: Some(r.document_number.clone()),
            issue_date: Some(r.issue_date.clone()),
            expiry_date: Some(r.expiry_date.clone()),
            birth_date: Some(r.birth_date.clone()),
            sex: Some(r.sex.clone()),
            height: Some(r.height.clone()),
            weight: Some(r.weight.clone()),
            eye_color: Some(r.eye_color.clone()),
            hair_color: Some(r.hair_color.clone()),
            discriminator: Some(r.discriminator.clone()),
            issuer_id: Some(r.issuer_id.clone()),
        }
    }
}
