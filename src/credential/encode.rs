//! Credential string encoder: serializes a sanitized record into the
//! fixed-format AAMVA-style payload handed to the PDF417 renderer.
//!
//! This is a simplified subset of the real-world standard: one subfile, no
//! checksum subfields, no jurisdiction schema variance. The subfile offset
//! and length in the designator are fixed placeholder values rather than
//! computed from the body - downstream consumers do not validate them, and
//! the wire output is preserved as-is rather than corrected.

use super::record::CredentialRecord;

/// Leading compliance indicator character.
pub const COMPLIANCE_INDICATOR: char = '@';
/// Separates data elements within a subfile (LF).
pub const DATA_ELEMENT_SEPARATOR: char = '\n';
/// Separates records (RS).
pub const RECORD_SEPARATOR: char = '\x1e';
/// Terminates segments (CR).
pub const SEGMENT_TERMINATOR: char = '\r';

const FILE_TYPE: &str = "ANSI ";
const VERSION: &str = "08";
const SUBFILE_COUNT: &str = "01";
const SUBFILE_TYPE: &str = "DL";
/// Standard offset start. Fixed, not computed.
const SUBFILE_OFFSET: &str = "0041";
/// Placeholder length. Fixed, not computed.
const SUBFILE_LENGTH: &str = "0250";

/// Serialize a sanitized record into the raw payload string.
///
/// Pure and infallible: identical records always yield byte-identical
/// payloads (embedded control characters included).
pub fn encode(record: &CredentialRecord) -> String {
    let mut out = String::with_capacity(320);

    // Compliance header
    out.push(COMPLIANCE_INDICATOR);
    out.push(DATA_ELEMENT_SEPARATOR);
    out.push(RECORD_SEPARATOR);
    out.push(SEGMENT_TERMINATOR);
    out.push_str(FILE_TYPE);
    out.push_str(&record.issuer_id);
    out.push_str(VERSION);
    out.push_str(SUBFILE_COUNT);

    // Subfile designator, e.g. DL00410250DL08
    out.push_str(SUBFILE_TYPE);
    out.push_str(SUBFILE_OFFSET);
    out.push_str(SUBFILE_LENGTH);
    out.push_str(SUBFILE_TYPE);
    out.push_str(VERSION);

    // Data elements, one per line, fixed order.
    // DCA nominally carries the vehicle class; this format emits the
    // document number there (source-system quirk, preserved).
    element(&mut out, "DCA", &record.document_number);
    element(&mut out, "DCB", "NONE"); // restrictions
    element(&mut out, "DCD", "NONE"); // endorsements
    element(&mut out, "DBA", &record.expiry_date);
    element(&mut out, "DCS", &record.last_name);
    element(&mut out, "DAC", &record.first_name);
    element(&mut out, "DAD", &record.middle_name);
    element(&mut out, "DBD", &record.issue_date);
    element(&mut out, "DBB", &record.birth_date);
    element(&mut out, "DBC", &record.sex);
    element(&mut out, "DAY", &record.eye_color);
    element(&mut out, "DAU", &format!("{} IN", record.height));
    element(&mut out, "DAG", &record.address);
    element(&mut out, "DAI", &record.city);
    element(&mut out, "DAJ", &record.state);
    element(&mut out, "DAK", &record.zip_code);
    element(&mut out, "DAQ", &record.document_number);
    element(&mut out, "DAZ", &record.hair_color);
    element(&mut out, "DAW", &record.weight);
    element(&mut out, "DD", &record.discriminator);

    out
}

fn element(out: &mut String, id: &str, value: &str) {
    out.push_str(id);
    out.push_str(value);
    out.push(DATA_ELEMENT_SEPARATOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::record::PartialCredentialRecord;
    use crate::credential::sanitize;
    use pretty_assertions::assert_eq;

    fn sample_record() -> CredentialRecord {
        let mut partial = PartialCredentialRecord::default();
        partial.first_name = Some("Jane".to_string());
        partial.last_name = Some("Smith".to_string());
        partial.document_number = Some("WDL123456".to_string());
        partial.birth_date = Some("1990-01-15".to_string());
        partial.issue_date = Some("20200110".to_string());
        partial.expiry_date = Some("20280110".to_string());
        partial.sex = Some("F".to_string());
        partial.height = Some("65 in".to_string());
        partial.weight = Some("130".to_string());
        partial.address = Some("123 PINE ST".to_string());
        partial.zip_code = Some("98101".to_string());
        sanitize(&partial)
    }

    #[test]
    fn test_header_layout() {
        let payload = encode(&sample_record());
        assert!(payload.starts_with("@\n\x1e\rANSI 6360200801"));
        assert!(payload.contains("DL00410250DL08"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let record = sample_record();
        assert_eq!(encode(&record), encode(&record));
    }

    #[test]
    fn test_element_ordering_names() {
        let payload = encode(&sample_record());
        let last = payload.find("DCSSMITH").expect("last name element");
        let first = payload.find("DACJANE").expect("first name element");
        let middle = payload.find("DADNONE").expect("middle name element");
        assert!(last < first, "DCS must come before DAC");
        assert!(first < middle, "DAC must come before DAD");
    }

    #[test]
    fn test_height_suffixed_with_inches() {
        let payload = encode(&sample_record());
        assert!(payload.contains("DAU65 IN\n"));
    }

    #[test]
    fn test_document_number_in_both_dca_and_daq() {
        let payload = encode(&sample_record());
        assert!(payload.contains("DCAWDL123456\n"));
        assert!(payload.contains("DAQWDL123456\n"));
    }

    #[test]
    fn test_every_line_is_lf_terminated() {
        let payload = encode(&sample_record());
        // Body starts after the subfile designator
        let body_start = payload.find("DL00410250DL08").unwrap() + "DL00410250DL08".len();
        let body = &payload[body_start..];
        assert!(body.ends_with('\n'));
        for line in body.lines() {
            assert!(line.len() >= 2, "element line too short: {:?}", line);
        }
    }

    #[test]
    fn test_fixed_elements_present() {
        let payload = encode(&sample_record());
        assert!(payload.contains("DCBNONE\n"));
        assert!(payload.contains("DCDNONE\n"));
        assert!(payload.contains("DD00000000\n"));
    }
}
