//! Field sanitizer: normalizes raw, possibly missing or malformed field
//! values into a canonical credential record.
//!
//! Every rule is deterministic and independent per field, and every rule's
//! output is already in the form the rule itself accepts unchanged, so
//! `sanitize` is idempotent. It never fails: absence and malformed input
//! produce defaults.

use chrono::NaiveDate;

use super::record::{CredentialRecord, PartialCredentialRecord};

/// Default Issuer Identification Number (Washington State).
pub const DEFAULT_IIN: &str = "636020";

/// Substituted when a separated date fails to parse.
pub const FALLBACK_DATE: &str = "20250101";

/// Full eye color names to AAMVA 3-letter codes.
const EYE_CODES: &[(&str, &str)] = &[
    ("BLACK", "BLK"),
    ("BLUE", "BLU"),
    ("BROWN", "BRO"),
    ("GRAY", "GRY"),
    ("GREEN", "GRN"),
    ("HAZEL", "HAZ"),
    ("MAROON", "MAR"),
    ("PINK", "PNK"),
    ("DICHROMATIC", "DIC"),
];

/// Full hair color names to AAMVA 3-letter codes.
const HAIR_CODES: &[(&str, &str)] = &[
    ("BALD", "BAL"),
    ("BLACK", "BLK"),
    ("BLOND", "BLN"),
    ("BLONDE", "BLN"),
    ("BROWN", "BRO"),
    ("GRAY", "GRY"),
    ("GREY", "GRY"),
    ("RED", "RED"),
    ("SANDY", "SDY"),
    ("WHITE", "WHI"),
];

/// Normalize a partial record into a fully-populated canonical one.
pub fn sanitize(partial: &PartialCredentialRecord) -> CredentialRecord {
    CredentialRecord {
        first_name: name_or(&partial.first_name, "JOHN"),
        middle_name: name_or(&partial.middle_name, "NONE"),
        last_name: name_or(&partial.last_name, "DOE"),
        address: partial.address.clone().unwrap_or_default(),
        city: {
            let city = upper_or_empty(&partial.city);
            if city.is_empty() { "SEATTLE".to_string() } else { city }
        },
        state: fix_state(&partial.state),
        zip_code: partial.zip_code.clone().unwrap_or_default(),
        document_number: partial.document_number.clone().unwrap_or_default(),
        issue_date: fix_date(&partial.issue_date),
        expiry_date: fix_date(&partial.expiry_date),
        birth_date: fix_date(&partial.birth_date),
        sex: fix_sex(&partial.sex),
        height: digits(&partial.height),
        weight: digits(&partial.weight),
        eye_color: color_code(&partial.eye_color, EYE_CODES, "BRO"),
        hair_color: color_code(&partial.hair_color, HAIR_CODES, "BLK"),
        discriminator: {
            let d = partial.discriminator.clone().unwrap_or_default();
            if d.is_empty() { "00000000".to_string() } else { d }
        },
        issuer_id: {
            let iin = partial.issuer_id.clone().unwrap_or_default();
            if iin.is_empty() { DEFAULT_IIN.to_string() } else { iin }
        },
    }
}

fn upper_or_empty(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").to_uppercase()
}

/// Uppercase and strip everything that is not an ASCII letter; fall back to
/// `default` when nothing survives.
fn name_or(value: &Option<String>, default: &str) -> String {
    let stripped: String = upper_or_empty(value)
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if stripped.is_empty() {
        default.to_string()
    } else {
        stripped
    }
}

/// Re-emit separated dates as `YYYYMMDD`; substitute [`FALLBACK_DATE`] when a
/// separated value fails to parse; pass unseparated values through unchanged
/// (assumed already canonical).
fn fix_date(value: &Option<String>) -> String {
    let value = value.as_deref().unwrap_or("");
    if !value.contains('-') {
        return value.to_string();
    }
    for format in ["%Y-%m-%d", "%m-%d-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.format("%Y%m%d").to_string();
        }
    }
    FALLBACK_DATE.to_string()
}

fn fix_sex(value: &Option<String>) -> String {
    match upper_or_empty(value).as_str() {
        "F" | "FEMALE" => "2",
        // "M", "MALE", anything else, or absent
        _ => "1",
    }
    .to_string()
}

/// Map a full color name via the lookup table; pass unknown 3-letter tokens
/// through uppercased; everything else becomes `default`.
fn color_code(value: &Option<String>, table: &[(&str, &str)], default: &str) -> String {
    let upper = upper_or_empty(value);
    if let Some((_, code)) = table.iter().find(|(name, _)| *name == upper) {
        return code.to_string();
    }
    if upper.chars().count() == 3 {
        upper
    } else {
        default.to_string()
    }
}

/// Uppercase and force exactly 2 characters (truncating, space-padding).
fn fix_state(value: &Option<String>) -> String {
    let upper = upper_or_empty(value);
    if upper.is_empty() {
        return "WA".to_string();
    }
    let truncated: String = upper.chars().take(2).collect();
    format!("{:<2}", truncated)
}

/// Strip every non-digit character, then truncate to at most 3 digits.
fn digits(value: &Option<String>) -> String {
    value
        .as_deref()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn partial() -> PartialCredentialRecord {
        PartialCredentialRecord::default()
    }

    #[test]
    fn test_defaults_for_empty_input() {
        let record = sanitize(&partial());
        assert_eq!(record.first_name, "JOHN");
        assert_eq!(record.last_name, "DOE");
        assert_eq!(record.middle_name, "NONE");
        assert_eq!(record.city, "SEATTLE");
        assert_eq!(record.state, "WA");
        assert_eq!(record.sex, "1");
        assert_eq!(record.eye_color, "BRO");
        assert_eq!(record.hair_color, "BLK");
        assert_eq!(record.issuer_id, DEFAULT_IIN);
        assert_eq!(record.discriminator, "00000000");
        assert_eq!(record.address, "");
        assert_eq!(record.height, "");
    }

    #[test]
    fn test_date_with_separator_is_reformatted() {
        let mut p = partial();
        p.birth_date = Some("1990-01-15".to_string());
        assert_eq!(sanitize(&p).birth_date, "19900115");
    }

    #[test]
    fn test_date_without_separator_passes_through() {
        let mut p = partial();
        p.birth_date = Some("19900115".to_string());
        assert_eq!(sanitize(&p).birth_date, "19900115");
    }

    #[test]
    fn test_unparseable_separated_date_falls_back() {
        let mut p = partial();
        p.expiry_date = Some("not-a-date".to_string());
        assert_eq!(sanitize(&p).expiry_date, FALLBACK_DATE);
    }

    #[test]
    fn test_us_style_date_accepted() {
        let mut p = partial();
        p.issue_date = Some("01-15-1990".to_string());
        assert_eq!(sanitize(&p).issue_date, "19900115");
    }

    #[test]
    fn test_sex_mapping() {
        for (input, expected) in [
            ("Female", "2"),
            ("F", "2"),
            ("f", "2"),
            ("m", "1"),
            ("MALE", "1"),
            ("", "1"),
            ("unknown", "1"),
        ] {
            let mut p = partial();
            p.sex = Some(input.to_string());
            assert_eq!(sanitize(&p).sex, expected, "sex input {:?}", input);
        }
    }

    #[test]
    fn test_eye_color_table_and_passthrough() {
        let cases = [
            ("Blue", "BLU"),
            ("HAZEL", "HAZ"),
            ("brown", "BRO"),
            ("xyz", "XYZ"),     // unknown 3-letter token passes through
            ("purple", "BRO"),  // unknown long name defaults
        ];
        for (input, expected) in cases {
            let mut p = partial();
            p.eye_color = Some(input.to_string());
            assert_eq!(sanitize(&p).eye_color, expected, "eye input {:?}", input);
        }
    }

    #[test]
    fn test_hair_color_spelling_variants() {
        for (input, expected) in [("Blond", "BLN"), ("BLONDE", "BLN"), ("Grey", "GRY"), ("gray", "GRY")] {
            let mut p = partial();
            p.hair_color = Some(input.to_string());
            assert_eq!(sanitize(&p).hair_color, expected);
        }
    }

    #[test]
    fn test_name_stripping() {
        let mut p = partial();
        p.first_name = Some("Mary-Jane 2nd".to_string());
        p.last_name = Some("12345".to_string());
        let record = sanitize(&p);
        assert_eq!(record.first_name, "MARYJANEND");
        // Nothing survives stripping: default applies
        assert_eq!(record.last_name, "DOE");
    }

    #[test]
    fn test_state_truncated_to_two_chars() {
        let mut p = partial();
        p.state = Some("Washington".to_string());
        assert_eq!(sanitize(&p).state, "WA");
    }

    #[test]
    fn test_height_weight_digit_stripping() {
        let mut p = partial();
        p.height = Some("5'10\" (70 in)".to_string());
        p.weight = Some("165 lbs".to_string());
        let record = sanitize(&p);
        assert_eq!(record.height, "510");
        assert_eq!(record.weight, "165");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let mut p = partial();
        p.first_name = Some("jo-anne".to_string());
        p.birth_date = Some("1985-12-02".to_string());
        p.expiry_date = Some("garbage-value".to_string());
        p.sex = Some("female".to_string());
        p.eye_color = Some("green".to_string());
        p.hair_color = Some("sandy".to_string());
        p.state = Some("oregon".to_string());
        p.height = Some("6ft2".to_string());

        let once = sanitize(&p);
        let twice = sanitize(&PartialCredentialRecord::from(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_on_empty_input_too() {
        let once = sanitize(&partial());
        let twice = sanitize(&PartialCredentialRecord::from(&once));
        assert_eq!(once, twice);
    }
}
