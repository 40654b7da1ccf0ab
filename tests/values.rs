#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate hex_literal;

use der_codec::error::DerError;
use der_codec::reader::DerReader;
use der_codec::tlv::Tag;
use der_codec::value::{DerValue, TextEncoding};
use time::macros::datetime;
use time::UtcOffset;

#[test]
fn test_oid_roundtrip() {
    for dotted in [
        "1.2.840.113549.1.1.11",
        "2.5.4.3",
        "0.9.2342.19200300.100.1.25",
        "2.16.840.1.101.3.4.2.1",
    ] {
        let v = DerValue::oid(dotted).unwrap();
        let back = DerValue::from_bytes(v.raw_bytes()).unwrap();
        assert_eq!(back.as_oid(), Ok(dotted));
        assert_eq!(back.raw_bytes(), v.raw_bytes());
    }
}

#[test]
fn test_oid_arc_constraints() {
    assert_eq!(DerValue::oid("1.2").err(), Some(DerError::InvalidData));
    assert_eq!(DerValue::oid("3.2.1").err(), Some(DerError::InvalidData));
    assert_eq!(DerValue::oid("0.40.1").err(), Some(DerError::InvalidData));
    assert!(DerValue::oid("2.100.3").is_ok());
}

#[test]
fn test_utc_time_roundtrip_to_the_millisecond() {
    let dt = datetime!(2024-01-02 03:04:05.987 UTC);
    let v = DerValue::utc_time(dt, None, true).unwrap();
    assert_eq!(v.as_datetime(), Ok(dt));

    // non-precise encoding drops the milliseconds
    let v = DerValue::utc_time(dt, None, false).unwrap();
    assert_eq!(v.as_datetime(), Ok(datetime!(2024-01-02 03:04:05 UTC)));
}

#[test]
fn test_utc_time_century_rule() {
    let v = DerValue::from_bytes(&hex!("17 0D 34 39 30 31 30 32 30 33 30 34 30 35 5A")).unwrap();
    assert_eq!(v.as_datetime().unwrap().year(), 2049);
    let v = DerValue::from_bytes(&hex!("17 0D 35 30 30 31 30 32 30 33 30 34 30 35 5A")).unwrap();
    assert_eq!(v.as_datetime().unwrap().year(), 1950);
}

#[test]
fn test_generalized_time_with_zone() {
    let east = UtcOffset::from_hms(2, 0, 0).unwrap();
    let v = DerValue::generalized_time(datetime!(2024-03-01 12:00:00 +02:00), Some(east), false)
        .unwrap();
    // wall clock preserved, offset emitted with the inverted sign
    assert_eq!(&v.raw_bytes()[2..], b"20240301120000-0200");
}

#[test]
fn test_tag_mismatch_on_construction() {
    let oid_bytes = hex!("06 03 55 04 03");
    assert_eq!(
        DerValue::from_bytes_expecting(&oid_bytes, Tag::Utf8String).err(),
        Some(DerError::InvalidTag)
    );
    assert!(DerValue::from_bytes_expecting(&oid_bytes, Tag::Oid).is_ok());
}

#[test]
fn test_from_reader_expecting() {
    let bytes = hex!("30 05 06 03 55 04 03");
    let mut rdr = DerReader::new(&bytes).unwrap();
    rdr.move_next().unwrap();
    let v = DerValue::from_reader_expecting(&rdr, Tag::Oid).unwrap();
    assert_eq!(v.as_oid(), Ok("2.5.4.3"));
    assert_eq!(v.display(), "commonName (2.5.4.3)");
    assert_eq!(
        DerValue::from_reader_expecting(&rdr, Tag::Integer).err(),
        Some(DerError::InvalidTag)
    );
}

#[test]
fn test_format_base64_and_hex() {
    let v = DerValue::from_bytes(&hex!("02 01 05")).unwrap();
    assert_eq!(v.format(TextEncoding::Base64), "AgEF");
    assert_eq!(v.format(TextEncoding::Hex), "020105");
}

#[test]
fn test_display_strings_and_scalars() {
    assert_eq!(DerValue::boolean(true).display(), "true");
    assert_eq!(DerValue::integer(-42).display(), "-42");
    assert_eq!(DerValue::null().display(), "NULL");
    assert_eq!(DerValue::utf8_string("Some-State").display(), "Some-State");
    assert_eq!(
        DerValue::octet_string(&hex!("aa bb cc")).display(),
        "aabbcc"
    );
    assert_eq!(DerValue::from_bytes(&hex!("30 00")).unwrap().display(), "Sequence");
}

#[test]
fn test_display_datetime() {
    let v = DerValue::utc_time(datetime!(2024-01-02 03:04:05.250 UTC), None, true).unwrap();
    assert_eq!(v.display(), "2024-01-02 03:04:05.250 +00:00");
}

#[test]
fn test_non_ascii_time_payload_is_rejected() {
    // UTCTime payload "€000000000Z": valid UTF-8, 'Z' at byte 12, but the
    // date-time fields are not single-byte characters
    let bytes = hex!("17 0D E2 82 AC 30 30 30 30 30 30 30 30 30 5A");
    assert_eq!(DerValue::from_bytes(&bytes), Err(DerError::InvalidData));
}

#[test]
fn test_empty_oid_value() {
    let v = DerValue::from_bytes(&hex!("06 00")).unwrap();
    assert_eq!(v.as_oid(), Ok(""));
    assert_eq!(v.display(), "");
}

#[test]
fn test_accessor_kind_mismatch() {
    let v = DerValue::integer(5);
    assert_eq!(v.as_bool(), Err(DerError::InvalidTag));
    assert_eq!(v.as_str(), Err(DerError::InvalidTag));
    assert_eq!(v.as_oid(), Err(DerError::InvalidTag));
    assert_eq!(v.as_datetime(), Err(DerError::InvalidTag));
}

#[test]
fn test_teletex_and_universal_strings() {
    let v = DerValue::string(Tag::T61String, "caf\u{e9}").unwrap();
    // Latin-1: 0xe9
    assert_eq!(v.raw_bytes(), hex!("14 04 63 61 66 e9"));
    assert_eq!(v.as_str(), Ok("caf\u{e9}"));

    let v = DerValue::string(Tag::UniversalString, "Hi").unwrap();
    assert_eq!(v.raw_bytes(), hex!("1c 08 00 00 00 48 00 00 00 69"));
    assert_eq!(v.as_str(), Ok("Hi"));
}
