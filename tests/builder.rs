#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate hex_literal;

use der_codec::builder::DerBuilder;
use der_codec::reader::DerReader;
use der_codec::value::DerValue;
use time::macros::datetime;

#[test]
fn test_build_nested_sequence() {
    let mut b = DerBuilder::new();
    b.add_sequence_with(|b| {
        b.add_integer(1).add_utf8_string("hi");
        Ok(())
    })
    .unwrap();
    assert_eq!(b.get_encoded(), hex!("30 09 30 07 02 01 01 0C 02 68 69"));
}

#[test]
fn test_build_oid() {
    let mut b = DerBuilder::new();
    b.add_oid("1.2.840.113549.1.1.11").unwrap();
    assert_eq!(b.as_bytes(), hex!("06 09 2A 86 48 86 F7 0D 01 01 0B"));
}

#[test]
fn test_build_utc_time() {
    let mut b = DerBuilder::new();
    b.add_utc_time(datetime!(2024-01-02 03:04:05 UTC), None, false)
        .unwrap();
    assert_eq!(
        b.as_bytes(),
        hex!("17 0D 32 34 30 31 30 32 30 33 30 34 30 35 5A")
    );
}

#[test]
fn test_build_generalized_time_precise() {
    let mut b = DerBuilder::new();
    b.add_generalized_time(datetime!(2050-06-15 12:00:00.250 UTC), None, true)
        .unwrap();
    assert_eq!(
        b.as_bytes(),
        hex!("18 13 32 30 35 30 30 36 31 35 31 32 30 30 30 30 2E 32 35 30 5A")
    );
}

#[test]
fn test_rfc_datetime_pivot() {
    let mut b = DerBuilder::new();
    b.add_rfc_datetime(datetime!(2049-01-01 00:00:00 UTC), None, false)
        .unwrap();
    b.add_rfc_datetime(datetime!(2050-01-01 00:00:00 UTC), None, false)
        .unwrap();
    assert_eq!(b.as_bytes()[0], 0x17);
    let second = 2 + usize::from(b.as_bytes()[1]);
    assert_eq!(b.as_bytes()[second], 0x18);
}

/// Each built child, wrapped in the default SEQUENCE, must come back out
/// of the reader with the original value.
#[test]
fn test_build_then_read_back() {
    let mut b = DerBuilder::new();
    b.add_boolean(true)
        .add_integer(-129)
        .add_octet_string(&hex!("aa bb"))
        .add_null()
        .add_enumerated(2)
        .add_printable_string("FR")
        .add_bmp_string("User");
    b.add_oid("2.5.4.3").unwrap();
    b.add_bit_string(&hex!("6e 5d c0"), 6).unwrap();
    let der = b.get_encoded();

    let mut rdr = DerReader::new(&der).unwrap();
    rdr.expect_tag(&[0x30]).unwrap();

    assert!(rdr.move_next().unwrap());
    rdr.expect_tag(&[0x01]).unwrap();
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_bool(), Ok(true));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x02]).unwrap();
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_i64(), Ok(-129));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x04]).unwrap();
    assert_eq!(rdr.get_payload(), &hex!("aa bb"));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x05]).unwrap();
    assert_eq!(rdr.node().payload_len, 0);

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x0a]).unwrap();
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_i64(), Ok(2));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x13]).unwrap();
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_str(), Ok("FR"));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x1e]).unwrap();
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_str(), Ok("User"));

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x06]).unwrap();
    assert_eq!(
        DerValue::from_reader(&rdr).unwrap().as_oid(),
        Ok("2.5.4.3")
    );

    assert!(rdr.move_next_same_level().unwrap());
    rdr.expect_tag(&[0x03]).unwrap();
    assert!(!rdr.move_next_same_level().unwrap());
}

#[test]
fn test_octet_string_composition_is_seen_as_encapsulating() {
    let mut b = DerBuilder::new();
    b.add_octet_string_with(|b| {
        b.add_integer(255);
        Ok(())
    })
    .unwrap();
    assert_eq!(b.as_bytes(), hex!("04 04 02 02 00 FF"));

    let mut rdr = DerReader::new(b.as_bytes()).unwrap();
    assert!(rdr.node().constructed);
    assert!(rdr.move_next().unwrap());
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_u64(), Ok(255));
}

#[test]
fn test_bit_string_composition() {
    let mut b = DerBuilder::new();
    b.add_bit_string_with(|b| {
        b.add_integer(5);
        Ok(())
    })
    .unwrap();
    assert_eq!(b.as_bytes(), hex!("03 04 00 02 01 05"));
}

#[test]
fn test_set_builder() {
    let mut b = DerBuilder::new();
    b.add_set_with(|b| {
        b.add_integer(1).add_integer(2);
        Ok(())
    })
    .unwrap();
    assert_eq!(b.as_bytes(), hex!("31 06 02 01 01 02 01 02"));

    let mut b = DerBuilder::new();
    b.add_set(&hex!("02 01 2a")).unwrap();
    assert_eq!(b.as_bytes(), hex!("31 03 02 01 2a"));
}

#[test]
fn test_implicit_and_explicit_read_back() {
    let mut b = DerBuilder::new();
    b.add_implicit(2, b"\x05", true).unwrap();
    b.add_explicit(0, &hex!("02 01 02"), true).unwrap();
    let der = b.get_encoded();

    let mut rdr = DerReader::new(&der).unwrap();
    assert!(rdr.move_next().unwrap());
    assert_eq!(rdr.node().tag_name(), "CONTEXT_SPECIFIC [2]");
    assert!(!rdr.node().constructed);

    assert!(rdr.move_next_same_level().unwrap());
    assert_eq!(rdr.node().tag_name(), "CONTEXT_SPECIFIC [0]");
    assert!(rdr.node().constructed);
    assert!(rdr.move_next().unwrap());
    assert_eq!(DerValue::from_reader(&rdr).unwrap().as_i64(), Ok(2));
}

#[test]
fn test_implicit_retag_preserves_length_and_payload() {
    let original = hex!("0c 02 68 69");
    let mut b = DerBuilder::new();
    b.add_implicit(1, &original, false).unwrap();
    assert_eq!(b.as_bytes(), hex!("81 02 68 69"));
}

#[test]
fn test_add_raw_with_outer_tag() {
    let mut b = DerBuilder::new();
    b.add_raw_tagged(0xa3, &hex!("02 01 05"));
    assert_eq!(b.as_bytes(), hex!("a3 03 02 01 05"));
}

#[test]
fn test_get_encoded_as() {
    let mut b = DerBuilder::new();
    b.add_integer(1);
    assert_eq!(b.get_encoded_as(0x31), hex!("31 03 02 01 01"));
    // default wrapper is SEQUENCE
    assert_eq!(b.get_encoded(), hex!("30 03 02 01 01"));
}

#[test]
fn test_long_payload_uses_long_form_length() {
    let mut b = DerBuilder::new();
    b.add_octet_string(&[0x55; 200]);
    let der = b.get_encoded();
    // inner: 04 81 C8, outer: 30 81 CB
    assert_eq!(&der[..3], &hex!("30 81 cb"));
    assert_eq!(&der[3..6], &hex!("04 81 c8"));

    let mut rdr = DerReader::new(&der).unwrap();
    assert_eq!(rdr.build_offset_map().unwrap(), 2);
    rdr.move_to(3).unwrap();
    assert_eq!(rdr.node().payload_len, 200);
}
