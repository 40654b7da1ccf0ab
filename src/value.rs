//! Typed value objects for the universal tags
//!
//! A [`DerValue`] pairs the raw encoding of one element with its decoded
//! semantic content. Values are built from a reader position, from raw TLV
//! bytes, or from a semantic value, and are read-only afterwards.

use crate::datetime;
use crate::error::{DerError, DerResult};
use crate::integer;
use crate::oid;
use crate::reader::DerReader;
use crate::tlv::{self, header_at, tag_name, Class, Tag, TlvHeader, NESTED_CONTAINER_TAGS};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use core::fmt;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[cfg(feature = "bigint")]
use num_bigint::{BigInt, BigUint};

/// Text rendering of a complete TLV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Standard Base64 (the default)
    #[default]
    Base64,
    /// Lowercase hexadecimal
    Hex,
}

/// Decoded semantic content of a universal-tag element
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Boolean(bool),
    /// Content octets, big-endian two's complement
    Integer(Vec<u8>),
    BitString {
        unused_bits: u8,
        data: Vec<u8>,
    },
    OctetString(Vec<u8>),
    Null,
    /// Dotted-decimal form
    Oid(String),
    Enumerated(i64),
    Utf8String(String),
    NumericString(String),
    PrintableString(String),
    /// Decoded as Latin-1
    TeletexString(String),
    VideotexString(Vec<u8>),
    Ia5String(String),
    VisibleString(String),
    /// Decoded from UTF-32BE
    UniversalString(String),
    /// Decoded from UTF-16BE
    BmpString(String),
    UtcTime(OffsetDateTime),
    GeneralizedTime(OffsetDateTime),
    Sequence,
    Set,
}

/// One decoded universal-tag element: raw TLV octets plus semantic value
#[derive(Debug, Clone, PartialEq)]
pub struct DerValue {
    raw: Vec<u8>,
    kind: ValueKind,
}

/// Encode the content octets of a string-valued universal tag.
pub(crate) fn string_payload(tag: Tag, s: &str) -> Vec<u8> {
    match tag {
        Tag::BmpString => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        Tag::UniversalString => s.chars().flat_map(|c| (c as u32).to_be_bytes()).collect(),
        // Latin-1, one octet per character
        Tag::T61String => s.chars().map(|c| c as u32 as u8).collect(),
        _ => s.as_bytes().to_vec(),
    }
}

fn decode_string(tag: Tag, payload: &[u8]) -> DerResult<String> {
    match tag {
        Tag::T61String => Ok(payload.iter().map(|&b| b as char).collect()),
        Tag::BmpString => {
            if payload.len() % 2 != 0 {
                return Err(DerError::InvalidData);
            }
            let units: Vec<u16> = payload
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16(&units).map_err(|_| DerError::InvalidData)
        }
        Tag::UniversalString => {
            if payload.len() % 4 != 0 {
                return Err(DerError::InvalidData);
            }
            payload
                .chunks_exact(4)
                .map(|c| {
                    char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                        .ok_or(DerError::InvalidData)
                })
                .collect()
        }
        _ => String::from_utf8(payload.to_vec()).map_err(|_| DerError::InvalidData),
    }
}

fn decode_kind(hdr: &TlvHeader, payload: &[u8]) -> DerResult<ValueKind> {
    if hdr.class != Class::Universal {
        return Err(DerError::InvalidTag);
    }
    match hdr.tag {
        Tag::Sequence | Tag::Set => {
            if !hdr.constructed {
                return Err(DerError::InvalidData);
            }
            if hdr.tag == Tag::Sequence {
                Ok(ValueKind::Sequence)
            } else {
                Ok(ValueKind::Set)
            }
        }
        _ if hdr.constructed => Err(DerError::InvalidData),
        Tag::Boolean => match payload {
            [0x00] => Ok(ValueKind::Boolean(false)),
            [0xff] => Ok(ValueKind::Boolean(true)),
            _ => Err(DerError::InvalidData),
        },
        Tag::Integer => {
            if payload.is_empty() {
                return Err(DerError::InvalidData);
            }
            Ok(ValueKind::Integer(payload.to_vec()))
        }
        Tag::BitString => {
            let (&unused_bits, data) = payload.split_first().ok_or(DerError::InvalidData)?;
            if unused_bits > 7 {
                return Err(DerError::InvalidData);
            }
            Ok(ValueKind::BitString {
                unused_bits,
                data: data.to_vec(),
            })
        }
        Tag::OctetString => Ok(ValueKind::OctetString(payload.to_vec())),
        Tag::Null => {
            if !payload.is_empty() {
                return Err(DerError::InvalidData);
            }
            Ok(ValueKind::Null)
        }
        Tag::Oid => Ok(ValueKind::Oid(oid::decode_payload(payload)?)),
        Tag::Enumerated => Ok(ValueKind::Enumerated(integer::decode_i64(payload)?)),
        Tag::Utf8String => Ok(ValueKind::Utf8String(decode_string(hdr.tag, payload)?)),
        Tag::NumericString => Ok(ValueKind::NumericString(decode_string(hdr.tag, payload)?)),
        Tag::PrintableString => Ok(ValueKind::PrintableString(decode_string(hdr.tag, payload)?)),
        Tag::T61String => Ok(ValueKind::TeletexString(decode_string(hdr.tag, payload)?)),
        Tag::VideotexString => Ok(ValueKind::VideotexString(payload.to_vec())),
        Tag::Ia5String => Ok(ValueKind::Ia5String(decode_string(hdr.tag, payload)?)),
        Tag::VisibleString => Ok(ValueKind::VisibleString(decode_string(hdr.tag, payload)?)),
        Tag::UniversalString => Ok(ValueKind::UniversalString(decode_string(hdr.tag, payload)?)),
        Tag::BmpString => Ok(ValueKind::BmpString(decode_string(hdr.tag, payload)?)),
        Tag::UtcTime => Ok(ValueKind::UtcTime(datetime::decode_utc_time(payload)?)),
        Tag::GeneralizedTime => Ok(ValueKind::GeneralizedTime(
            datetime::decode_generalized_time(payload)?,
        )),
        _ => Err(DerError::InvalidTag),
    }
}

fn hex_str(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{:02x}", b);
    }
    s
}

impl DerValue {
    /// Decode a value from a complete TLV encoding.
    ///
    /// The bytes must hold exactly one element of universal class.
    pub fn from_bytes(bytes: &[u8]) -> DerResult<Self> {
        if bytes.is_empty() {
            return Err(DerError::EmptyInput);
        }
        let hdr = header_at(bytes)?;
        if hdr.full_len() != bytes.len() {
            return Err(DerError::InvalidData);
        }
        let payload = &bytes[hdr.header_len..];
        let kind = decode_kind(&hdr, payload)?;
        Ok(DerValue {
            raw: bytes.to_vec(),
            kind,
        })
    }

    /// Like [`from_bytes`](Self::from_bytes), but first checks that the
    /// leading octet carries the expected universal tag.
    pub fn from_bytes_expecting(bytes: &[u8], tag: Tag) -> DerResult<Self> {
        if bytes.is_empty() {
            return Err(DerError::EmptyInput);
        }
        if u32::from(bytes[0] & 0x1f) != tag.0 || Class::from_tag_octet(bytes[0]) != Class::Universal
        {
            return Err(DerError::InvalidTag);
        }
        Self::from_bytes(bytes)
    }

    /// Decode the element currently under a reader's cursor.
    pub fn from_reader(rdr: &DerReader<'_>) -> DerResult<Self> {
        Self::from_bytes(rdr.get_tlv())
    }

    /// Decode the element under the cursor, checking its tag first.
    pub fn from_reader_expecting(rdr: &DerReader<'_>, tag: Tag) -> DerResult<Self> {
        Self::from_bytes_expecting(rdr.get_tlv(), tag)
    }

    // --------- constructors from semantic values ----------

    pub fn boolean(v: bool) -> Self {
        let raw = tlv::wrap(Tag::Boolean.0 as u8, &[if v { 0xff } else { 0x00 }]);
        DerValue {
            raw,
            kind: ValueKind::Boolean(v),
        }
    }

    pub fn integer(v: i64) -> Self {
        let content = integer::encode_i64(v);
        DerValue {
            raw: tlv::wrap(Tag::Integer.0 as u8, &content),
            kind: ValueKind::Integer(content),
        }
    }

    pub fn octet_string(v: &[u8]) -> Self {
        DerValue {
            raw: tlv::wrap(Tag::OctetString.0 as u8, v),
            kind: ValueKind::OctetString(v.to_vec()),
        }
    }

    pub fn bit_string(data: &[u8], unused_bits: u8) -> DerResult<Self> {
        if unused_bits > 7 {
            return Err(DerError::InvalidData);
        }
        let mut content = Vec::with_capacity(1 + data.len());
        content.push(unused_bits);
        content.extend_from_slice(data);
        Ok(DerValue {
            raw: tlv::wrap(Tag::BitString.0 as u8, &content),
            kind: ValueKind::BitString {
                unused_bits,
                data: data.to_vec(),
            },
        })
    }

    pub fn null() -> Self {
        DerValue {
            raw: tlv::wrap(Tag::Null.0 as u8, &[]),
            kind: ValueKind::Null,
        }
    }

    pub fn oid(dotted: &str) -> DerResult<Self> {
        let raw = oid::encode(dotted)?;
        Ok(DerValue {
            raw,
            kind: ValueKind::Oid(dotted.to_string()),
        })
    }

    pub fn enumerated(v: i64) -> Self {
        DerValue {
            raw: tlv::wrap(Tag::Enumerated.0 as u8, &integer::encode_i64(v)),
            kind: ValueKind::Enumerated(v),
        }
    }

    /// Build a string value for any of the string-valued universal tags.
    pub fn string(tag: Tag, s: &str) -> DerResult<Self> {
        let payload = string_payload(tag, s);
        let raw = tlv::wrap(tag.0 as u8, &payload);
        let hdr = header_at(&raw)?;
        let kind = decode_kind(&hdr, &payload)?;
        Ok(DerValue { raw, kind })
    }

    pub fn utf8_string(s: &str) -> Self {
        DerValue {
            raw: tlv::wrap(Tag::Utf8String.0 as u8, s.as_bytes()),
            kind: ValueKind::Utf8String(s.to_string()),
        }
    }

    /// Encode a UTCTime value; the decoded form is re-derived from the
    /// encoding so that e.g. dropped milliseconds are reflected.
    pub fn utc_time(
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<Self> {
        let raw = datetime::encode_utc_time(dt, zone, precise)?;
        Self::from_bytes(&raw)
    }

    /// Encode a GeneralizedTime value.
    pub fn generalized_time(
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<Self> {
        let raw = datetime::encode_generalized_time(dt, zone, precise)?;
        Self::from_bytes(&raw)
    }

    /// Encode a date-time with the RFC 5280 UTCTime/GeneralizedTime chooser.
    pub fn rfc5280_time(
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<Self> {
        let raw = datetime::encode_rfc5280_time(dt, zone, precise)?;
        Self::from_bytes(&raw)
    }

    // --------- accessors ----------

    /// The complete TLV encoding of this value.
    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The raw tag octet.
    #[inline]
    pub fn tag(&self) -> u8 {
        self.raw[0]
    }

    /// Human-readable tag label.
    pub fn tag_name(&self) -> String {
        tag_name(self.tag())
    }

    /// The decoded semantic content.
    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// True for SEQUENCE, SET and the encapsulating string tags.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, ValueKind::Sequence | ValueKind::Set)
            || NESTED_CONTAINER_TAGS.contains(&Tag(u32::from(self.tag() & 0x1f)))
    }

    pub fn as_bool(&self) -> DerResult<bool> {
        match self.kind {
            ValueKind::Boolean(b) => Ok(b),
            _ => Err(DerError::InvalidTag),
        }
    }

    pub fn as_i64(&self) -> DerResult<i64> {
        match &self.kind {
            ValueKind::Integer(bytes) => integer::decode_i64(bytes),
            ValueKind::Enumerated(v) => Ok(*v),
            _ => Err(DerError::InvalidTag),
        }
    }

    pub fn as_u64(&self) -> DerResult<u64> {
        match &self.kind {
            ValueKind::Integer(bytes) => integer::decode_u64(bytes),
            ValueKind::Enumerated(v) => u64::try_from(*v).map_err(|_| DerError::InvalidData),
            _ => Err(DerError::InvalidTag),
        }
    }

    pub fn as_u32(&self) -> DerResult<u32> {
        u32::try_from(self.as_u64()?).map_err(|_| DerError::Overflow)
    }

    pub fn as_i32(&self) -> DerResult<i32> {
        i32::try_from(self.as_i64()?).map_err(|_| DerError::Overflow)
    }

    /// The decoded text of a string-valued element.
    pub fn as_str(&self) -> DerResult<&str> {
        match &self.kind {
            ValueKind::Utf8String(s)
            | ValueKind::NumericString(s)
            | ValueKind::PrintableString(s)
            | ValueKind::TeletexString(s)
            | ValueKind::Ia5String(s)
            | ValueKind::VisibleString(s)
            | ValueKind::UniversalString(s)
            | ValueKind::BmpString(s) => Ok(s),
            _ => Err(DerError::InvalidTag),
        }
    }

    /// The dotted-decimal form of an OBJECT IDENTIFIER.
    pub fn as_oid(&self) -> DerResult<&str> {
        match &self.kind {
            ValueKind::Oid(s) => Ok(s),
            _ => Err(DerError::InvalidTag),
        }
    }

    /// The decoded instant of a UTCTime or GeneralizedTime.
    pub fn as_datetime(&self) -> DerResult<OffsetDateTime> {
        match self.kind {
            ValueKind::UtcTime(dt) | ValueKind::GeneralizedTime(dt) => Ok(dt),
            _ => Err(DerError::InvalidTag),
        }
    }

    /// The content octets of a scalar or opaque element.
    pub fn as_slice(&self) -> DerResult<&[u8]> {
        match &self.kind {
            ValueKind::Integer(b)
            | ValueKind::OctetString(b)
            | ValueKind::VideotexString(b)
            | ValueKind::BitString { data: b, .. } => Ok(b),
            _ => Err(DerError::InvalidTag),
        }
    }

    /// Interpret an INTEGER of any size.
    #[cfg(feature = "bigint")]
    #[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
    pub fn as_bigint(&self) -> DerResult<BigInt> {
        match &self.kind {
            ValueKind::Integer(b) => Ok(BigInt::from_signed_bytes_be(b)),
            _ => Err(DerError::InvalidTag),
        }
    }

    /// Interpret a non-negative INTEGER of any size.
    #[cfg(feature = "bigint")]
    #[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
    pub fn as_biguint(&self) -> DerResult<BigUint> {
        match &self.kind {
            ValueKind::Integer(b) => {
                if integer::is_highest_bit_set(b) {
                    return Err(DerError::InvalidData);
                }
                Ok(BigUint::from_bytes_be(b))
            }
            _ => Err(DerError::InvalidTag),
        }
    }

    /// Human-readable rendering of the decoded content.
    pub fn display(&self) -> String {
        const DT_FORMAT: &[time::format_description::FormatItem<'static>] = format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3] \
             [offset_hour sign:mandatory]:[offset_minute]"
        );
        match &self.kind {
            ValueKind::Boolean(b) => b.to_string(),
            ValueKind::Integer(bytes) => match integer::decode_i64(bytes) {
                Ok(v) => v.to_string(),
                Err(_) => format!("0x{}", hex_str(bytes)),
            },
            ValueKind::BitString { unused_bits, data } => {
                format!("{} ({} unused bits)", hex_str(data), unused_bits)
            }
            ValueKind::OctetString(data) => hex_str(data),
            ValueKind::Null => "NULL".to_string(),
            ValueKind::Oid(dotted) => match oid::friendly_name(dotted) {
                Some(name) => format!("{} ({})", name, dotted),
                None => dotted.clone(),
            },
            ValueKind::Enumerated(v) => v.to_string(),
            ValueKind::Utf8String(s)
            | ValueKind::NumericString(s)
            | ValueKind::PrintableString(s)
            | ValueKind::TeletexString(s)
            | ValueKind::Ia5String(s)
            | ValueKind::VisibleString(s)
            | ValueKind::UniversalString(s)
            | ValueKind::BmpString(s) => s.clone(),
            ValueKind::VideotexString(data) => hex_str(data),
            ValueKind::UtcTime(dt) | ValueKind::GeneralizedTime(dt) => {
                dt.format(&DT_FORMAT).unwrap_or_default()
            }
            ValueKind::Sequence | ValueKind::Set => self.tag_name(),
        }
    }

    /// Render the complete TLV as Base64 or hex.
    pub fn format(&self, encoding: TextEncoding) -> String {
        match encoding {
            TextEncoding::Base64 => BASE64.encode(&self.raw),
            TextEncoding::Hex => hex_str(&self.raw),
        }
    }
}

impl fmt::Display for DerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
