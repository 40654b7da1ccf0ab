//! DER builder
//!
//! [`DerBuilder`] accumulates the encodings of child elements in order;
//! [`get_encoded`](DerBuilder::get_encoded) wraps the accumulated bytes in
//! an outer tag without consuming the builder. Infallible operations return
//! `&mut Self` for chaining; operations that validate their input return
//! `DerResult<&mut Self>`. Every operation either appends one complete
//! child or leaves the buffer untouched.

use crate::datetime;
use crate::error::{DerError, DerResult};
use crate::integer;
use crate::oid;
use crate::reader::DerReader;
use crate::tlv::{self, Tag};
use crate::value::string_payload;
use time::{OffsetDateTime, UtcOffset};

const TAG_CONTEXT_PRIMITIVE: u8 = 0x80;
const TAG_CONTEXT_CONSTRUCTED: u8 = 0xa0;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;

/// Accumulator of DER-encoded children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerBuilder {
    buf: Vec<u8>,
}

/// Check that `payload` is a concatenation of well-formed DER elements.
fn validate_tlv_chain(payload: &[u8]) -> DerResult<()> {
    let mut pos = 0;
    while pos < payload.len() {
        let mut rdr = DerReader::new(&payload[pos..])?;
        rdr.build_offset_map()?;
        pos += rdr.node().full_len;
    }
    Ok(())
}

macro_rules! string_adders {
    ($($(#[$attr:meta])* $name:ident => $tag:expr,)*) => {
        $(
            $(#[$attr])*
            pub fn $name(&mut self, s: &str) -> &mut Self {
                let payload = string_payload($tag, s);
                self.push_tlv($tag.0 as u8, &payload)
            }
        )*
    };
}

impl DerBuilder {
    pub fn new() -> Self {
        DerBuilder::default()
    }

    /// The accumulated child encodings, without an outer wrapper.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn push_tlv(&mut self, tag: u8, payload: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.buf.extend_from_slice(&tlv::encode_length(payload.len()));
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn add_boolean(&mut self, v: bool) -> &mut Self {
        self.push_tlv(Tag::Boolean.0 as u8, &[if v { 0xff } else { 0x00 }])
    }

    pub fn add_integer(&mut self, v: i64) -> &mut Self {
        let content = integer::encode_i64(v);
        self.push_tlv(Tag::Integer.0 as u8, &content)
    }

    /// Append an INTEGER from pre-encoded content octets (large values,
    /// e.g. certificate serial numbers).
    pub fn add_integer_bytes(&mut self, content: &[u8]) -> DerResult<&mut Self> {
        if content.is_empty() {
            return Err(DerError::EmptyInput);
        }
        Ok(self.push_tlv(Tag::Integer.0 as u8, content))
    }

    pub fn add_octet_string(&mut self, v: &[u8]) -> &mut Self {
        self.push_tlv(Tag::OctetString.0 as u8, v)
    }

    pub fn add_bit_string(&mut self, data: &[u8], unused_bits: u8) -> DerResult<&mut Self> {
        if unused_bits > 7 {
            return Err(DerError::InvalidData);
        }
        let mut content = Vec::with_capacity(1 + data.len());
        content.push(unused_bits);
        content.extend_from_slice(data);
        Ok(self.push_tlv(Tag::BitString.0 as u8, &content))
    }

    pub fn add_null(&mut self) -> &mut Self {
        self.push_tlv(Tag::Null.0 as u8, &[])
    }

    pub fn add_oid(&mut self, dotted: &str) -> DerResult<&mut Self> {
        let payload = oid::encode_payload(dotted)?;
        Ok(self.push_tlv(Tag::Oid.0 as u8, &payload))
    }

    pub fn add_enumerated(&mut self, v: i64) -> &mut Self {
        let content = integer::encode_i64(v);
        self.push_tlv(Tag::Enumerated.0 as u8, &content)
    }

    string_adders! {
        add_utf8_string => Tag::Utf8String,
        add_numeric_string => Tag::NumericString,
        add_printable_string => Tag::PrintableString,
        /// TeletexString content is encoded as Latin-1.
        add_teletex_string => Tag::T61String,
        add_videotex_string => Tag::VideotexString,
        add_ia5_string => Tag::Ia5String,
        add_visible_string => Tag::VisibleString,
        /// UniversalString content is encoded as UTF-32BE.
        add_universal_string => Tag::UniversalString,
        /// BMPString content is encoded as UTF-16BE.
        add_bmp_string => Tag::BmpString,
    }

    pub fn add_utc_time(
        &mut self,
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<&mut Self> {
        let encoded = datetime::encode_utc_time(dt, zone, precise)?;
        self.buf.extend_from_slice(&encoded);
        Ok(self)
    }

    pub fn add_generalized_time(
        &mut self,
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<&mut Self> {
        let encoded = datetime::encode_generalized_time(dt, zone, precise)?;
        self.buf.extend_from_slice(&encoded);
        Ok(self)
    }

    /// Append a date-time as UTCTime or GeneralizedTime per the RFC 5280
    /// 2050 rule.
    pub fn add_rfc_datetime(
        &mut self,
        dt: OffsetDateTime,
        zone: Option<UtcOffset>,
        precise: bool,
    ) -> DerResult<&mut Self> {
        let encoded = datetime::encode_rfc5280_time(dt, zone, precise)?;
        self.buf.extend_from_slice(&encoded);
        Ok(self)
    }

    /// Append a SEQUENCE wrapping already-encoded children.
    ///
    /// The payload is checked to parse as a chain of DER elements.
    pub fn add_sequence(&mut self, payload: &[u8]) -> DerResult<&mut Self> {
        validate_tlv_chain(payload)?;
        Ok(self.push_tlv(TAG_SEQUENCE, payload))
    }

    /// Append a SET wrapping already-encoded children. Callers requiring
    /// SET-OF canonical ordering must pre-sort the children.
    pub fn add_set(&mut self, payload: &[u8]) -> DerResult<&mut Self> {
        validate_tlv_chain(payload)?;
        Ok(self.push_tlv(TAG_SET, payload))
    }

    /// Append a SEQUENCE composed with a nested builder.
    pub fn add_sequence_with<F>(&mut self, f: F) -> DerResult<&mut Self>
    where
        F: FnOnce(&mut DerBuilder) -> DerResult<()>,
    {
        let mut sub = DerBuilder::new();
        f(&mut sub)?;
        Ok(self.push_tlv(TAG_SEQUENCE, &sub.buf))
    }

    /// Append a SET composed with a nested builder.
    pub fn add_set_with<F>(&mut self, f: F) -> DerResult<&mut Self>
    where
        F: FnOnce(&mut DerBuilder) -> DerResult<()>,
    {
        let mut sub = DerBuilder::new();
        f(&mut sub)?;
        Ok(self.push_tlv(TAG_SET, &sub.buf))
    }

    /// Append an OCTET STRING whose content is produced by a nested
    /// builder. The element is emitted in primitive form.
    pub fn add_octet_string_with<F>(&mut self, f: F) -> DerResult<&mut Self>
    where
        F: FnOnce(&mut DerBuilder) -> DerResult<()>,
    {
        let mut sub = DerBuilder::new();
        f(&mut sub)?;
        Ok(self.push_tlv(Tag::OctetString.0 as u8, &sub.buf))
    }

    /// Append a BIT STRING (zero unused bits) whose content is produced by
    /// a nested builder. The element is emitted in primitive form.
    pub fn add_bit_string_with<F>(&mut self, f: F) -> DerResult<&mut Self>
    where
        F: FnOnce(&mut DerBuilder) -> DerResult<()>,
    {
        let mut sub = DerBuilder::new();
        f(&mut sub)?;
        let mut content = Vec::with_capacity(1 + sub.buf.len());
        content.push(0x00);
        content.extend_from_slice(&sub.buf);
        Ok(self.push_tlv(Tag::BitString.0 as u8, &content))
    }

    /// Append an IMPLICIT context-specific element.
    ///
    /// With `must_encode`, `bytes` are treated as content octets and
    /// wrapped with tag `0x80 | n`. Otherwise `bytes` must be a complete
    /// TLV whose first octet is overwritten with `0x80 | n`, length and
    /// payload preserved.
    pub fn add_implicit(
        &mut self,
        tag_number: u8,
        bytes: &[u8],
        must_encode: bool,
    ) -> DerResult<&mut Self> {
        self.add_tagged(TAG_CONTEXT_PRIMITIVE, tag_number, bytes, must_encode)
    }

    /// Append an EXPLICIT context-specific element (tag base `0xA0 | n`).
    pub fn add_explicit(
        &mut self,
        tag_number: u8,
        bytes: &[u8],
        must_encode: bool,
    ) -> DerResult<&mut Self> {
        self.add_tagged(TAG_CONTEXT_CONSTRUCTED, tag_number, bytes, must_encode)
    }

    fn add_tagged(
        &mut self,
        base: u8,
        tag_number: u8,
        bytes: &[u8],
        must_encode: bool,
    ) -> DerResult<&mut Self> {
        if tag_number > 30 {
            return Err(DerError::InvalidTag);
        }
        let tag = base | tag_number;
        if must_encode {
            return Ok(self.push_tlv(tag, bytes));
        }
        if bytes.is_empty() {
            return Err(DerError::EmptyInput);
        }
        let hdr = tlv::header_at(bytes)?;
        if hdr.full_len() != bytes.len() {
            return Err(DerError::InvalidData);
        }
        let mut retagged = bytes.to_vec();
        retagged[0] = tag;
        self.buf.extend_from_slice(&retagged);
        Ok(self)
    }

    /// Append an already-encoded TLV after checking that it parses.
    pub fn add_raw(&mut self, bytes: &[u8]) -> DerResult<&mut Self> {
        if bytes.is_empty() {
            return Err(DerError::EmptyInput);
        }
        let mut rdr = DerReader::new(bytes)?;
        if rdr.node().full_len != bytes.len() {
            return Err(DerError::InvalidData);
        }
        rdr.build_offset_map()?;
        self.buf.extend_from_slice(bytes);
        Ok(self)
    }

    /// Wrap arbitrary payload bytes with the given outer tag and append.
    pub fn add_raw_tagged(&mut self, outer_tag: u8, payload: &[u8]) -> &mut Self {
        self.push_tlv(outer_tag, payload)
    }

    /// The accumulated children wrapped in a SEQUENCE. Non-destructive.
    pub fn get_encoded(&self) -> Vec<u8> {
        self.get_encoded_as(TAG_SEQUENCE)
    }

    /// The accumulated children wrapped in `outer_tag`. Non-destructive.
    pub fn get_encoded_as(&self, outer_tag: u8) -> Vec<u8> {
        tlv::wrap(outer_tag, &self.buf)
    }

    /// Replace the internal state with its `outer_tag`-wrapped form and
    /// return a snapshot builder holding the same bytes.
    pub fn encode(&mut self, outer_tag: u8) -> DerBuilder {
        let wrapped = tlv::wrap(outer_tag, &self.buf);
        self.buf = wrapped.clone();
        DerBuilder { buf: wrapped }
    }
}
