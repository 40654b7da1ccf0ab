//! Two's-complement helpers for INTEGER and ENUMERATED content octets

use crate::error::{DerError, DerResult};

/// Is the highest bit of the first octet set? (sign bit of the encoding)
#[inline]
pub(crate) fn is_highest_bit_set(bytes: &[u8]) -> bool {
    bytes.first().map(|b| b & 0x80 != 0).unwrap_or(false)
}

/// Encode a signed integer with the minimum number of octets.
pub(crate) fn encode_i64(v: i64) -> Vec<u8> {
    let be = v.to_be_bytes();
    let mut skip = 0;
    while skip < 7 {
        let redundant = (be[skip] == 0x00 && be[skip + 1] & 0x80 == 0)
            || (be[skip] == 0xff && be[skip + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    be[skip..].to_vec()
}

/// Decode content octets as a signed 64-bit integer.
pub(crate) fn decode_i64(bytes: &[u8]) -> DerResult<i64> {
    if bytes.is_empty() {
        return Err(DerError::InvalidData);
    }
    if bytes.len() > 8 {
        return Err(DerError::Overflow);
    }
    let mut v = i64::from(bytes[0] as i8);
    for &b in &bytes[1..] {
        v = (v << 8) | i64::from(b);
    }
    Ok(v)
}

/// Decode content octets as an unsigned 64-bit integer.
///
/// A set sign bit means a negative value and is rejected.
pub(crate) fn decode_u64(mut bytes: &[u8]) -> DerResult<u64> {
    if bytes.is_empty() {
        return Err(DerError::InvalidData);
    }
    if is_highest_bit_set(bytes) {
        return Err(DerError::InvalidData);
    }
    if bytes.len() > 9 {
        return Err(DerError::Overflow);
    }
    if bytes.len() == 9 {
        if bytes[0] != 0 {
            return Err(DerError::Overflow);
        }
        bytes = &bytes[1..];
    }
    let mut v = 0u64;
    for &b in bytes {
        v = (v << 8) | u64::from(b);
    }
    Ok(v)
}
