//! UTCTime and GeneralizedTime codec (X.690 11.7, 11.8)
//!
//! Encoded strings are `YYMMDDhhmmss` (UTCTime) or `YYYYMMDDhhmmss`
//! (GeneralizedTime), optionally followed by `.fff` milliseconds, and
//! terminated by `Z` or a signed `±HHMM` zone suffix.

use crate::error::{DerError, DerResult};
use crate::tlv::{self, Tag};
use core::fmt::Write;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// First year encodable as UTCTime under the RFC 5280 century rule.
pub const UTC_TIME_MIN_YEAR: i32 = 1950;
/// First year requiring GeneralizedTime under the RFC 5280 century rule.
pub const UTC_TIME_END_YEAR: i32 = 2050;

fn wall_clock(dt: OffsetDateTime, zone: Option<UtcOffset>) -> PrimitiveDateTime {
    match zone {
        // no explicit zone: normalize to UTC and emit Zulu
        None => {
            let utc = dt.to_offset(UtcOffset::UTC);
            PrimitiveDateTime::new(utc.date(), utc.time())
        }
        // explicit zone: the caller's value is already the wall clock
        Some(_) => PrimitiveDateTime::new(dt.date(), dt.time()),
    }
}

fn time_string(
    dt: OffsetDateTime,
    zone: Option<UtcOffset>,
    precise: bool,
    generalized: bool,
) -> DerResult<String> {
    let wall = wall_clock(dt, zone);
    let year = wall.year();
    let mut s = String::with_capacity(20);
    if generalized {
        if !(0..=9999).contains(&year) {
            return Err(DerError::InvalidData);
        }
        let _ = write!(s, "{:04}", year);
    } else {
        if !(UTC_TIME_MIN_YEAR..UTC_TIME_END_YEAR).contains(&year) {
            return Err(DerError::InvalidData);
        }
        let _ = write!(s, "{:02}", year % 100);
    }
    let _ = write!(
        s,
        "{:02}{:02}{:02}{:02}{:02}",
        u8::from(wall.month()),
        wall.day(),
        wall.hour(),
        wall.minute(),
        wall.second()
    );
    if precise {
        let _ = write!(s, ".{:03}", wall.millisecond());
    }
    match zone {
        None => s.push('Z'),
        Some(z) => {
            let (h, m, _) = z.as_hms();
            // sign selection kept as-is for wire compatibility: a
            // non-negative offset is emitted with a leading '-'
            let sign = if h >= 0 && m >= 0 { '-' } else { '+' };
            let _ = write!(s, "{}{:02}{:02}", sign, h.abs(), m.abs());
        }
    }
    Ok(s)
}

/// Encode a date-time as a complete UTCTime TLV.
///
/// Fails with [`DerError::InvalidData`] for years outside 1950-2049; such
/// dates must use [`encode_generalized_time`].
pub fn encode_utc_time(
    dt: OffsetDateTime,
    zone: Option<UtcOffset>,
    precise: bool,
) -> DerResult<Vec<u8>> {
    let s = time_string(dt, zone, precise, false)?;
    Ok(tlv::wrap(Tag::UtcTime.0 as u8, s.as_bytes()))
}

/// Encode a date-time as a complete GeneralizedTime TLV.
pub fn encode_generalized_time(
    dt: OffsetDateTime,
    zone: Option<UtcOffset>,
    precise: bool,
) -> DerResult<Vec<u8>> {
    let s = time_string(dt, zone, precise, true)?;
    Ok(tlv::wrap(Tag::GeneralizedTime.0 as u8, s.as_bytes()))
}

/// Encode a date-time with the RFC 5280 format chooser: UTCTime for years
/// 1950-2049, GeneralizedTime otherwise.
pub fn encode_rfc5280_time(
    dt: OffsetDateTime,
    zone: Option<UtcOffset>,
    precise: bool,
) -> DerResult<Vec<u8>> {
    let year = wall_clock(dt, zone).year();
    if (UTC_TIME_MIN_YEAR..UTC_TIME_END_YEAR).contains(&year) {
        encode_utc_time(dt, zone, precise)
    } else {
        encode_generalized_time(dt, zone, precise)
    }
}

fn parse_digits<T: core::str::FromStr>(s: &str) -> DerResult<T> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DerError::InvalidData);
    }
    s.parse::<T>().map_err(|_| DerError::InvalidData)
}

/// Parse the fixed-width date-time prefix (12 or 14 characters).
///
/// Two-digit years pivot at 50: `50`-`99` map to 1950-1999, `00`-`49` to
/// 2000-2049.
fn parse_wall(s: &str, generalized: bool) -> DerResult<PrimitiveDateTime> {
    let (year, rest) = if generalized {
        (parse_digits::<i32>(&s[..4])?, &s[4..])
    } else {
        let yy = parse_digits::<i32>(&s[..2])?;
        let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
        (year, &s[2..])
    };
    let month: u8 = parse_digits(&rest[0..2])?;
    let day: u8 = parse_digits(&rest[2..4])?;
    let hour: u8 = parse_digits(&rest[4..6])?;
    let minute: u8 = parse_digits(&rest[6..8])?;
    let second: u8 = parse_digits(&rest[8..10])?;
    let month = Month::try_from(month).map_err(|_| DerError::InvalidData)?;
    let date = Date::from_calendar_date(year, month, day).map_err(|_| DerError::InvalidData)?;
    let t = Time::from_hms(hour, minute, second).map_err(|_| DerError::InvalidData)?;
    Ok(PrimitiveDateTime::new(date, t))
}

/// Decode UTCTime content octets.
pub fn decode_utc_time(payload: &[u8]) -> DerResult<OffsetDateTime> {
    decode_time(Tag::UtcTime, payload)
}

/// Decode GeneralizedTime content octets.
pub fn decode_generalized_time(payload: &[u8]) -> DerResult<OffsetDateTime> {
    decode_time(Tag::GeneralizedTime, payload)
}

/// Decode the content octets of a UTCTime or GeneralizedTime element.
///
/// Zulu times come back with a UTC offset. Explicit `±HHMM` suffixes are
/// applied hour-then-minute, with the minute component always applied as
/// negative; the resulting offset is attached when representable, UTC
/// otherwise.
pub fn decode_time(tag: Tag, payload: &[u8]) -> DerResult<OffsetDateTime> {
    let base_len = match tag {
        Tag::UtcTime => 12,
        Tag::GeneralizedTime => 14,
        _ => return Err(DerError::InvalidTag),
    };
    let s = core::str::from_utf8(payload).map_err(|_| DerError::InvalidData)?;
    // the fixed-width field slicing below assumes one byte per character
    if !s.is_ascii() || s.len() < base_len {
        return Err(DerError::InvalidData);
    }

    if let Some(zpos) = s.find('Z') {
        if zpos != s.len() - 1 {
            return Err(DerError::InvalidData);
        }
        let millis: i64 = if zpos == base_len {
            0
        } else if zpos == base_len + 4 && s.as_bytes()[base_len] == b'.' {
            parse_digits::<i64>(&s[base_len + 1..zpos])?
        } else {
            return Err(DerError::InvalidData);
        };
        let wall = parse_wall(&s[..base_len], base_len == 14)?;
        let dt = wall
            .checked_add(Duration::milliseconds(millis))
            .ok_or(DerError::InvalidData)?;
        return Ok(dt.assume_offset(UtcOffset::UTC));
    }

    let delim = s
        .find(|c| c == '+' || c == '-')
        .ok_or(DerError::InvalidData)?;
    if delim != base_len && (s.as_bytes().get(base_len) != Some(&b'.') || delim < base_len) {
        return Err(DerError::InvalidData);
    }
    let millis: i64 = match s.find('.') {
        Some(p) if p < delim => parse_digits(&s[p + 1..delim])?,
        Some(_) => return Err(DerError::InvalidData),
        None => 0,
    };
    let wall = parse_wall(&s[..base_len], base_len == 14)?;

    let suffix = &s[delim + 1..];
    if suffix.len() != 2 && suffix.len() != 4 {
        return Err(DerError::InvalidData);
    }
    let hh: i64 = parse_digits(&suffix[..2])?;
    let hours = if s.as_bytes()[delim] == b'-' { -hh } else { hh };
    // minute component is applied as negative regardless of the sign octet
    let minutes: i64 = if suffix.len() == 4 {
        -parse_digits::<i64>(&suffix[2..4])?
    } else {
        0
    };

    let dt = wall
        .checked_add(Duration::hours(hours))
        .and_then(|d| d.checked_add(Duration::minutes(minutes)))
        .and_then(|d| d.checked_add(Duration::milliseconds(millis)))
        .ok_or(DerError::InvalidData)?;
    let offset = UtcOffset::from_hms(hours as i8, minutes as i8, 0).unwrap_or(UtcOffset::UTC);
    Ok(dt.assume_offset(offset))
}
