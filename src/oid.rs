//! Object identifier codec: dotted-decimal strings to and from base-128
//! arc sequences (X.690 8.19)

use crate::error::{DerError, DerResult};
use crate::tlv::{self, Tag};

/// Maximum accepted length for a dotted-decimal OID string.
pub const MAX_OID_STRING_LEN: usize = 8192;

/// Well-known OIDs and their friendly names.
///
/// Consulted by the display surface; unknown OIDs fall back to the plain
/// dotted form.
pub const KNOWN_OIDS: &[(&str, &str)] = &[
    ("1.2.840.10040.4.1", "dsa"),
    ("1.2.840.10040.4.3", "dsaWithSha1"),
    ("1.2.840.10045.2.1", "ecPublicKey"),
    ("1.2.840.10045.3.1.7", "prime256v1"),
    ("1.2.840.10045.4.3.2", "ecdsaWithSHA256"),
    ("1.2.840.10045.4.3.3", "ecdsaWithSHA384"),
    ("1.2.840.113549.1.1.1", "rsaEncryption"),
    ("1.2.840.113549.1.1.5", "sha1WithRSAEncryption"),
    ("1.2.840.113549.1.1.10", "rsassaPss"),
    ("1.2.840.113549.1.1.11", "sha256WithRSAEncryption"),
    ("1.2.840.113549.1.1.12", "sha384WithRSAEncryption"),
    ("1.2.840.113549.1.1.13", "sha512WithRSAEncryption"),
    ("1.2.840.113549.1.7.1", "pkcs7-data"),
    ("1.2.840.113549.1.7.2", "pkcs7-signedData"),
    ("1.2.840.113549.1.9.1", "emailAddress"),
    ("1.2.840.113549.1.9.14", "extensionRequest"),
    ("1.3.6.1.5.5.7.1.1", "authorityInfoAccess"),
    ("1.3.6.1.5.5.7.3.1", "serverAuth"),
    ("1.3.6.1.5.5.7.3.2", "clientAuth"),
    ("1.3.6.1.5.5.7.3.9", "ocspSigning"),
    ("1.3.6.1.5.5.7.48.1", "ocsp"),
    ("1.3.6.1.5.5.7.48.1.1", "ocspBasic"),
    ("1.3.6.1.5.5.7.48.1.2", "ocspNonce"),
    ("1.3.6.1.5.5.7.48.2", "caIssuers"),
    ("1.3.14.3.2.26", "sha1"),
    ("2.5.4.3", "commonName"),
    ("2.5.4.5", "serialNumber"),
    ("2.5.4.6", "countryName"),
    ("2.5.4.7", "localityName"),
    ("2.5.4.8", "stateOrProvinceName"),
    ("2.5.4.10", "organizationName"),
    ("2.5.4.11", "organizationalUnitName"),
    ("2.5.29.14", "subjectKeyIdentifier"),
    ("2.5.29.15", "keyUsage"),
    ("2.5.29.17", "subjectAltName"),
    ("2.5.29.19", "basicConstraints"),
    ("2.5.29.20", "cRLNumber"),
    ("2.5.29.31", "cRLDistributionPoints"),
    ("2.5.29.35", "authorityKeyIdentifier"),
    ("2.5.29.37", "extKeyUsage"),
    ("2.16.840.1.101.3.4.2.1", "sha256"),
    ("2.16.840.1.101.3.4.2.2", "sha384"),
    ("2.16.840.1.101.3.4.2.3", "sha512"),
];

/// Friendly name for a dotted OID, if registered.
pub fn friendly_name(dotted: &str) -> Option<&'static str> {
    KNOWN_OIDS
        .iter()
        .find(|(oid, _)| *oid == dotted)
        .map(|(_, name)| *name)
}

/// Parse and validate a dotted-decimal OID string into its arcs.
///
/// At least three arcs are required (a two-arc identifier is degenerate),
/// the first arc must be 0, 1 or 2, and the second must not exceed 39 when
/// the first is 0 or 1.
pub fn parse_dotted(s: &str) -> DerResult<Vec<u64>> {
    if s.len() > MAX_OID_STRING_LEN {
        return Err(DerError::Overflow);
    }
    let arcs = s
        .split('.')
        .map(|a| a.parse::<u64>().map_err(|_| DerError::InvalidData))
        .collect::<DerResult<Vec<u64>>>()?;
    if arcs.len() < 3 {
        return Err(DerError::InvalidData);
    }
    if arcs[0] > 2 {
        return Err(DerError::InvalidData);
    }
    if arcs[0] < 2 && arcs[1] > 39 {
        return Err(DerError::InvalidData);
    }
    Ok(arcs)
}

fn push_base128(out: &mut Vec<u8>, v: u64) {
    if v == 0 {
        out.push(0x00);
        return;
    }
    // 7-bit groups, most significant first, continuation bit on all but last
    let mut groups = [0u8; 10];
    let mut n = 0;
    let mut v = v;
    while v > 0 {
        groups[n] = (v & 0x7f) as u8;
        v >>= 7;
        n += 1;
    }
    for i in (1..n).rev() {
        out.push(groups[i] | 0x80);
    }
    out.push(groups[0]);
}

/// Encode a dotted OID string as the content octets of an OBJECT IDENTIFIER.
///
/// The empty string encodes as an empty payload.
pub fn encode_payload(s: &str) -> DerResult<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let arcs = parse_dotted(s)?;
    let first = 40 * arcs[0] + arcs[1];
    if first > u64::from(u8::MAX) {
        return Err(DerError::InvalidData);
    }
    let mut out = Vec::with_capacity(1 + arcs.len());
    out.push(first as u8);
    for &arc in &arcs[2..] {
        push_base128(&mut out, arc);
    }
    Ok(out)
}

/// Encode a dotted OID string as a complete OBJECT IDENTIFIER TLV.
pub fn encode(s: &str) -> DerResult<Vec<u8>> {
    let payload = encode_payload(s)?;
    Ok(tlv::wrap(Tag::Oid.0 as u8, &payload))
}

/// Decode OBJECT IDENTIFIER content octets to a dotted-decimal string.
///
/// An empty payload decodes as the empty string.
pub fn decode_payload(payload: &[u8]) -> DerResult<String> {
    use std::fmt::Write;

    if payload.is_empty() {
        return Ok(String::new());
    }
    let b0 = payload[0];
    let mut s = String::new();
    let _ = write!(s, "{}.{}", b0 / 40, b0 % 40);
    let mut acc: u64 = 0;
    for &b in &payload[1..] {
        if acc & 0xfe00_0000_0000_0000 != 0 {
            return Err(DerError::Overflow);
        }
        acc = (acc << 7) | u64::from(b & 0x7f);
        if b & 0x80 == 0 {
            let _ = write!(s, ".{}", acc);
            acc = 0;
        }
    }
    // a dangling continuation bit means a truncated arc
    if payload[payload.len() - 1] & 0x80 != 0 {
        return Err(DerError::InvalidData);
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_known_oid() {
        let enc = encode("1.2.840.113549.1.1.11").unwrap();
        assert_eq!(enc, hex!("06 09 2A 86 48 86 F7 0D 01 01 0B"));
    }

    #[test]
    fn test_decode_known_oid() {
        let payload = hex!("2A 86 48 86 F7 0D 01 01 0B");
        assert_eq!(decode_payload(&payload).unwrap(), "1.2.840.113549.1.1.11");
    }

    #[test]
    fn test_roundtrip() {
        for oid in [
            "0.9.2342.19200300.100.1.25",
            "1.2.840.10045.4.3.2",
            "1.3.6.1.5.5.7.48.1.1",
            "2.5.4.3",
            "2.5.29.17",
            "2.16.840.1.101.3.4.2.1",
            "1.2.0.18446744073709551615",
        ] {
            let enc = encode_payload(oid).unwrap();
            assert_eq!(decode_payload(&enc).unwrap(), oid);
        }
    }

    #[test]
    fn test_zero_arc() {
        // trailing zero arc encodes as a single 0x00 octet
        let enc = encode_payload("1.2.0").unwrap();
        assert_eq!(enc, hex!("2a 00"));
        assert_eq!(decode_payload(&enc).unwrap(), "1.2.0");
    }

    #[test]
    fn test_empty_oid() {
        assert_eq!(encode("").unwrap(), hex!("06 00"));
        assert_eq!(decode_payload(&[]).unwrap(), "");
    }

    #[test]
    fn test_degenerate_and_invalid() {
        assert_eq!(parse_dotted("1.2"), Err(DerError::InvalidData));
        assert_eq!(parse_dotted("3.1.1"), Err(DerError::InvalidData));
        assert_eq!(parse_dotted("1.40.1"), Err(DerError::InvalidData));
        assert_eq!(parse_dotted("1.2.x"), Err(DerError::InvalidData));
        assert_eq!(
            parse_dotted("1.2.18446744073709551616"),
            Err(DerError::InvalidData)
        );
        // arc 1 is unconstrained under root arc 2
        assert!(parse_dotted("2.100.3").is_ok());
    }

    #[test]
    fn test_oversized_string() {
        let huge = format!("1.2.{}", "840.".repeat(2100)) + "1";
        assert!(huge.len() > MAX_OID_STRING_LEN);
        assert_eq!(parse_dotted(&huge), Err(DerError::Overflow));
    }

    #[test]
    fn test_truncated_arc() {
        assert_eq!(decode_payload(&hex!("2a 86")), Err(DerError::InvalidData));
    }

    #[test]
    fn test_friendly_name() {
        assert_eq!(
            friendly_name("1.2.840.113549.1.1.11"),
            Some("sha256WithRSAEncryption")
        );
        assert_eq!(friendly_name("1.2.3.4"), None);
    }
}
