use super::Class;
use rusticata_macros::newtype_enum;

/// TLV tag number as defined in X.680 section 8.4
///
/// Only single-octet tags are supported: tag numbers 0 and 31 (the
/// multi-byte escape) are rejected by the header parser.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Tag(pub u32);

newtype_enum! {
impl debug Tag {
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    Null = 0x05,
    Oid = 0x06,
    ObjDescriptor = 0x07,
    External = 0x08,
    RealType = 0x09,
    Enumerated = 0x0a,
    EmbeddedPdv = 0x0b,
    Utf8String = 0x0c,
    RelativeOid = 0x0d,

    Sequence = 0x10,
    Set = 0x11,
    NumericString = 0x12,
    PrintableString = 0x13,
    T61String = 0x14,
    VideotexString = 0x15,

    Ia5String = 0x16,
    UtcTime = 0x17,
    GeneralizedTime = 0x18,

    GraphicString = 0x19,
    VisibleString = 0x1a,
    GeneralString = 0x1b,

    UniversalString = 0x1c,
    BmpString = 0x1e,
}
}

impl From<u32> for Tag {
    fn from(v: u32) -> Self {
        Tag(v)
    }
}

/// Universal primitive tags that are never probed for nested TLVs.
///
/// These tags carry scalar or textual payloads; even a payload that happens
/// to look like a well-formed TLV chain must be left opaque.
pub const RESTRICTED_TAGS: &[Tag] = &[
    Tag::Boolean,
    Tag::Integer,
    Tag::Null,
    Tag::Oid,
    Tag::RealType,
    Tag::Enumerated,
    Tag::RelativeOid,
    Tag::Utf8String,
    Tag::NumericString,
    Tag::PrintableString,
    Tag::T61String,
    Tag::VideotexString,
    Tag::Ia5String,
    Tag::UtcTime,
    Tag::GeneralizedTime,
    Tag::GraphicString,
    Tag::VisibleString,
    Tag::GeneralString,
    Tag::UniversalString,
    Tag::BmpString,
];

/// Universal tags that commonly encapsulate another DER value.
pub const NESTED_CONTAINER_TAGS: &[Tag] = &[Tag::OctetString, Tag::BitString];

/// Name of a known universal tag number, if any.
fn universal_tag_name(n: u32) -> Option<&'static str> {
    let s = match Tag(n) {
        Tag::Boolean => "Boolean",
        Tag::Integer => "Integer",
        Tag::BitString => "BitString",
        Tag::OctetString => "OctetString",
        Tag::Null => "Null",
        Tag::Oid => "Oid",
        Tag::ObjDescriptor => "ObjDescriptor",
        Tag::External => "External",
        Tag::RealType => "RealType",
        Tag::Enumerated => "Enumerated",
        Tag::EmbeddedPdv => "EmbeddedPdv",
        Tag::Utf8String => "Utf8String",
        Tag::RelativeOid => "RelativeOid",
        Tag::Sequence => "Sequence",
        Tag::Set => "Set",
        Tag::NumericString => "NumericString",
        Tag::PrintableString => "PrintableString",
        Tag::T61String => "T61String",
        Tag::VideotexString => "VideotexString",
        Tag::Ia5String => "Ia5String",
        Tag::UtcTime => "UtcTime",
        Tag::GeneralizedTime => "GeneralizedTime",
        Tag::GraphicString => "GraphicString",
        Tag::VisibleString => "VisibleString",
        Tag::GeneralString => "GeneralString",
        Tag::UniversalString => "UniversalString",
        Tag::BmpString => "BmpString",
        _ => return None,
    };
    Some(s)
}

/// Human-readable label for a raw tag octet.
///
/// Universal tags use the tag-number enum name; other classes are rendered
/// as `APPLICATION (n)`, `CONTEXT_SPECIFIC [n]` or `PRIVATE (n)`.
/// A constructed universal tag with no enum name is `CONSTRUCTED (n)`.
pub fn tag_name(raw_tag: u8) -> String {
    let n = u32::from(raw_tag & 0x1f);
    let constructed = raw_tag & 0x20 != 0;
    let class = Class::from_tag_octet(raw_tag);
    match class {
        Class::Universal => match universal_tag_name(n) {
            Some(name) => name.to_string(),
            None if constructed => format!("CONSTRUCTED ({})", n),
            None => format!("{} ({})", class, n),
        },
        Class::ContextSpecific => format!("{} [{}]", class, n),
        Class::Application | Class::Private => format!("{} ({})", class, n),
    }
}
