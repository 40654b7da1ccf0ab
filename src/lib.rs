//! # DER codec
//!
//! A codec for Distinguished Encoding Rules (DER, [[X.690]]), built from
//! two halves:
//!
//! * a zero-copy **tree reader**, [`DerReader`], navigating an encoded
//!   buffer as a tree of tag-length-value elements without copying
//!   payloads,
//! * a **builder**, [`DerBuilder`], composing primitive and constructed
//!   values into byte sequences suitable for X.509, PKCS or OCSP
//!   structures.
//!
//! On top of both, [`DerValue`] offers typed decode/encode for the common
//! universal tags (OBJECT IDENTIFIER, UTCTime, GeneralizedTime, the string
//! family).
//!
//! The codec is strictly DER: indefinite lengths and other BER-only forms
//! are rejected. Multi-byte tag numbers are not supported.
//!
//! # Reading
//!
//! The reader is a cursor. `move_next` advances in tree-walk order
//! (descending into constructed elements), `move_next_same_level` walks a
//! sibling chain, and visited offsets can be revisited with `move_to`:
//!
//! ```rust
//! use der_codec::{DerReader, DerValue};
//!
//! let bytes = [0x30, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x03];
//! let mut rdr = DerReader::new(&bytes).expect("parsing failed");
//! assert!(rdr.node().constructed);
//! rdr.move_next().unwrap();
//! let v = DerValue::from_reader(&rdr).unwrap();
//! assert_eq!(v.as_i64(), Ok(5));
//! ```
//!
//! An OCTET STRING or BIT STRING whose payload is itself exactly one
//! well-formed element is reported as constructed, and `move_next`
//! descends into the encapsulated content.
//!
//! # Building
//!
//! ```rust
//! use der_codec::DerBuilder;
//!
//! let mut b = DerBuilder::new();
//! b.add_sequence_with(|b| {
//!     b.add_integer(1).add_utf8_string("hi");
//!     Ok(())
//! })
//! .unwrap();
//! let der = b.get_encoded();
//! assert_eq!(der[0], 0x30);
//! ```
//!
//! # References
//!
//! - [[X.680]] Abstract Syntax Notation One (ASN.1): Specification of basic
//!   notation.
//! - [[X.690]] ASN.1 encoding rules: Specification of Basic Encoding Rules
//!   (BER), Canonical Encoding Rules (CER) and Distinguished Encoding Rules
//!   (DER).
//!
//! [X.680]: http://www.itu.int/rec/T-REC-X.680/en "Abstract Syntax Notation One (ASN.1):
//!   Specification of basic notation."
//! [X.690]: https://www.itu.int/rec/T-REC-X.690/en "ASN.1 encoding rules: Specification of
//!   Basic Encoding Rules (BER), Canonical Encoding Rules (CER) and Distinguished Encoding Rules
//!   (DER)."

#![deny(
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unreachable_pub
)]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod builder;
pub mod datetime;
pub mod error;
mod integer;
pub mod oid;
pub mod reader;
pub mod tlv;
pub mod value;

pub use builder::DerBuilder;
pub use error::{DerError, DerResult};
pub use reader::{DerReader, Level, TlvNode};
pub use tlv::{Class, Tag, TlvHeader};
pub use value::{DerValue, TextEncoding, ValueKind};

pub extern crate nom;
#[cfg(feature = "bigint")]
#[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
pub extern crate num_bigint;
