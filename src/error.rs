//! Error type for the DER reader and builder

use displaydoc::Display;
use nom::error::{ErrorKind, FromExternalError, ParseError};
use nom::IResult;
use thiserror::Error;

/// Holds the result of the nom-based TLV header parsers
///
/// This type is a wrapper around nom's `IResult` type, using [`DerError`] as
/// the error type.
pub type TlvResult<'a, O> = IResult<&'a [u8], O, DerError>;

/// Crate-wide result alias
pub type DerResult<T> = Result<T, DerError>;

/// Error for the DER codec
#[derive(Debug, PartialEq, Eq, Copy, Clone, Display, Error)]
pub enum DerError {
    /// Tag at the current position does not match the expected tag
    InvalidTag,

    /// Byte sequence is not a well-formed DER TLV
    InvalidData,

    /// Length field or value exceeds the supported bounds
    Overflow,

    /// A required input was absent or empty
    EmptyInput,
}

impl DerError {
    /// Unwrap the codec error carried by a nom error.
    ///
    /// `Incomplete` cannot be produced by the complete-input parsers of this
    /// crate, but is mapped to [`DerError::InvalidData`] for totality.
    #[inline]
    pub(crate) fn from_nom(e: nom::Err<DerError>) -> Self {
        match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(_) => DerError::InvalidData,
        }
    }
}

impl From<DerError> for nom::Err<DerError> {
    #[inline]
    fn from(e: DerError) -> nom::Err<DerError> {
        nom::Err::Error(e)
    }
}

impl<I> ParseError<I> for DerError {
    fn from_error_kind(_input: I, _kind: ErrorKind) -> Self {
        DerError::InvalidData
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E> FromExternalError<I, E> for DerError {
    fn from_external_error(_input: I, _kind: ErrorKind, _e: E) -> DerError {
        DerError::InvalidData
    }
}
