//! Errors produced while decoding.
//!
//! Parsers work with [`ParseError`], which remembers the remaining input
//! at the point of failure. [`crate::decode`] turns it into a
//! [`DecodeError`] carrying the absolute offset into the caller's bytes.

use nom::Offset;
use thiserror::Error;

pub use nom::error::ErrorKind as NomErrorKind;

/// The broad class of a decoding failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fewer bytes were available than a read required.
    TruncatedInput,
    /// Invalid UTF-8, or a byte outside the legal set for a tag,
    /// value type or section id.
    MalformedEncoding,
    /// A LEB128 integer was too long or did not fit its width.
    IntegerEncoding,
    /// The bytes were well-formed but violate the module's layout rules.
    StructuralViolation,
}

/// What exactly went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Reason {
    #[error("unexpected end of section or function")]
    UnexpectedEnd,
    #[error("unexpected end of magic header")]
    UnexpectedEndOfMagic,
    #[error("unexpected end of binary version")]
    UnexpectedEndOfVersion,

    #[error("integer representation too long")]
    IntTooLong,
    #[error("integer too large")]
    IntTooLarge,

    #[error("malformed UTF-8 encoding")]
    MalformedUtf8,
    #[error("malformed value type: {0}")]
    MalformedValType(u8),
    #[error("invalid functype tag: {0}")]
    InvalidFuncTypeTag(u8),
    #[error("invalid elemtype: {0}")]
    InvalidElemType(u8),
    #[error("malformed mutability: {0}")]
    MalformedMutability(u8),
    #[error("malformed limits flag: {0}")]
    MalformedLimitsFlag(u8),
    #[error("invalid import desc tag: {0}")]
    InvalidImportDescTag(u8),
    #[error("invalid export desc tag: {0}")]
    InvalidExportDescTag(u8),
    #[error("malformed section id: {0}")]
    MalformedSectionId(u8),

    #[error("junk after last section, id: {0}")]
    SectionOutOfOrder(u8),
    #[error("section size mismatch, id: {id}")]
    SectionSizeMismatch { id: u8, declared: u32, consumed: usize },
    #[error("magic header not detected")]
    MagicMismatch(u32),
    #[error("unknown binary version: {0}")]
    UnknownVersion(u32),
    #[error("function and code section have inconsistent lengths")]
    FuncCodeMismatch { funcs: usize, codes: usize },
    #[error("junk after last section")]
    TrailingBytes,
    #[error("too many locals: {0}")]
    TooManyLocals(u64),

    /// A failure reported by a nom combinator that has no dedicated reason.
    #[error("parser error: {0:?}")]
    Parser(NomErrorKind),
}

impl Reason {
    pub fn kind(&self) -> ErrorKind {
        use self::Reason::*;

        match *self {
            UnexpectedEnd
            | UnexpectedEndOfMagic
            | UnexpectedEndOfVersion => ErrorKind::TruncatedInput,

            IntTooLong
            | IntTooLarge => ErrorKind::IntegerEncoding,

            MalformedUtf8
            | MalformedValType(_)
            | InvalidFuncTypeTag(_)
            | InvalidElemType(_)
            | MalformedMutability(_)
            | MalformedLimitsFlag(_)
            | InvalidImportDescTag(_)
            | InvalidExportDescTag(_)
            | MalformedSectionId(_)
            | Parser(_) => ErrorKind::MalformedEncoding,

            SectionOutOfOrder(_)
            | SectionSizeMismatch { .. }
            | MagicMismatch(_)
            | UnknownVersion(_)
            | FuncCodeMismatch { .. }
            | TrailingBytes
            | TooManyLocals(_) => ErrorKind::StructuralViolation,
        }
    }
}

/// The single error returned by a failed decode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason} (at offset {offset:#x})")]
pub struct DecodeError {
    /// Offset into the decoded bytes at which the violation was detected.
    pub offset: usize,
    pub reason: Reason,
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        self.reason.kind()
    }
}

/// The error type threaded through all parsers.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError<'a> {
    pub input: &'a [u8],
    pub reason: Reason,
}

impl<'a> ParseError<'a> {
    pub fn new(input: &'a [u8], reason: Reason) -> Self {
        ParseError { input, reason }
    }

    /// `original` must be the slice decoding started on; every input a
    /// parser sees is a subslice of it.
    pub fn into_decode_error(self, original: &[u8]) -> DecodeError {
        DecodeError {
            offset: original.offset(self.input),
            reason: self.reason,
        }
    }
}

impl<'a> nom::error::ParseError<&'a [u8]> for ParseError<'a> {
    fn from_error_kind(input: &'a [u8], kind: NomErrorKind) -> Self {
        let reason = match kind {
            NomErrorKind::Eof => Reason::UnexpectedEnd,
            other => Reason::Parser(other),
        };
        ParseError { input, reason }
    }

    // The innermost error is the first violation; keep it.
    fn append(_: &'a [u8], _: NomErrorKind, other: Self) -> Self {
        other
    }
}

pub type PResult<'a, T> = nom::IResult<&'a [u8], T, ParseError<'a>>;

/// A non-recoverable failure at `input`.
pub fn failure<'a>(input: &'a [u8], reason: Reason) -> nom::Err<ParseError<'a>> {
    nom::Err::Failure(ParseError::new(input, reason))
}

pub fn fail<'a, T>(input: &'a [u8], reason: Reason) -> PResult<'a, T> {
    Err(failure(input, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_relative_to_original() {
        let bytes = [1, 2, 3, 4, 5];
        let err = ParseError::new(&bytes[3..], Reason::TrailingBytes);
        let err = err.into_decode_error(&bytes);
        assert_eq!(err.offset, 3);
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
        assert_eq!(err.to_string(), "junk after last section (at offset 0x3)");
    }

    #[test]
    fn nom_eof_is_truncation() {
        let bytes = [0u8; 2];
        let err = <ParseError as nom::error::ParseError<&[u8]>>::from_error_kind(
            &bytes[..], NomErrorKind::Eof);
        assert_eq!(err.reason, Reason::UnexpectedEnd);
        assert_eq!(err.reason.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn messages() {
        assert_eq!(Reason::MalformedSectionId(12).to_string(), "malformed section id: 12");
        assert_eq!(Reason::UnknownVersion(2).to_string(), "unknown binary version: 2");
        assert_eq!(
            Reason::SectionSizeMismatch { id: 3, declared: 2, consumed: 1 }.to_string(),
            "section size mismatch, id: 3"
        );
    }
}
