//! Error definitions for the APDU codec.
//! Every fallible parse operation returns a `ParseFailure`: a `ParseError`
//! kind plus the byte offset at which it was detected.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Structural error kinds produced while parsing an APDU.
pub enum ParseError {
    /// The buffer ended inside a header, range/count, or payload.
    #[error("not enough data in buffer")]
    NotEnoughData,
    /// `(group, variation)` is not in the catalogue.
    #[error("unknown object {group}/{variation}")]
    UnknownObject { group: u8, variation: u8 },
    /// The qualifier byte is not one of the recognized codes.
    #[error("unknown qualifier code 0x{qualifier:02X}")]
    UnknownQualifier { qualifier: u8 },
    /// The `(group, variation, qualifier)` combination is not permitted.
    #[error("qualifier not permitted for object {group}/{variation}")]
    InvalidObjectQualifier { group: u8, variation: u8 },
    /// Well-formed header whose variation is illegal in this context.
    #[error("object {group}/{variation} is illegal in this context")]
    InvalidObject { group: u8, variation: u8 },
    /// `start > stop` in a range qualifier.
    #[error("range start {start} is greater than stop {stop}")]
    BadStartStop { start: u16, stop: u16 },
    /// The header claimed a size that overruns the buffer.
    #[error("header claims more object data than the buffer holds")]
    NotEnoughDataForObjects,
    /// The handler raised the "stop" signal mid-APDU (see `crate::handler::Stop`).
    #[error("handler requested early termination")]
    HandlerStopped,
}

/// A `ParseError` paired with the byte offset at which it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure {
    pub kind: ParseError,
    pub offset: usize,
}

impl core::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (at offset {})", self.kind, self.offset)
    }
}

/// Errors raised by the outward header-writing surface (`crate::request`).
/// Distinct from `ParseError` since writing validates a narrower set of
/// preconditions than parsing does.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderValidationError {
    #[error("range start {start} is greater than stop {stop}")]
    BadStartStop { start: u16, stop: u16 },
    #[error("count must be nonzero")]
    ZeroCount,
    #[error("buffer too small to hold the encoded header")]
    BufferTooSmall,
}
