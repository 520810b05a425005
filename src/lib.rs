//! `dnp3-apdu` library: a `no_std` codec for the DNP3 (IEEE 1815)
//! Application Layer object-header grammar. The crate exposes the
//! shared data model, the header/range/count readers, the object
//! catalogue and decoder, the capability-set `Handler` callback
//! interface, the `ApduParser` entry points, and the request-side
//! `Header` builder.
#![no_std]
//==================================================================================
/// Shared data types used across every stage of the pipeline: header
/// records, ranges, and indexed values.
pub mod core;
/// Parse-time and request-construction errors.
pub mod error;
/// Forward-only byte cursor shared by the header and range/count readers.
mod infra;
/// `(group, variation)` catalogue: payload shapes, fixed sizes, and the
/// single-record decoder.
pub mod catalogue;
/// Object header reader: group, variation, and qualifier byte.
pub mod header;
/// Range and count payload reader that follows an object header.
pub mod range_count;
/// Lazy, zero-copy sequences over a decoded range/count payload, and the
/// validation that builds them.
pub mod object;
/// Capability-set callback interface invoked while walking an APDU.
pub mod handler;
/// Stateless two-pass APDU parser built from the modules above.
pub mod parser;
/// Request-side object header builder.
pub mod request;
//==================================================================================
pub use catalogue::{GroupVariation, PayloadShape};
pub use core::{GroupVariationId, HeaderRecord, IndexedValue, Range};
pub use error::{HeaderValidationError, ParseError, ParseFailure};
pub use handler::{Handler, NullHandler, Stop};
pub use header::QualifierCode;
pub use parser::ApduParser;
pub use request::Header;
