//! Capability-set handler invoked by the object decoder. Every method has
//! a no-op default so a caller only implements the payload shapes it
//! cares about.
use crate::core::HeaderRecord;
use crate::object::{CountSeq, IinSeq, IndexPrefixSeq, RangeSeq};

/// Raised by a handler method to request early termination of the current
/// APDU. The parser propagates it as `ParseError::HandlerStopped`; it does
/// not roll back callbacks already delivered for earlier headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop;

/// Capability set invoked by the object decoder while walking an APDU.
/// `T` inside each sequence is determined by `record.gv`; the handler is
/// expected to dispatch internally on it.
pub trait Handler {
    fn all_objects(&mut self, _record: &HeaderRecord) -> Result<(), Stop> {
        Ok(())
    }
    fn on_range(&mut self, _record: &HeaderRecord, _seq: RangeSeq<'_>) -> Result<(), Stop> {
        Ok(())
    }
    fn on_count(&mut self, _record: &HeaderRecord, _seq: CountSeq<'_>) -> Result<(), Stop> {
        Ok(())
    }
    fn on_index_prefix(&mut self, _record: &HeaderRecord, _seq: IndexPrefixSeq<'_>) -> Result<(), Stop> {
        Ok(())
    }
    fn on_iin(&mut self, _record: &HeaderRecord, _seq: IinSeq<'_>) -> Result<(), Stop> {
        Ok(())
    }
}

/// Handler that discards every callback; used by `parse_validate` and by
/// callers who only care about the validation verdict.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl Handler for NullHandler {}
