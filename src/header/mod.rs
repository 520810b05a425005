//! Reads the 3-byte object header (group, variation, qualifier) and
//! resolves the qualifier byte into a structural `QualifierCode`.
//! Resolution of `(group, variation)` against the catalogue is left to the
//! parser, which owns the `UnknownObject` error path.
use crate::error::ParseFailure;
use crate::infra::cursor::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierCode {
    AllObjects,
    Range8,
    Range16,
    Count8,
    Count16,
    CountAndPrefix8,
    CountAndPrefix16,
    Unknown(u8),
}

impl QualifierCode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x06 => Self::AllObjects,
            0x00 => Self::Range8,
            0x01 => Self::Range16,
            0x07 => Self::Count8,
            0x08 => Self::Count16,
            0x17 => Self::CountAndPrefix8,
            0x28 => Self::CountAndPrefix16,
            other => Self::Unknown(other),
        }
    }
}

/// Raw `(group, variation, qualifier)` triple read from the wire, before
/// resolution against the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    pub group: u8,
    pub variation: u8,
    pub qualifier: u8,
}

pub fn read_raw_header(cursor: &mut ByteCursor<'_>) -> Result<RawHeader, ParseFailure> {
    let group = cursor.read_u8()?;
    let variation = cursor.read_u8()?;
    let qualifier = cursor.read_u8()?;
    Ok(RawHeader { group, variation, qualifier })
}
