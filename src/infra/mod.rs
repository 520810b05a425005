//! Low-level byte-cursor infrastructure shared by the header, range/count,
//! and object decoders.
pub mod cursor;
