//! Dispatches a resolved header to the payload decoder matching its
//! `(group, variation, qualifier)` shape, and builds the lazy, borrow-only
//! sequence handed to the `Handler`. Every sequence here is a plain
//! `Iterator` over a sub-slice of the APDU buffer; none of them copy.
use crate::catalogue::values::{Binary, BinaryOutputStatus, DoubleBit, DoubleBitBinary, Flags, Value};
use crate::catalogue::{GroupVariation, PayloadShape};
use crate::core::{HeaderRecord, IndexedValue, Range};
use crate::error::ParseError;

//=======================================================================================sequences

/// Range-addressed or octet-string payload: fixed-stride records indexed
/// `range.start + i`.
#[derive(Clone)]
pub struct StridedSeq<'a> {
    bytes: &'a [u8],
    gv: GroupVariation,
    next_index: u16,
    remaining: u32,
    elem_size: usize,
    pos: usize,
}

impl<'a> Iterator for StridedSeq<'a> {
    type Item = IndexedValue<Value<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + self.elem_size];
        let value = self.gv.decode_one(slice);
        let index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);
        self.pos += self.elem_size;
        self.remaining -= 1;
        Some(IndexedValue::new(index, value))
    }
}

#[derive(Clone, Copy)]
enum BoolKind {
    BinaryInput,
    BinaryOutputStatus,
}

fn bit_at(bytes: &[u8], i: u32) -> bool {
    (bytes[(i / 8) as usize] >> (i % 8)) & 1 == 1
}

/// Packed single-bit range (Group1Var1, Group10Var1), mapped to `Binary`
/// or `BinaryOutputStatus` per §4.4.
#[derive(Clone)]
pub struct BitMappedSeq<'a> {
    bytes: &'a [u8],
    next_index: u16,
    remaining: u32,
    pos: u32,
    kind: BoolKind,
}

impl<'a> Iterator for BitMappedSeq<'a> {
    type Item = IndexedValue<Value<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bit = bit_at(self.bytes, self.pos);
        let online = if bit { Flags::ONLINE } else { 0 };
        let value = match self.kind {
            BoolKind::BinaryInput => Value::Binary(Binary { value: bit, flags: Flags(online) }),
            BoolKind::BinaryOutputStatus => {
                Value::BinaryOutputStatus(BinaryOutputStatus { value: bit, flags: Flags(online) })
            }
        };
        let index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);
        self.pos += 1;
        self.remaining -= 1;
        Some(IndexedValue::new(index, value))
    }
}

/// Raw bit sequence delivered to `Handler::on_iin` (Group80Var1); no
/// value mapping, since IIN bits have no associated quality flags.
#[derive(Clone)]
pub struct IinSeq<'a> {
    bytes: &'a [u8],
    next_index: u16,
    remaining: u32,
    pos: u32,
}

impl<'a> Iterator for IinSeq<'a> {
    type Item = IndexedValue<bool>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bit = bit_at(self.bytes, self.pos);
        let index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);
        self.pos += 1;
        self.remaining -= 1;
        Some(IndexedValue::new(index, bit))
    }
}

/// 2 bits per point, 4 points per byte, low pair first.
fn double_bit_at(bytes: &[u8], i: u32) -> DoubleBit {
    let byte = bytes[(i / 4) as usize];
    let shift = (i % 4) * 2;
    match (byte >> shift) & 0b11 {
        0b00 => DoubleBit::IntermediateState,
        0b01 => DoubleBit::DeterminedOff,
        0b10 => DoubleBit::DeterminedOn,
        _ => DoubleBit::Indeterminate,
    }
}

#[derive(Clone)]
pub struct DoubleBitMappedSeq<'a> {
    bytes: &'a [u8],
    next_index: u16,
    remaining: u32,
    pos: u32,
}

impl<'a> Iterator for DoubleBitMappedSeq<'a> {
    type Item = IndexedValue<Value<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = Value::DoubleBitBinary(DoubleBitBinary { value: double_bit_at(self.bytes, self.pos), raw_flags: 0 });
        let index = self.next_index;
        self.next_index = self.next_index.wrapping_add(1);
        self.pos += 1;
        self.remaining -= 1;
        Some(IndexedValue::new(index, value))
    }
}

/// Sequence passed to `Handler::on_range`; concrete shape depends on the
/// resolved `GroupVariation`.
pub enum RangeSeq<'a> {
    Strided(StridedSeq<'a>),
    Bits(BitMappedSeq<'a>),
    DoubleBits(DoubleBitMappedSeq<'a>),
}

impl<'a> Iterator for RangeSeq<'a> {
    type Item = IndexedValue<Value<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RangeSeq::Strided(s) => s.next(),
            RangeSeq::Bits(s) => s.next(),
            RangeSeq::DoubleBits(s) => s.next(),
        }
    }
}

/// Sequence passed to `Handler::on_count`: unindexed fixed-size records.
#[derive(Clone)]
pub struct CountSeq<'a> {
    bytes: &'a [u8],
    gv: GroupVariation,
    remaining: u32,
    elem_size: usize,
    pos: usize,
}

impl<'a> Iterator for CountSeq<'a> {
    type Item = Value<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + self.elem_size];
        let value = self.gv.decode_one(slice);
        self.pos += self.elem_size;
        self.remaining -= 1;
        Some(value)
    }
}

#[derive(Clone, Copy)]
enum IndexWidth {
    U8,
    U16,
}

/// Sequence passed to `Handler::on_index_prefix`: each record is preceded
/// by its own little-endian index.
#[derive(Clone)]
pub struct IndexPrefixSeq<'a> {
    bytes: &'a [u8],
    gv: GroupVariation,
    remaining: u32,
    elem_size: usize,
    index_width: IndexWidth,
    pos: usize,
}

impl<'a> Iterator for IndexPrefixSeq<'a> {
    type Item = IndexedValue<Value<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (index, idx_len) = match self.index_width {
            IndexWidth::U8 => (self.bytes[self.pos] as u16, 1),
            IndexWidth::U16 => (u16::from_le_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]), 2),
        };
        self.pos += idx_len;
        let slice = &self.bytes[self.pos..self.pos + self.elem_size];
        let value = self.gv.decode_one(slice);
        self.pos += self.elem_size;
        self.remaining -= 1;
        Some(IndexedValue::new(index, value))
    }
}

//=======================================================================================entry points

/// What a range header resolves to: a typed sequence for `on_range`, or
/// the raw IIN bits for `on_iin` (Group80Var1 only).
pub enum RangeBuild<'a> {
    Range(RangeSeq<'a>),
    Iin(IinSeq<'a>),
}

/// Validates a range-addressed header against the catalogue and, if
/// legal, returns the payload byte count it claims plus the lazy sequence
/// to hand the handler.
pub fn build_range<'a>(bytes: &'a [u8], record: &HeaderRecord, range: Range) -> Result<(usize, RangeBuild<'a>), ParseError> {
    let count = range.count();
    match record.gv.shape() {
        PayloadShape::FixedSizeMeasurement | PayloadShape::OctetString => {
            if let GroupVariation::Group110AnyVar(0) = record.gv {
                return Err(ParseError::InvalidObject { group: record.raw_group, variation: record.raw_variation });
            }
            let elem_size = record.gv.fixed_size().unwrap_or(0);
            let total = count as usize * elem_size;
            if bytes.len() < total {
                return Err(ParseError::NotEnoughDataForObjects);
            }
            let seq = StridedSeq { bytes: &bytes[..total], gv: record.gv, next_index: range.start, remaining: count, elem_size, pos: 0 };
            Ok((total, RangeBuild::Range(RangeSeq::Strided(seq))))
        }
        PayloadShape::SingleBitPacked => {
            let total = (count as usize + 7) / 8;
            if bytes.len() < total {
                return Err(ParseError::NotEnoughDataForObjects);
            }
            let slice = &bytes[..total];
            if record.gv == GroupVariation::Group80Var1 {
                let seq = IinSeq { bytes: slice, next_index: range.start, remaining: count, pos: 0 };
                Ok((total, RangeBuild::Iin(seq)))
            } else {
                let kind = if record.gv == GroupVariation::Group10Var1 {
                    BoolKind::BinaryOutputStatus
                } else {
                    BoolKind::BinaryInput
                };
                let seq = BitMappedSeq { bytes: slice, next_index: range.start, remaining: count, pos: 0, kind };
                Ok((total, RangeBuild::Range(RangeSeq::Bits(seq))))
            }
        }
        PayloadShape::DoubleBitPacked => {
            let total = (count as usize + 3) / 4;
            if bytes.len() < total {
                return Err(ParseError::NotEnoughDataForObjects);
            }
            let seq = DoubleBitMappedSeq { bytes: &bytes[..total], next_index: range.start, remaining: count, pos: 0 };
            Ok((total, RangeBuild::Range(RangeSeq::DoubleBits(seq))))
        }
        PayloadShape::CountOnly | PayloadShape::ClassData => {
            Err(ParseError::InvalidObjectQualifier { group: record.raw_group, variation: record.raw_variation })
        }
    }
}

/// Validates a count-addressed header and, if legal, returns the payload
/// byte count plus the unindexed sequence to hand the handler.
pub fn build_count<'a>(bytes: &'a [u8], record: &HeaderRecord, count: u32) -> Result<(usize, CountSeq<'a>), ParseError> {
    match record.gv.shape() {
        PayloadShape::CountOnly => {
            let elem_size = record.gv.fixed_size().unwrap_or(0);
            let total = count as usize * elem_size;
            if bytes.len() < total {
                return Err(ParseError::NotEnoughDataForObjects);
            }
            Ok((total, CountSeq { bytes: &bytes[..total], gv: record.gv, remaining: count, elem_size, pos: 0 }))
        }
        _ => Err(ParseError::InvalidObjectQualifier { group: record.raw_group, variation: record.raw_variation }),
    }
}

/// Validates a count-with-index-prefix header and, if legal, returns the
/// payload byte count plus the indexed sequence to hand the handler.
/// Legal for any fixed-size-shaped variation; the mechanism is structural
/// and does not restrict by group.
pub fn build_index_prefix<'a>(
    bytes: &'a [u8],
    record: &HeaderRecord,
    count: u32,
    index_width_is_16: bool,
) -> Result<(usize, IndexPrefixSeq<'a>), ParseError> {
    match record.gv.shape() {
        PayloadShape::FixedSizeMeasurement | PayloadShape::OctetString => {
            if let GroupVariation::Group110AnyVar(0) = record.gv {
                return Err(ParseError::InvalidObject { group: record.raw_group, variation: record.raw_variation });
            }
            let elem_size = record.gv.fixed_size().unwrap_or(0);
            let idx_len = if index_width_is_16 { 2 } else { 1 };
            let stride = idx_len + elem_size;
            let total = count as usize * stride;
            if bytes.len() < total {
                return Err(ParseError::NotEnoughDataForObjects);
            }
            let index_width = if index_width_is_16 { IndexWidth::U16 } else { IndexWidth::U8 };
            Ok((total, IndexPrefixSeq { bytes: &bytes[..total], gv: record.gv, remaining: count, elem_size, index_width, pos: 0 }))
        }
        _ => Err(ParseError::InvalidObjectQualifier { group: record.raw_group, variation: record.raw_variation }),
    }
}
