//! Static registry mapping `(group, variation)` to a `GroupVariation` tag,
//! its on-wire shape, its fixed size (where applicable), and the decoder
//! for a single record. Closed tagged union, not open polymorphism: the
//! set of variations is fixed by the DNP3 standard.
pub mod values;

use values::{Binary, BinaryOutputStatus, DoubleBit, DoubleBitBinary, Flags, Value};

/// Which family of payload layout a `GroupVariation` uses. Drives how the
/// object decoder interprets the bytes following a range or count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    FixedSizeMeasurement,
    SingleBitPacked,
    DoubleBitPacked,
    OctetString,
    CountOnly,
    /// Group60 Class Data: legal only under `ALL_OBJECTS`, zero wire bytes.
    ClassData,
}

/// Closed tagged union of every known DNP3 object variation this codec
/// understands, plus `Unknown` for anything not in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupVariation {
    Group1Var1,
    Group1Var2,
    Group3Var1,
    Group3Var2,
    Group10Var1,
    Group10Var2,
    Group20Var1,
    Group20Var2,
    Group20Var5,
    Group20Var6,
    Group21Var1,
    Group21Var2,
    Group21Var5,
    Group21Var6,
    Group21Var9,
    Group21Var10,
    Group30Var1,
    Group30Var2,
    Group30Var3,
    Group30Var4,
    Group30Var5,
    Group30Var6,
    Group40Var1,
    Group40Var2,
    Group40Var3,
    Group40Var4,
    Group50Var1,
    Group50Var4,
    Group51Var1,
    Group51Var2,
    Group52Var2,
    Group60Var1,
    Group60Var2,
    Group60Var3,
    Group60Var4,
    Group80Var1,
    /// Group110, any variation; the variation byte doubles as the
    /// per-record octet-string length (0 is request-only, rejected by the
    /// object decoder in the data path).
    Group110AnyVar(u8),
    Unknown(u8, u8),
}

/// Resolves a raw `(group, variation)` pair against the catalogue.
pub fn lookup(group: u8, variation: u8) -> GroupVariation {
    match (group, variation) {
        (1, 1) => GroupVariation::Group1Var1,
        (1, 2) => GroupVariation::Group1Var2,
        (3, 1) => GroupVariation::Group3Var1,
        (3, 2) => GroupVariation::Group3Var2,
        (10, 1) => GroupVariation::Group10Var1,
        (10, 2) => GroupVariation::Group10Var2,
        (20, 1) => GroupVariation::Group20Var1,
        (20, 2) => GroupVariation::Group20Var2,
        (20, 5) => GroupVariation::Group20Var5,
        (20, 6) => GroupVariation::Group20Var6,
        (21, 1) => GroupVariation::Group21Var1,
        (21, 2) => GroupVariation::Group21Var2,
        (21, 5) => GroupVariation::Group21Var5,
        (21, 6) => GroupVariation::Group21Var6,
        (21, 9) => GroupVariation::Group21Var9,
        (21, 10) => GroupVariation::Group21Var10,
        (30, 1) => GroupVariation::Group30Var1,
        (30, 2) => GroupVariation::Group30Var2,
        (30, 3) => GroupVariation::Group30Var3,
        (30, 4) => GroupVariation::Group30Var4,
        (30, 5) => GroupVariation::Group30Var5,
        (30, 6) => GroupVariation::Group30Var6,
        (40, 1) => GroupVariation::Group40Var1,
        (40, 2) => GroupVariation::Group40Var2,
        (40, 3) => GroupVariation::Group40Var3,
        (40, 4) => GroupVariation::Group40Var4,
        (50, 1) => GroupVariation::Group50Var1,
        (50, 4) => GroupVariation::Group50Var4,
        (51, 1) => GroupVariation::Group51Var1,
        (51, 2) => GroupVariation::Group51Var2,
        (52, 2) => GroupVariation::Group52Var2,
        (60, 1) => GroupVariation::Group60Var1,
        (60, 2) => GroupVariation::Group60Var2,
        (60, 3) => GroupVariation::Group60Var3,
        (60, 4) => GroupVariation::Group60Var4,
        (80, 1) => GroupVariation::Group80Var1,
        (110, v) => GroupVariation::Group110AnyVar(v),
        (group, variation) => GroupVariation::Unknown(group, variation),
    }
}

fn u16le(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}
fn u32le(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
fn i16le(b: &[u8]) -> i16 {
    i16::from_le_bytes([b[0], b[1]])
}
fn i32le(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
fn f32le(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
fn f64le(b: &[u8]) -> f64 {
    f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}
/// DNP3 absolute time: 48-bit milliseconds since epoch, little-endian.
fn u48le(b: &[u8]) -> u64 {
    (b[0] as u64)
        | (b[1] as u64) << 8
        | (b[2] as u64) << 16
        | (b[3] as u64) << 24
        | (b[4] as u64) << 32
        | (b[5] as u64) << 40
}

impl GroupVariation {
    pub fn shape(&self) -> PayloadShape {
        use GroupVariation::*;
        match self {
            Group1Var1 | Group10Var1 | Group80Var1 => PayloadShape::SingleBitPacked,
            Group3Var1 => PayloadShape::DoubleBitPacked,
            Group110AnyVar(_) => PayloadShape::OctetString,
            Group60Var1 | Group60Var2 | Group60Var3 | Group60Var4 => PayloadShape::ClassData,
            Group50Var1 | Group51Var1 | Group51Var2 | Group52Var2 => PayloadShape::CountOnly,
            Unknown(_, _) => PayloadShape::FixedSizeMeasurement,
            _ => PayloadShape::FixedSizeMeasurement,
        }
    }

    /// On-wire size of one record, in bytes. `None` for the packed-bit
    /// shapes, whose per-record size is fractional and computed from the
    /// count instead (see `crate::object`).
    pub fn fixed_size(&self) -> Option<usize> {
        use GroupVariation::*;
        match self {
            Group1Var2 | Group3Var2 | Group10Var2 => Some(1),
            Group20Var1 => Some(5),
            Group20Var2 => Some(3),
            Group20Var5 => Some(4),
            Group20Var6 => Some(2),
            Group21Var1 => Some(5),
            Group21Var2 => Some(3),
            Group21Var5 => Some(11),
            Group21Var6 => Some(9),
            Group21Var9 => Some(4),
            Group21Var10 => Some(2),
            Group30Var1 => Some(5),
            Group30Var2 => Some(3),
            Group30Var3 => Some(4),
            Group30Var4 => Some(2),
            Group30Var5 => Some(5),
            Group30Var6 => Some(9),
            Group40Var1 => Some(5),
            Group40Var2 => Some(3),
            Group40Var3 => Some(5),
            Group40Var4 => Some(9),
            Group50Var1 => Some(6),
            Group50Var4 => Some(11),
            Group51Var1 => Some(6),
            Group51Var2 => Some(6),
            Group52Var2 => Some(2),
            Group60Var1 | Group60Var2 | Group60Var3 | Group60Var4 => Some(0),
            Group110AnyVar(v) => Some(*v as usize),
            Group1Var1 | Group10Var1 | Group80Var1 | Group3Var1 => None,
            Unknown(_, _) => None,
        }
    }

    /// Decodes one record from a byte slice exactly `fixed_size()` bytes
    /// long. Never called for the packed-bit shapes, which are decoded
    /// bit-by-bit over the whole payload instead (see `crate::object`).
    pub fn decode_one<'a>(&self, bytes: &'a [u8]) -> Value<'a> {
        use GroupVariation::*;
        match self {
            Group1Var2 => {
                let f = bytes[0];
                Value::Binary(Binary { value: f & 0x80 != 0, flags: Flags(f) })
            }
            Group3Var2 => {
                let f = bytes[0];
                let value = match (f >> 6) & 0x03 {
                    0b00 => DoubleBit::IntermediateState,
                    0b01 => DoubleBit::DeterminedOff,
                    0b10 => DoubleBit::DeterminedOn,
                    _ => DoubleBit::Indeterminate,
                };
                Value::DoubleBitBinary(DoubleBitBinary { value, raw_flags: f })
            }
            Group10Var2 => {
                let f = bytes[0];
                Value::BinaryOutputStatus(BinaryOutputStatus { value: f & 0x80 != 0, flags: Flags(f) })
            }
            Group20Var1 => Value::Counter32 { value: u32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group20Var2 => Value::Counter16 { value: u16le(&bytes[1..3]), flags: Flags(bytes[0]) },
            Group20Var5 => Value::CounterNoFlag32 { value: u32le(&bytes[0..4]) },
            Group20Var6 => Value::CounterNoFlag16 { value: u16le(&bytes[0..2]) },
            Group21Var1 => Value::FrozenCounter32 { value: u32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group21Var2 => Value::FrozenCounter16 { value: u16le(&bytes[1..3]), flags: Flags(bytes[0]) },
            Group21Var5 => Value::FrozenCounter32WithTime {
                value: u32le(&bytes[1..5]),
                flags: Flags(bytes[0]),
                time: u48le(&bytes[5..11]),
            },
            Group21Var6 => Value::FrozenCounter16WithTime {
                value: u16le(&bytes[1..3]),
                flags: Flags(bytes[0]),
                time: u48le(&bytes[3..9]),
            },
            Group21Var9 => Value::FrozenCounterNoFlag32 { value: u32le(&bytes[0..4]) },
            Group21Var10 => Value::FrozenCounterNoFlag16 { value: u16le(&bytes[0..2]) },
            Group30Var1 => Value::Analog32 { value: i32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group30Var2 => Value::Analog16 { value: i16le(&bytes[1..3]), flags: Flags(bytes[0]) },
            Group30Var3 => Value::AnalogNoFlag32 { value: i32le(&bytes[0..4]) },
            Group30Var4 => Value::AnalogNoFlag16 { value: i16le(&bytes[0..2]) },
            Group30Var5 => Value::AnalogFloat32 { value: f32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group30Var6 => Value::AnalogFloat64 { value: f64le(&bytes[1..9]), flags: Flags(bytes[0]) },
            Group40Var1 => Value::AnalogOutputStatus32 { value: i32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group40Var2 => Value::AnalogOutputStatus16 { value: i16le(&bytes[1..3]), flags: Flags(bytes[0]) },
            Group40Var3 => Value::AnalogOutputStatusFloat32 { value: f32le(&bytes[1..5]), flags: Flags(bytes[0]) },
            Group40Var4 => Value::AnalogOutputStatusFloat64 { value: f64le(&bytes[1..9]), flags: Flags(bytes[0]) },
            Group50Var1 => Value::AbsoluteTime { milliseconds: u48le(&bytes[0..6]) },
            Group50Var4 => Value::AbsoluteTimeWithInterval {
                milliseconds: u48le(&bytes[0..6]),
                interval_ms: u32le(&bytes[6..10]),
                interval_units: bytes[10],
            },
            Group51Var1 => Value::Cto { milliseconds: u48le(&bytes[0..6]) },
            Group51Var2 => Value::UnsyncCto { milliseconds: u48le(&bytes[0..6]) },
            Group52Var2 => Value::TimeDelayFine { milliseconds: u16le(&bytes[0..2]) },
            Group60Var1 | Group60Var2 | Group60Var3 | Group60Var4 => Value::ClassData,
            Group110AnyVar(_) => Value::OctetString(bytes),
            Group1Var1 | Group10Var1 | Group80Var1 | Group3Var1 => {
                unreachable!("packed-bit shapes decode via crate::object, not decode_one")
            }
            Unknown(_, _) => unreachable!("unknown group/variation is filtered before dispatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_pairs() {
        assert_eq!(lookup(60, 1), GroupVariation::Group60Var1);
        assert_eq!(lookup(1, 1), GroupVariation::Group1Var1);
        assert_eq!(lookup(110, 4), GroupVariation::Group110AnyVar(4));
    }

    #[test]
    fn lookup_falls_back_to_unknown() {
        assert_eq!(lookup(200, 5), GroupVariation::Unknown(200, 5));
    }

    #[test]
    fn group30var1_decodes_flags_and_signed_int() {
        let bytes = [0x01, 0x2A, 0x00, 0x00, 0x00];
        match GroupVariation::Group30Var1.decode_one(&bytes) {
            Value::Analog32 { value, flags } => {
                assert_eq!(value, 0x2A);
                assert!(flags.online());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group50var1_decodes_48_bit_time() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x01];
        match GroupVariation::Group50Var1.decode_one(&bytes) {
            Value::AbsoluteTime { milliseconds } => assert_eq!(milliseconds, 1u64 << 40),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group60_variants_have_zero_size_and_class_data_shape() {
        assert_eq!(GroupVariation::Group60Var1.fixed_size(), Some(0));
        assert_eq!(GroupVariation::Group60Var1.shape(), PayloadShape::ClassData);
    }

    #[test]
    fn octet_string_size_is_the_variation_byte() {
        assert_eq!(GroupVariation::Group110AnyVar(4).fixed_size(), Some(4));
        assert_eq!(GroupVariation::Group110AnyVar(4).shape(), PayloadShape::OctetString);
    }

    #[test]
    fn group50var4_is_eleven_bytes_including_the_interval_units_octet() {
        assert_eq!(GroupVariation::Group50Var4.fixed_size(), Some(11));
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x0A, 0x00, 0x00, 0x00, 0x02];
        match GroupVariation::Group50Var4.decode_one(&bytes) {
            Value::AbsoluteTimeWithInterval { milliseconds, interval_ms, interval_units } => {
                assert_eq!(milliseconds, 1u64 << 40);
                assert_eq!(interval_ms, 0x0A);
                assert_eq!(interval_units, 0x02);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group3var2_reads_state_from_the_high_bits_and_quality_from_the_low_bits() {
        // ONLINE | DETERMINED_ON
        let bytes = [0x81];
        match GroupVariation::Group3Var2.decode_one(&bytes) {
            Value::DoubleBitBinary(d) => {
                assert_eq!(d.value, DoubleBit::DeterminedOn);
                assert!(d.online());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
