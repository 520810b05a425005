//! Concrete measurement and control value types produced by the object
//! decoder. Each `(group, variation)` descriptor decodes into exactly one
//! of these `Value` variants.

/// Quality/state flags byte shared by most fixed-size measurement objects.
/// Bit layout: bit0 ONLINE, bit1 RESTART, bit2 COMM_LOST, bit3
/// REMOTE_FORCED, bit4 LOCAL_FORCED; bits 5/6 are type-specific
/// (chatter-filter for binaries, over-range/reference-error for analogs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(pub u8);

impl Flags {
    pub const ONLINE: u8 = 0x01;
    pub const RESTART: u8 = 0x02;
    pub const COMM_LOST: u8 = 0x04;
    pub const REMOTE_FORCED: u8 = 0x08;
    pub const LOCAL_FORCED: u8 = 0x10;

    pub fn online(&self) -> bool {
        self.0 & Self::ONLINE != 0
    }
    pub fn restart(&self) -> bool {
        self.0 & Self::RESTART != 0
    }
    pub fn comm_lost(&self) -> bool {
        self.0 & Self::COMM_LOST != 0
    }
    pub fn remote_forced(&self) -> bool {
        self.0 & Self::REMOTE_FORCED != 0
    }
    pub fn local_forced(&self) -> bool {
        self.0 & Self::LOCAL_FORCED != 0
    }
    pub fn chatter_filter(&self) -> bool {
        self.0 & 0x20 != 0
    }
    pub fn over_range(&self) -> bool {
        self.0 & 0x20 != 0
    }
    pub fn reference_err(&self) -> bool {
        self.0 & 0x40 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary {
    pub value: bool,
    pub flags: Flags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOutputStatus {
    pub value: bool,
    pub flags: Flags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleBit {
    IntermediateState,
    DeterminedOff,
    DeterminedOn,
    Indeterminate,
}

/// Double-bit binary objects pack their 2-bit state value into bits 6-7 of
/// the flags byte; the quality bits occupy the same low-bit positions as
/// `Flags`, so they are read the same way here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleBitBinary {
    pub value: DoubleBit,
    pub raw_flags: u8,
}

impl DoubleBitBinary {
    pub fn online(&self) -> bool {
        self.raw_flags & Flags::ONLINE != 0
    }
    pub fn restart(&self) -> bool {
        self.raw_flags & Flags::RESTART != 0
    }
    pub fn comm_lost(&self) -> bool {
        self.raw_flags & Flags::COMM_LOST != 0
    }
    pub fn chatter_filter(&self) -> bool {
        self.raw_flags & 0x20 != 0
    }
}

/// One fully decoded object value. The active variant is determined by
/// `HeaderRecord::gv`; the handler is expected to dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Binary(Binary),
    BinaryOutputStatus(BinaryOutputStatus),
    DoubleBitBinary(DoubleBitBinary),
    Counter32 { value: u32, flags: Flags },
    Counter16 { value: u16, flags: Flags },
    CounterNoFlag32 { value: u32 },
    CounterNoFlag16 { value: u16 },
    FrozenCounter32 { value: u32, flags: Flags },
    FrozenCounter16 { value: u16, flags: Flags },
    FrozenCounter32WithTime { value: u32, flags: Flags, time: u64 },
    FrozenCounter16WithTime { value: u16, flags: Flags, time: u64 },
    FrozenCounterNoFlag32 { value: u32 },
    FrozenCounterNoFlag16 { value: u16 },
    Analog32 { value: i32, flags: Flags },
    Analog16 { value: i16, flags: Flags },
    AnalogNoFlag32 { value: i32 },
    AnalogNoFlag16 { value: i16 },
    AnalogFloat32 { value: f32, flags: Flags },
    AnalogFloat64 { value: f64, flags: Flags },
    AnalogOutputStatus32 { value: i32, flags: Flags },
    AnalogOutputStatus16 { value: i16, flags: Flags },
    AnalogOutputStatusFloat32 { value: f32, flags: Flags },
    AnalogOutputStatusFloat64 { value: f64, flags: Flags },
    /// Group50Var1: absolute time sync, count-addressable.
    AbsoluteTime { milliseconds: u64 },
    /// Group50Var4: absolute time plus a measurement interval and the
    /// interval's time-unit enum, range-addressable.
    AbsoluteTimeWithInterval { milliseconds: u64, interval_ms: u32, interval_units: u8 },
    /// Group51Var1: Common Time of Occurrence.
    Cto { milliseconds: u64 },
    /// Group51Var2: unsynchronized Common Time of Occurrence.
    UnsyncCto { milliseconds: u64 },
    /// Group52Var2: fine time delay, in milliseconds.
    TimeDelayFine { milliseconds: u16 },
    /// Group60Var1..4: Class 0/1/2/3 Data marker, carries no payload.
    ClassData,
    /// Group110.AnyVar: opaque bytes, `variation` bytes long.
    OctetString(&'a [u8]),
}
