//! Orchestrates the header reader, range/count decoder, and object decoder
//! over one APDU buffer, in validate-only or validate-then-emit mode.
use crate::catalogue::{self, GroupVariation};
use crate::core::HeaderRecord;
use crate::error::{ParseError, ParseFailure};
use crate::handler::{Handler, NullHandler, Stop};
use crate::header::{read_raw_header, QualifierCode};
use crate::infra::cursor::ByteCursor;
use crate::object::{self, RangeBuild};
use crate::range_count::{self, RangeOrCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Validate,
    Emit,
}

#[cfg(feature = "defmt")]
fn log_rejected(offset: usize, kind: &ParseError) {
    defmt::warn!("apdu: rejected header at offset {}: {:?}", offset, defmt::Debug2Format(kind));
}

#[cfg(not(feature = "defmt"))]
fn log_rejected(_offset: usize, _kind: &ParseError) {}

/// Stateless APDU object-header parser. Holds no state between calls;
/// every entry point borrows the input buffer for the duration of the
/// call and is safe to invoke concurrently on distinct buffers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApduParser;

impl ApduParser {
    pub const fn new() -> Self {
        Self
    }

    /// Single pass with no handler; returns the first structural error, if any.
    pub fn parse_validate(&self, buffer: &[u8]) -> Result<(), ParseFailure> {
        self.run(buffer, Mode::Validate, &mut NullHandler)
    }

    /// Single pass, invoking `handler` for every header.
    pub fn parse_and_emit<H: Handler>(&self, buffer: &[u8], handler: &mut H) -> Result<(), ParseFailure> {
        self.run(buffer, Mode::Emit, handler)
    }

    /// Validates the whole APDU first; only if that succeeds does it run a
    /// second pass that invokes `handler`. Guarantees the handler sees no
    /// callbacks at all for a malformed APDU.
    pub fn parse_two_pass<H: Handler>(&self, buffer: &[u8], handler: &mut H) -> Result<(), ParseFailure> {
        self.parse_validate(buffer)?;
        self.parse_and_emit(buffer, handler)
    }

    fn run<H: Handler>(&self, buffer: &[u8], mode: Mode, handler: &mut H) -> Result<(), ParseFailure> {
        let mut cursor = ByteCursor::new(buffer);
        while !cursor.is_empty() {
            if let Err(failure) = self.parse_one_header(&mut cursor, mode, handler) {
                log_rejected(failure.offset, &failure.kind);
                return Err(failure);
            }
        }
        Ok(())
    }

    fn parse_one_header<H: Handler>(&self, cursor: &mut ByteCursor, mode: Mode, handler: &mut H) -> Result<(), ParseFailure> {
        let header_offset = cursor.position();
        let raw = read_raw_header(cursor)?;
        let gv = catalogue::lookup(raw.group, raw.variation);
        if let GroupVariation::Unknown(group, variation) = gv {
            return Err(ParseFailure { kind: ParseError::UnknownObject { group, variation }, offset: header_offset });
        }

        let qualifier = QualifierCode::from_byte(raw.qualifier);
        let record = HeaderRecord { gv, raw_group: raw.group, raw_variation: raw.variation, qualifier };

        match qualifier {
            QualifierCode::AllObjects => {
                if mode == Mode::Emit {
                    handler
                        .all_objects(&record)
                        .map_err(|Stop| ParseFailure { kind: ParseError::HandlerStopped, offset: header_offset })?;
                }
                Ok(())
            }
            QualifierCode::Unknown(q) => {
                Err(ParseFailure { kind: ParseError::UnknownQualifier { qualifier: q }, offset: header_offset })
            }
            _ => self.parse_addressed_payload(cursor, qualifier, &record, mode, handler),
        }
    }

    fn parse_addressed_payload<H: Handler>(
        &self,
        cursor: &mut ByteCursor,
        qualifier: QualifierCode,
        record: &HeaderRecord,
        mode: Mode,
        handler: &mut H,
    ) -> Result<(), ParseFailure> {
        let decoded = range_count::decode(cursor, qualifier)?.expect("AllObjects handled by the caller");
        let payload_offset = cursor.position();
        let rest = cursor.rest();

        match decoded {
            RangeOrCount::Range(range) => {
                let (consumed, built) =
                    object::build_range(rest, record, range).map_err(|kind| ParseFailure { kind, offset: payload_offset })?;
                cursor.advance(consumed)?;
                if mode == Mode::Emit {
                    let result = match built {
                        RangeBuild::Range(seq) => handler.on_range(record, seq),
                        RangeBuild::Iin(seq) => handler.on_iin(record, seq),
                    };
                    result.map_err(|Stop| ParseFailure { kind: ParseError::HandlerStopped, offset: payload_offset })?;
                }
                Ok(())
            }
            RangeOrCount::Count(count) => {
                let is_index_prefixed =
                    matches!(qualifier, QualifierCode::CountAndPrefix8 | QualifierCode::CountAndPrefix16);
                if is_index_prefixed {
                    let is16 = qualifier == QualifierCode::CountAndPrefix16;
                    let (consumed, seq) = object::build_index_prefix(rest, record, count, is16)
                        .map_err(|kind| ParseFailure { kind, offset: payload_offset })?;
                    cursor.advance(consumed)?;
                    if mode == Mode::Emit {
                        handler
                            .on_index_prefix(record, seq)
                            .map_err(|Stop| ParseFailure { kind: ParseError::HandlerStopped, offset: payload_offset })?;
                    }
                } else {
                    let (consumed, seq) = object::build_count(rest, record, count)
                        .map_err(|kind| ParseFailure { kind, offset: payload_offset })?;
                    cursor.advance(consumed)?;
                    if mode == Mode::Emit {
                        handler
                            .on_count(record, seq)
                            .map_err(|Stop| ParseFailure { kind: ParseError::HandlerStopped, offset: payload_offset })?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::values::Value;
    use crate::object::{CountSeq, IinSeq, IndexPrefixSeq, RangeSeq};

    #[derive(Default)]
    struct RecordingHandler {
        all_objects: u32,
        range_values: Vec<(u16, bool)>,
        analog_indices: Vec<u16>,
    }

    impl Handler for RecordingHandler {
        fn all_objects(&mut self, _record: &HeaderRecord) -> Result<(), Stop> {
            self.all_objects += 1;
            Ok(())
        }

        fn on_range(&mut self, record: &HeaderRecord, seq: RangeSeq<'_>) -> Result<(), Stop> {
            if record.gv == GroupVariation::Group1Var1 {
                for iv in seq {
                    if let Value::Binary(b) = iv.value {
                        self.range_values.push((iv.index, b.value));
                    }
                }
            } else {
                for iv in seq {
                    self.analog_indices.push(iv.index);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn all_objects_header_invokes_handler() {
        let buf = [0x3C, 0x01, 0x06];
        let mut h = RecordingHandler::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.all_objects, 1);
    }

    #[test]
    fn binary_range_scenario_matches_worked_example() {
        let buf = [0x01, 0x01, 0x00, 0x02, 0x04, 0x0A];
        let mut h = RecordingHandler::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.range_values, vec![(2, false), (3, true), (4, false)]);
    }

    #[test]
    fn analog_range_scenario_matches_worked_example() {
        let buf = [0x1E, 0x01, 0x00, 0x00, 0x01, 0x01, 0x2A, 0x00, 0x00, 0x00, 0x01, 0x2B, 0x00, 0x00, 0x00];
        let mut h = RecordingHandler::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.analog_indices, vec![0, 1]);
    }

    #[test]
    fn malformed_range_is_bad_start_stop() {
        let buf = [0x01, 0x01, 0x00, 0x04, 0x02];
        let err = ApduParser::new().parse_validate(&buf).unwrap_err();
        assert_eq!(err.kind, ParseError::BadStartStop { start: 4, stop: 2 });
    }

    #[test]
    fn unknown_qualifier_scenario() {
        let buf = [0x01, 0x01, 0xFF];
        let err = ApduParser::new().parse_validate(&buf).unwrap_err();
        assert_eq!(err.kind, ParseError::UnknownQualifier { qualifier: 0xFF });
    }

    #[test]
    fn octet_string_scenario() {
        let buf = [0x6E, 0x04, 0x00, 0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF, 0xC0, 0xDE, 0xCA, 0xFE];
        #[derive(Default)]
        struct Collector(Vec<(u16, usize)>);
        impl Handler for Collector {
            fn on_range(&mut self, _record: &HeaderRecord, seq: RangeSeq<'_>) -> Result<(), Stop> {
                for iv in seq {
                    if let Value::OctetString(s) = iv.value {
                        self.0.push((iv.index, s.len()));
                    }
                }
                Ok(())
            }
        }
        let mut h = Collector::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.0, vec![(0, 4), (1, 4)]);
    }

    #[test]
    fn truncated_payload_yields_not_enough_data_for_objects_and_no_callbacks() {
        let buf = [0x6E, 0x04, 0x00, 0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF, 0xC0, 0xDE, 0xCA];
        let mut h = RecordingHandler::default();
        let err = ApduParser::new().parse_two_pass(&buf, &mut h).unwrap_err();
        assert_eq!(err.kind, ParseError::NotEnoughDataForObjects);
        assert_eq!(h.all_objects, 0);
        assert!(h.range_values.is_empty());
    }

    #[test]
    fn unknown_object_is_rejected() {
        let buf = [0xFF, 0xFF, 0x06];
        let err = ApduParser::new().parse_validate(&buf).unwrap_err();
        assert_eq!(err.kind, ParseError::UnknownObject { group: 0xFF, variation: 0xFF });
    }

    #[test]
    fn trailing_short_header_is_not_enough_data() {
        let buf = [0x3C, 0x01, 0x06, 0x01];
        let err = ApduParser::new().parse_validate(&buf).unwrap_err();
        assert_eq!(err.kind, ParseError::NotEnoughData);
    }

    #[test]
    fn handler_stop_signal_is_propagated_as_terminal_error() {
        struct Stopper;
        impl Handler for Stopper {
            fn all_objects(&mut self, _record: &HeaderRecord) -> Result<(), Stop> {
                Err(Stop)
            }
        }
        let buf = [0x3C, 0x01, 0x06];
        let err = ApduParser::new().parse_and_emit(&buf, &mut Stopper).unwrap_err();
        assert_eq!(err.kind, ParseError::HandlerStopped);
    }

    #[test]
    fn multiple_headers_in_one_buffer_all_run() {
        let buf = [0x3C, 0x01, 0x06, 0x3C, 0x02, 0x06];
        let mut h = RecordingHandler::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.all_objects, 2);
    }

    #[test]
    fn count_and_index_prefix_qualifiers_round_trip() {
        // Group30Var4 (2-byte no-flag analog), count-with-8-bit-index-prefix.
        let buf = [0x1E, 0x04, 0x17, 0x02, 0x00, 0x2A, 0x00, 0x01, 0x2B, 0x00];
        #[derive(Default)]
        struct Collector(Vec<(u16, i16)>);
        impl Handler for Collector {
            fn on_index_prefix(&mut self, _record: &HeaderRecord, seq: IndexPrefixSeq<'_>) -> Result<(), Stop> {
                for iv in seq {
                    if let Value::AnalogNoFlag16 { value } = iv.value {
                        self.0.push((iv.index, value));
                    }
                }
                Ok(())
            }
        }
        let mut h = Collector::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.0, vec![(0, 0x2A), (1, 0x2B)]);
    }

    #[test]
    fn iin_bits_are_delivered_via_on_iin() {
        let buf = [0x50, 0x01, 0x00, 0x00, 0x07, 0x03];
        #[derive(Default)]
        struct Collector(Vec<(u16, bool)>);
        impl Handler for Collector {
            fn on_iin(&mut self, _record: &HeaderRecord, seq: IinSeq<'_>) -> Result<(), Stop> {
                for iv in seq {
                    self.0.push((iv.index, iv.value));
                }
                Ok(())
            }
        }
        let mut h = Collector::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.0, vec![(0, true), (1, true), (2, false), (3, false), (4, false), (5, false), (6, false), (7, false)]);
    }

    #[test]
    fn count_only_objects_delivered_via_on_count() {
        let buf = [0x33, 0x01, 0x07, 0x01, 0, 0, 0, 0, 0, 0];
        #[derive(Default)]
        struct Collector(u32);
        impl Handler for Collector {
            fn on_count(&mut self, _record: &HeaderRecord, seq: CountSeq<'_>) -> Result<(), Stop> {
                self.0 += seq.count() as u32;
                Ok(())
            }
        }
        let mut h = Collector::default();
        ApduParser::new().parse_two_pass(&buf, &mut h).unwrap();
        assert_eq!(h.0, 1);
    }
}
