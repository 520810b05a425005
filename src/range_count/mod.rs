//! Consumes the numeric range or count that follows an object header,
//! producing a `Range{start,stop}` or a plain count, with strict
//! width-dependent bounds per §4.3.
use crate::core::Range;
use crate::error::{ParseError, ParseFailure};
use crate::header::QualifierCode;
use crate::infra::cursor::ByteCursor;

/// Decoded range/count payload, tagged by the structural shape the
/// qualifier code implied.
pub enum RangeOrCount {
    Range(Range),
    Count(u32),
}

/// Returns `None` for `ALL_OBJECTS` (no range/count bytes follow).
pub fn decode(cursor: &mut ByteCursor<'_>, qualifier: QualifierCode) -> Result<Option<RangeOrCount>, ParseFailure> {
    match qualifier {
        QualifierCode::AllObjects => Ok(None),
        QualifierCode::Range8 => {
            let start = cursor.read_u8()? as u16;
            let stop = cursor.read_u8()? as u16;
            check_start_stop(cursor, start, stop)?;
            Ok(Some(RangeOrCount::Range(Range { start, stop })))
        }
        QualifierCode::Range16 => {
            let start = cursor.read_u16_le()?;
            let stop = cursor.read_u16_le()?;
            check_start_stop(cursor, start, stop)?;
            Ok(Some(RangeOrCount::Range(Range { start, stop })))
        }
        QualifierCode::Count8 | QualifierCode::CountAndPrefix8 => {
            Ok(Some(RangeOrCount::Count(cursor.read_u8()? as u32)))
        }
        QualifierCode::Count16 | QualifierCode::CountAndPrefix16 => {
            Ok(Some(RangeOrCount::Count(cursor.read_u16_le()? as u32)))
        }
        QualifierCode::Unknown(qualifier) => {
            Err(ParseFailure { kind: ParseError::UnknownQualifier { qualifier }, offset: cursor.position() })
        }
    }
}

fn check_start_stop(cursor: &ByteCursor<'_>, start: u16, stop: u16) -> Result<(), ParseFailure> {
    if start > stop {
        return Err(ParseFailure { kind: ParseError::BadStartStop { start, stop }, offset: cursor.position() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range8_in_order_succeeds() {
        let buf = [0x02, 0x04];
        let mut cur = ByteCursor::new(&buf);
        let decoded = decode(&mut cur, QualifierCode::Range8).unwrap().unwrap();
        match decoded {
            RangeOrCount::Range(r) => assert_eq!(r, Range { start: 2, stop: 4 }),
            _ => panic!("expected Range"),
        }
    }

    #[test]
    fn range8_out_of_order_is_bad_start_stop() {
        let buf = [0x04, 0x02];
        let mut cur = ByteCursor::new(&buf);
        let err = decode(&mut cur, QualifierCode::Range8).unwrap_err();
        assert_eq!(err.kind, ParseError::BadStartStop { start: 4, stop: 2 });
    }

    #[test]
    fn range16_is_little_endian() {
        let buf = [0x00, 0x00, 0xFF, 0xFF];
        let mut cur = ByteCursor::new(&buf);
        let decoded = decode(&mut cur, QualifierCode::Range16).unwrap().unwrap();
        match decoded {
            RangeOrCount::Range(r) => assert_eq!(r, Range { start: 0, stop: 0xFFFF }),
            _ => panic!("expected Range"),
        }
    }

    #[test]
    fn count16_is_little_endian() {
        let buf = [0x34, 0x12];
        let mut cur = ByteCursor::new(&buf);
        let decoded = decode(&mut cur, QualifierCode::Count16).unwrap().unwrap();
        match decoded {
            RangeOrCount::Count(c) => assert_eq!(c, 0x1234),
            _ => panic!("expected Count"),
        }
    }

    #[test]
    fn all_objects_consumes_nothing() {
        let buf: [u8; 0] = [];
        let mut cur = ByteCursor::new(&buf);
        assert!(decode(&mut cur, QualifierCode::AllObjects).unwrap().is_none());
    }

    #[test]
    fn unknown_qualifier_is_rejected() {
        let buf: [u8; 0] = [];
        let mut cur = ByteCursor::new(&buf);
        let err = decode(&mut cur, QualifierCode::Unknown(0xFF)).unwrap_err();
        assert_eq!(err.kind, ParseError::UnknownQualifier { qualifier: 0xFF });
    }
}
