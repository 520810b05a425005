//! Builder-facing object headers for constructing request APDUs. The
//! decode path never produces these; they exist purely to serialize a
//! header onto the wire in the same 3/5/7/4/5-byte layouts the object
//! decoder reads back.
use crate::error::HeaderValidationError;

/// One object header a request APDU can carry. Each variant fixes its own
/// qualifier byte, so construction can never produce an inconsistent
/// (qualifier, payload) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    AllObjects { group: u8, variation: u8 },
    Range8 { group: u8, variation: u8, start: u8, stop: u8 },
    Range16 { group: u8, variation: u8, start: u16, stop: u16 },
    Count8 { group: u8, variation: u8, count: u8 },
    Count16 { group: u8, variation: u8, count: u16 },
}

impl Header {
    /// Checks the constraints the object decoder would otherwise reject at
    /// parse time: `start <= stop` for a range, a nonzero count.
    pub fn validate(&self) -> Result<(), HeaderValidationError> {
        match *self {
            Header::Range8 { start, stop, .. } if start > stop => {
                Err(HeaderValidationError::BadStartStop { start: start as u16, stop: stop as u16 })
            }
            Header::Range16 { start, stop, .. } if start > stop => {
                Err(HeaderValidationError::BadStartStop { start, stop })
            }
            Header::Count8 { count: 0, .. } => Err(HeaderValidationError::ZeroCount),
            Header::Count16 { count: 0, .. } => Err(HeaderValidationError::ZeroCount),
            _ => Ok(()),
        }
    }

    /// Number of bytes `write_into` emits for this header.
    pub fn encoded_len(&self) -> usize {
        match self {
            Header::AllObjects { .. } => 3,
            Header::Range8 { .. } => 5,
            Header::Range16 { .. } => 7,
            Header::Count8 { .. } => 4,
            Header::Count16 { .. } => 5,
        }
    }

    fn group_variation(&self) -> (u8, u8) {
        match *self {
            Header::AllObjects { group, variation }
            | Header::Range8 { group, variation, .. }
            | Header::Range16 { group, variation, .. }
            | Header::Count8 { group, variation, .. }
            | Header::Count16 { group, variation, .. } => (group, variation),
        }
    }

    /// Serializes the header into `buffer`, returning the number of bytes
    /// written. Fails validation before touching the buffer; fails with
    /// `BufferTooSmall` if `buffer` is shorter than `encoded_len()`.
    pub fn write_into(&self, buffer: &mut [u8]) -> Result<usize, HeaderValidationError> {
        self.validate()?;
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(HeaderValidationError::BufferTooSmall);
        }
        let (group, variation) = self.group_variation();
        buffer[0] = group;
        buffer[1] = variation;
        match *self {
            Header::AllObjects { .. } => {
                buffer[2] = 0x06;
            }
            Header::Range8 { start, stop, .. } => {
                buffer[2] = 0x00;
                buffer[3] = start;
                buffer[4] = stop;
            }
            Header::Range16 { start, stop, .. } => {
                buffer[2] = 0x01;
                buffer[3..5].copy_from_slice(&start.to_le_bytes());
                buffer[5..7].copy_from_slice(&stop.to_le_bytes());
            }
            Header::Count8 { count, .. } => {
                buffer[2] = 0x07;
                buffer[3] = count;
            }
            Header::Count16 { count, .. } => {
                buffer[2] = 0x08;
                buffer[3..5].copy_from_slice(&count.to_le_bytes());
            }
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{read_raw_header, QualifierCode};
    use crate::infra::cursor::ByteCursor;

    #[test]
    fn all_objects_round_trips_through_the_header_reader() {
        let h = Header::AllObjects { group: 60, variation: 1 };
        let mut buf = [0u8; 3];
        assert_eq!(h.write_into(&mut buf).unwrap(), 3);
        let mut cur = ByteCursor::new(&buf);
        let raw = read_raw_header(&mut cur).unwrap();
        assert_eq!((raw.group, raw.variation), (60, 1));
        assert_eq!(QualifierCode::from_byte(raw.qualifier), QualifierCode::AllObjects);
    }

    #[test]
    fn range16_round_trips_little_endian() {
        let h = Header::Range16 { group: 30, variation: 1, start: 0, stop: 0xFFFF };
        let mut buf = [0u8; 7];
        assert_eq!(h.write_into(&mut buf).unwrap(), 7);
        let mut cur = ByteCursor::new(&buf);
        let raw = read_raw_header(&mut cur).unwrap();
        assert_eq!(QualifierCode::from_byte(raw.qualifier), QualifierCode::Range16);
        assert_eq!(cur.rest(), &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn count8_encodes_four_bytes() {
        let h = Header::Count8 { group: 51, variation: 1, count: 3 };
        let mut buf = [0u8; 4];
        h.write_into(&mut buf).unwrap();
        assert_eq!(buf, [51, 1, 0x07, 3]);
    }

    #[test]
    fn range8_rejects_inverted_bounds() {
        let h = Header::Range8 { group: 1, variation: 1, start: 4, stop: 2 };
        assert_eq!(h.validate(), Err(HeaderValidationError::BadStartStop { start: 4, stop: 2 }));
        let mut buf = [0u8; 5];
        assert_eq!(h.write_into(&mut buf), Err(HeaderValidationError::BadStartStop { start: 4, stop: 2 }));
    }

    #[test]
    fn zero_count_is_rejected() {
        let h = Header::Count16 { group: 51, variation: 1, count: 0 };
        assert_eq!(h.validate(), Err(HeaderValidationError::ZeroCount));
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let h = Header::Range8 { group: 1, variation: 1, start: 0, stop: 1 };
        let mut buf = [0u8; 4];
        assert_eq!(h.write_into(&mut buf), Err(HeaderValidationError::BufferTooSmall));
    }
}
