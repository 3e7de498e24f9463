use super::constants::*;
use crate::error::{Error, Result};

/// A single block of a Tuya stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block<'a> {
    /// 1-32 bytes copied verbatim
    Literal(&'a [u8]),
    /// Copy `length` bytes from `distance` bytes back in the decoded output
    Reference { length: usize, distance: usize },
}

impl Block<'_> {
    /// Number of bytes this block expands to
    pub fn decoded_len(&self) -> usize {
        match self {
            Block::Literal(data) => data.len(),
            Block::Reference { length, .. } => *length,
        }
    }

    /// Number of bytes this block occupies in the stream
    pub fn encoded_len(&self) -> usize {
        match self {
            Block::Literal(data) => 1 + data.len(),
            Block::Reference { length, .. } => reference_cost(*length),
        }
    }

    /// Check the block against the grammar's representable ranges
    pub fn validate(&self) -> Result<()> {
        match *self {
            Block::Literal(data) => check_literal(data.len()),
            Block::Reference { length, distance } => check_reference(length, distance),
        }
    }
}

/// Encoded size of a reference block of `length` bytes
#[inline]
pub fn reference_cost(length: usize) -> usize {
    if length < LONG_MATCH_BASE {
        SHORT_REFERENCE_SIZE
    } else {
        LONG_REFERENCE_SIZE
    }
}

/// Encoded size of a literal run of `len` bytes split into maximal blocks
#[inline]
pub fn literal_run_cost(len: usize) -> usize {
    len + (len + MAX_LITERAL_LEN - 1) / MAX_LITERAL_LEN
}

fn check_literal(len: usize) -> Result<()> {
    if (1..=MAX_LITERAL_LEN).contains(&len) {
        Ok(())
    } else {
        Err(Error::LiteralLength(len))
    }
}

fn check_reference(length: usize, distance: usize) -> Result<()> {
    if !(MIN_MATCH..=MAX_MATCH).contains(&length) {
        return Err(Error::MatchLength(length));
    }
    if !(1..=WINDOW_SIZE).contains(&distance) {
        return Err(Error::MatchDistance(distance));
    }
    Ok(())
}

/// Byte-level writer for Tuya stream blocks
///
/// Every write validates against the grammar first, so a stream is either
/// produced whole or the call fails without silently clamping a field.
pub struct BlockWriter {
    output: Vec<u8>,
}

impl BlockWriter {
    pub fn new() -> Self {
        Self { output: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity) }
    }

    /// Write one literal block: `[len-1][data]`
    pub fn write_literal(&mut self, data: &[u8]) -> Result<()> {
        check_literal(data.len())?;
        self.output.push((data.len() - 1) as u8);
        self.output.extend_from_slice(data);
        Ok(())
    }

    /// Write a literal run of any length as consecutive blocks of up to 32 bytes
    pub fn write_literals(&mut self, data: &[u8]) -> Result<()> {
        for chunk in data.chunks(MAX_LITERAL_LEN) {
            self.write_literal(chunk)?;
        }
        Ok(())
    }

    /// Write one reference block
    ///
    /// Short form (length 3-8): `[l<<5 | d>>8][d & 0xFF]`
    /// Long form (length 9-264): `[7<<5 | d>>8][length-9][d & 0xFF]`
    ///
    /// where `d = distance - 1` and `l = length - 2`.
    pub fn write_reference(&mut self, length: usize, distance: usize) -> Result<()> {
        check_reference(length, distance)?;

        let d = distance - 1;
        let l = length - 2;
        let distance_high = (d >> 8) as u8;
        let distance_low = (d & 0xFF) as u8;

        if l >= LENGTH_FIELD_EXTENDED as usize {
            let extension = (l - LENGTH_FIELD_EXTENDED as usize) as u8;
            self.output.push((LENGTH_FIELD_EXTENDED << 5) | distance_high);
            self.output.push(extension);
        } else {
            self.output.push(((l as u8) << 5) | distance_high);
        }
        self.output.push(distance_low);
        Ok(())
    }

    pub fn write_block(&mut self, block: &Block<'_>) -> Result<()> {
        match *block {
            Block::Literal(data) => self.write_literal(data),
            Block::Reference { length, distance } => self.write_reference(length, distance),
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.output
    }
}

impl Default for BlockWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut BlockWriter) -> Result<()>) -> Vec<u8> {
        let mut writer = BlockWriter::new();
        f(&mut writer).unwrap();
        writer.finish()
    }

    #[test]
    fn test_literal_header() {
        assert_eq!(written(|w| w.write_literal(b"A")), vec![0x00, b'A']);
        let data = [7u8; 32];
        let out = written(|w| w.write_literal(&data));
        assert_eq!(out[0], 31);
        assert_eq!(&out[1..], &data);
    }

    #[test]
    fn test_literal_bounds() {
        let mut writer = BlockWriter::new();
        assert!(matches!(writer.write_literal(&[]), Err(Error::LiteralLength(0))));
        assert!(matches!(writer.write_literal(&[0; 33]), Err(Error::LiteralLength(33))));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_literal_run_split() {
        let data: Vec<u8> = (0..70).collect();
        let out = written(|w| w.write_literals(&data));
        assert_eq!(out.len(), 73);
        assert_eq!(out[0], 31);
        assert_eq!(out[33], 31);
        assert_eq!(out[66], 5);
        assert_eq!(literal_run_cost(70), 73);
        assert!(written(|w| w.write_literals(&[])).is_empty());
    }

    #[test]
    fn test_short_reference() {
        // length 3, distance 1 -> l=1, d=0
        assert_eq!(written(|w| w.write_reference(3, 1)), vec![0x20, 0x00]);
        // length 8, distance 8192 -> l=6, d=0x1FFF
        assert_eq!(written(|w| w.write_reference(8, 8192)), vec![0xDF, 0xFF]);
        // length 5, distance 300 -> l=3, d=299=0x12B
        assert_eq!(written(|w| w.write_reference(5, 300)), vec![0x61, 0x2B]);
    }

    #[test]
    fn test_long_reference_byte_order() {
        // header, extension, distance low
        assert_eq!(written(|w| w.write_reference(9, 1)), vec![0xE0, 0x00, 0x00]);
        assert_eq!(written(|w| w.write_reference(63, 1)), vec![0xE0, 54, 0x00]);
        assert_eq!(written(|w| w.write_reference(264, 0x1234)), vec![0xF2, 0xFF, 0x33]);
    }

    #[test]
    fn test_reference_bounds() {
        let mut writer = BlockWriter::new();
        assert!(matches!(writer.write_reference(2, 1), Err(Error::MatchLength(2))));
        assert!(matches!(writer.write_reference(265, 1), Err(Error::MatchLength(265))));
        assert!(matches!(writer.write_reference(3, 0), Err(Error::MatchDistance(0))));
        assert!(matches!(writer.write_reference(3, 8193), Err(Error::MatchDistance(8193))));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_encoded_len_matches_writer() {
        let blocks = [
            Block::Literal(b"xyz"),
            Block::Reference { length: 3, distance: 10 },
            Block::Reference { length: 8, distance: 10 },
            Block::Reference { length: 9, distance: 10 },
            Block::Reference { length: 264, distance: 8192 },
        ];
        for block in blocks {
            let out = written(|w| w.write_block(&block));
            assert_eq!(out.len(), block.encoded_len(), "{:?}", block);
        }
    }

    #[test]
    fn test_reference_header_never_zero_field() {
        for length in MIN_MATCH..=MAX_MATCH {
            let out = written(|w| w.write_reference(length, 4096));
            assert_ne!(out[0] >> 5, 0, "length {}", length);
        }
    }
}
