use super::codec::Block;
use super::constants::*;
use crate::error::{Error, Result};

/// Parses a Tuya stream into blocks
///
/// Literal data is borrowed from the stream. Iteration stops after the first
/// error.
pub struct BlockReader<'a> {
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> BlockReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, failed: false }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self.input.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_block(&mut self) -> Result<Block<'a>> {
        let header = self.next_byte()?;
        let length_field = header >> 5;

        if length_field == 0 {
            let len = header as usize + 1;
            let data = self.input.get(self.pos..self.pos + len).ok_or(Error::UnexpectedEof)?;
            self.pos += len;
            return Ok(Block::Literal(data));
        }

        let length = if length_field == LENGTH_FIELD_EXTENDED {
            self.next_byte()? as usize + LONG_MATCH_BASE
        } else {
            length_field as usize + 2
        };
        let distance_low = self.next_byte()? as usize;
        let distance = (((header & 0x1F) as usize) << 8 | distance_low) + 1;

        Ok(Block::Reference { length, distance })
    }
}

impl<'a> Iterator for BlockReader<'a> {
    type Item = Result<Block<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        let block = self.read_block();
        self.failed = block.is_err();
        Some(block)
    }
}

/// Decode a complete Tuya stream
pub fn decompress(stream: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(stream.len() * 2);

    for block in BlockReader::new(stream) {
        match block? {
            Block::Literal(data) => output.extend_from_slice(data),
            Block::Reference { length, distance } => {
                if distance > output.len() {
                    return Err(Error::InvalidBackReference { distance, available: output.len() });
                }
                let start = output.len() - distance;
                if length <= distance {
                    output.extend_from_within(start..start + length);
                } else {
                    // Overlapping copy repeats the last `distance` bytes
                    for i in 0..length {
                        let byte = output[start + i];
                        output.push(byte);
                    }
                }
            }
        }
    }

    Ok(output)
}

/// Block statistics for a Tuya stream
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub literal_blocks: usize,
    pub reference_blocks: usize,
    pub literal_bytes: usize,
    pub referenced_bytes: usize,
    pub encoded_size: usize,
}

impl StreamSummary {
    /// Total number of bytes the stream decodes to
    pub fn decoded_size(&self) -> usize {
        self.literal_bytes + self.referenced_bytes
    }

    /// Encoded size relative to decoded size
    pub fn ratio(&self) -> f64 {
        match self.decoded_size() {
            0 => 1.0,
            n => self.encoded_size as f64 / n as f64,
        }
    }
}

/// Walk a stream and collect block statistics without decoding it
pub fn summarize(stream: &[u8]) -> Result<StreamSummary> {
    let mut summary = StreamSummary { encoded_size: stream.len(), ..Default::default() };

    for block in BlockReader::new(stream) {
        match block? {
            Block::Literal(data) => {
                summary.literal_blocks += 1;
                summary.literal_bytes += data.len();
            }
            Block::Reference { length, .. } => {
                summary.reference_blocks += 1;
                summary.referenced_bytes += length;
            }
        }
    }

    Ok(summary)
}
