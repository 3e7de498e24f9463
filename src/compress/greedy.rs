use crate::block::BlockWriter;
use crate::error::Result;
use crate::matcher::MatchFinder;

/// Left-to-right greedy parse: take whatever usable match the finder offers,
/// otherwise grow the pending literal run by one byte
pub fn compress_greedy(data: &[u8], mut finder: MatchFinder<'_>) -> Result<Vec<u8>> {
    let mut writer = BlockWriter::with_capacity(data.len() + data.len() / 32 + 1);

    let mut block_start = 0;
    let mut pos = 0;

    while pos < data.len() {
        match finder.find(data, pos) {
            Some(found) if found.is_usable() => {
                writer.write_literals(&data[block_start..pos])?;
                writer.write_reference(found.length, found.distance)?;
                pos += found.length;
                block_start = pos;
            }
            _ => pos += 1,
        }
    }

    writer.write_literals(&data[block_start..pos])?;

    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::decompress;

    #[test]
    fn test_first_acceptable_repeats() {
        let data = b"ABCABCABC";
        let out = compress_greedy(data, MatchFinder::FirstAcceptable).unwrap();
        // literal "ABC", then distance 3 covering the remaining six bytes
        assert_eq!(out, vec![0x02, b'A', b'B', b'C', 0x80, 0x02]);
        assert_eq!(decompress(&out).unwrap(), data);
    }

    #[test]
    fn test_indexed_repeats() {
        let data = b"ABCABCABC";
        let out = compress_greedy(data, MatchFinder::indexed(data)).unwrap();
        assert_eq!(out, vec![0x02, b'A', b'B', b'C', 0x80, 0x02]);
    }

    #[test]
    fn test_trailing_literals_flushed() {
        let data = b"xyzxyzQ";
        let out = compress_greedy(data, MatchFinder::FirstAcceptable).unwrap();
        assert_eq!(decompress(&out).unwrap(), data);
        assert_eq!(&out[out.len() - 2..], &[0x00, b'Q']);
    }
}
