//! Window-bounded index of buffer positions sorted by suffix.
//!
//! Positions are ordered by the bytes from that position to the end of the
//! buffer; when one suffix is a prefix of another the shorter one sorts
//! first. All suffixes of a buffer are distinct, so every position has exactly
//! one sorted location.
//!
//! The index is a sorted `Vec`: binary searches cost O(log W) suffix
//! comparisons, while each insert and eviction shifts up to W entries.

use std::cmp::Ordering;

use crate::block::WINDOW_SIZE;

pub struct SuffixIndex<'a> {
    data: &'a [u8],
    window: usize,
    /// Positions in `[next_pos - window, next_pos)`, sorted by suffix
    sorted: Vec<usize>,
    /// First position not yet inserted
    next_pos: usize,
}

impl<'a> SuffixIndex<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_window(data, WINDOW_SIZE)
    }

    pub fn with_window(data: &'a [u8], window: usize) -> Self {
        debug_assert!(window > 0);
        Self { data, window, sorted: Vec::with_capacity(window.min(data.len())), next_pos: 0 }
    }

    #[inline]
    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.data[a..].cmp(&self.data[b..])
    }

    /// Sorted location of `pos` if it is indexed, else where it would be inserted
    fn locate(&self, pos: usize) -> std::result::Result<usize, usize> {
        self.sorted.binary_search_by(|&probe| self.compare(probe, pos))
    }

    /// Insert every position up to and including `pos`, evicting positions
    /// that slide out of the window
    pub fn advance_to(&mut self, pos: usize) {
        debug_assert!(pos < self.data.len());

        while self.next_pos <= pos {
            if self.sorted.len() == self.window {
                let oldest = self.next_pos - self.window;
                match self.locate(oldest) {
                    Ok(idx) => {
                        self.sorted.remove(idx);
                    }
                    Err(_) => debug_assert!(false, "position {} missing from index", oldest),
                }
            }

            let idx = self.locate(self.next_pos).unwrap_or_else(|idx| idx);
            self.sorted.insert(idx, self.next_pos);
            self.next_pos += 1;
        }
    }

    /// Distances to the suffixes sorted immediately after and before `pos`
    ///
    /// Advances the index to `pos` first. The successor comes first.
    pub fn neighbor_distances(&mut self, pos: usize) -> impl Iterator<Item = usize> {
        self.advance_to(pos);

        let neighbors = match self.locate(pos) {
            Ok(idx) => {
                [self.sorted.get(idx + 1).copied(), idx.checked_sub(1).map(|i| self.sorted[i])]
            }
            Err(_) => [None, None],
        };

        neighbors.into_iter().flatten().map(move |neighbor| pos - neighbor)
    }

    /// Number of indexed positions
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Indexed positions in suffix order
    pub fn positions(&self) -> &[usize] {
        &self.sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_suffix() {
        let data = b"banana";
        let mut index = SuffixIndex::new(data);
        index.advance_to(data.len() - 1);
        // a, ana, anana, banana, na, nana
        assert_eq!(index.positions(), &[5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        let data = [7u8; 5];
        let mut index = SuffixIndex::new(&data);
        index.advance_to(4);
        assert_eq!(index.positions(), &[4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_neighbors_successor_first() {
        let data = b"banana";
        let mut index = SuffixIndex::new(data);
        // At pos 3 the index holds b, a, n, a -> sorted: ana(3), anana(1), banana(0), nana(2)
        let distances: Vec<usize> = index.neighbor_distances(3).collect();
        assert_eq!(distances, vec![2]);

        // At pos 5 "a" sorts first, its only neighbor is "ana" at 3
        let distances: Vec<usize> = index.neighbor_distances(5).collect();
        assert_eq!(distances, vec![2]);
    }

    #[test]
    fn test_neighbors_both_sides() {
        let data = b"abcabd";
        let mut index = SuffixIndex::new(data);
        // sorted: abcabd(0), abd(3), bcabd(1), cabd(2)
        let distances: Vec<usize> = index.neighbor_distances(3).collect();
        assert_eq!(distances, vec![2, 3]);
    }

    #[test]
    fn test_first_position_has_no_neighbors() {
        let data = b"xyz";
        let mut index = SuffixIndex::new(data);
        assert_eq!(index.neighbor_distances(0).count(), 0);
    }

    #[test]
    fn test_window_eviction() {
        let data: Vec<u8> = (0..40u8).map(|i| i % 7).collect();
        let mut index = SuffixIndex::with_window(&data, 8);

        for pos in 0..data.len() {
            let distances: Vec<usize> = index.neighbor_distances(pos).collect();
            assert!(index.len() <= 8);
            for distance in distances {
                assert!((1..8).contains(&distance), "pos {} distance {}", pos, distance);
            }
        }

        let mut held = index.positions().to_vec();
        held.sort_unstable();
        assert_eq!(held, (32..40).collect::<Vec<_>>());
    }
}
