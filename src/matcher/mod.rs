//! Back-reference search over the sliding window.

pub mod suffix;

pub use suffix::SuffixIndex;

use crate::block::{MAX_MATCH, MIN_MATCH, WINDOW_SIZE};

/// A candidate back-reference at some position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub length: usize,
    pub distance: usize,
}

impl Match {
    /// Whether the match is long enough to be worth a reference block
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.length >= MIN_MATCH
    }

    /// Prefer longer matches, then closer ones
    #[inline]
    fn beats(&self, other: &Match) -> bool {
        self.length > other.length
            || (self.length == other.length && self.distance < other.distance)
    }
}

/// Number of equal bytes at `pos` and `start`, capped at `min(MAX_MATCH, len - pos)`
///
/// The source may run into the bytes at `pos` (overlapping copy).
#[inline]
pub fn match_length(data: &[u8], pos: usize, start: usize) -> usize {
    debug_assert!(start < pos);
    let limit = MAX_MATCH.min(data.len() - pos);
    data[pos..pos + limit].iter().zip(&data[start..]).take_while(|(a, b)| a == b).count()
}

/// Valid distances at `pos`, nearest first
#[inline]
pub fn window_distances(pos: usize) -> std::ops::RangeInclusive<usize> {
    1..=pos.min(WINDOW_SIZE)
}

/// First distance (nearest first) whose match is usable
pub fn find_first(data: &[u8], pos: usize) -> Option<Match> {
    window_distances(pos)
        .map(|distance| Match { length: match_length(data, pos, pos - distance), distance })
        .find(Match::is_usable)
}

/// Longest match over the whole window, ties broken towards the smaller distance
///
/// Returns `None` only when the window is empty; the match may be too
/// short to use.
pub fn find_best(data: &[u8], pos: usize) -> Option<Match> {
    let limit = MAX_MATCH.min(data.len() - pos);
    let mut best: Option<Match> = None;
    for distance in window_distances(pos) {
        let candidate = Match { length: match_length(data, pos, pos - distance), distance };
        if best.map_or(true, |b| candidate.beats(&b)) {
            best = Some(candidate);
        }
        // Distances ascend, so nothing after a capped match can beat it
        if candidate.length == limit {
            break;
        }
    }
    best
}

fn best_of(data: &[u8], pos: usize, distances: impl Iterator<Item = usize>) -> Option<Match> {
    let mut best: Option<Match> = None;
    for distance in distances {
        let candidate = Match { length: match_length(data, pos, pos - distance), distance };
        if best.map_or(true, |b| candidate.beats(&b)) {
            best = Some(candidate);
        }
    }
    best
}

/// Match search policy, fixed for the duration of one compression call
pub enum MatchFinder<'a> {
    /// Nearest usable match in the full window
    FirstAcceptable,
    /// Longest match in the full window
    Exhaustive,
    /// Longest of the two matches adjacent to `pos` in suffix order
    Indexed(SuffixIndex<'a>),
}

impl<'a> MatchFinder<'a> {
    pub fn indexed(data: &'a [u8]) -> Self {
        MatchFinder::Indexed(SuffixIndex::new(data))
    }

    /// Find a candidate at `pos`; positions must be queried in increasing order
    /// for the indexed policy
    pub fn find(&mut self, data: &[u8], pos: usize) -> Option<Match> {
        match self {
            MatchFinder::FirstAcceptable => find_first(data, pos),
            MatchFinder::Exhaustive => find_best(data, pos),
            MatchFinder::Indexed(index) => best_of(data, pos, index.neighbor_distances(pos)),
        }
    }
}
