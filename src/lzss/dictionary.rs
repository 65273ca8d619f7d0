use super::params::CodingParams;
use super::MIN_CODED_LEN;
use crate::error::{Error, Result};

/// Number of buckets in the position dictionary (power of 2 for mask indexing)
pub const HASH_TABLE_SIZE: usize = 1 << 12;

/// Result of a dictionary search
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchResult {
    /// Position of the match start in the backing buffer
    pub position: usize,
    /// Match length beyond the guaranteed `MIN_CODED_LEN` bytes
    pub extra_len: u16,
}

/// Hash dictionary mapping 3-byte prefixes to positions in a fixed buffer.
///
/// Buckets are vectors of positions scanned newest-first, which mirrors a
/// prepend-chained list: the most recent insertion is the first candidate
/// considered, so equal-length matches resolve to the smallest offset.
pub struct HashDict<'a> {
    data: &'a [u8],
    buckets: Vec<Vec<usize>>,
    mask: u32,
}

impl<'a> HashDict<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_buckets(data, HASH_TABLE_SIZE)
    }

    pub fn with_buckets(data: &'a [u8], n_buckets: usize) -> Self {
        debug_assert!(n_buckets.is_power_of_two());
        Self { data, buckets: vec![Vec::new(); n_buckets], mask: n_buckets as u32 - 1 }
    }

    /// Hash of the 3-byte prefix at `position` (byte 0 in the low bits).
    ///
    /// The multiply-xor mixing is load-bearing: image-like data with a
    /// handful of distinct values collapses into a few buckets without it.
    fn hash(&self, position: usize) -> u32 {
        debug_assert!(position + MIN_CODED_LEN <= self.data.len());
        let k = self.data[position] as u32
            | (self.data[position + 1] as u32) << 8
            | (self.data[position + 2] as u32) << 16;
        let k = k.wrapping_mul(0x9E37_79B9);
        (k ^ (k >> 16)) & self.mask
    }

    /// Record the 3-byte prefix starting at `position`. No duplicate check.
    pub fn insert(&mut self, position: usize) {
        let key = self.hash(position);
        self.buckets[key as usize].push(position);
    }

    /// Unlink the entry for `position`. The engine only removes positions it
    /// inserted, so absence is an internal invariant failure, not bad input.
    pub fn remove(&mut self, position: usize) -> Result<()> {
        let key = self.hash(position);
        let bucket = &mut self.buckets[key as usize];
        match bucket.iter().rposition(|&p| p == position) {
            Some(idx) => {
                bucket.remove(idx);
                Ok(())
            }
            None => Err(Error::Internal(format!("dictionary entry missing for position {position}"))),
        }
    }

    /// Find the longest match for the bytes starting at `current_pos`.
    ///
    /// Candidates must literally match the first `MIN_CODED_LEN` bytes (hash
    /// collisions are rejected), then extend forward one byte at a time up to
    /// `max_extra_len` additional bytes. First longest wins; the scan stops
    /// early once a candidate reaches the early-exit threshold.
    pub fn search(&self, current_pos: usize, params: &CodingParams) -> Option<SearchResult> {
        if current_pos + MIN_CODED_LEN > self.data.len() {
            return None;
        }

        let key = self.hash(current_pos);
        let mut best: Option<SearchResult> = None;

        for &candidate in self.buckets[key as usize].iter().rev() {
            // Eviction keeps entries inside the window once it starts, but
            // the primed position 0 can still be too far back when the
            // window is narrower than MIN_CODED_LEN.
            if candidate >= current_pos || current_pos - candidate > params.search_buf_size {
                continue;
            }
            let prefix_matches = (0..MIN_CODED_LEN)
                .all(|i| self.data[current_pos + i] == self.data[candidate + i]);
            if !prefix_matches {
                // hash collision: hashes matched but the data did not
                continue;
            }

            let extra = self.match_extra_len(current_pos, candidate, params.max_extra_len);
            if best.map_or(true, |b| extra > b.extra_len) {
                best = Some(SearchResult { position: candidate, extra_len: extra });
                if extra >= params.early_exit_len {
                    break;
                }
            }
        }
        best
    }

    /// Length of the match beyond the initial `MIN_CODED_LEN` bytes
    fn match_extra_len(&self, current_pos: usize, candidate: usize, max_extra: u16) -> u16 {
        let mut extra = 0u16;
        for i in 0..max_extra as usize {
            let a = current_pos + MIN_CODED_LEN + i;
            let b = candidate + MIN_CODED_LEN + i;
            if a >= self.data.len() || b >= self.data.len() || self.data[a] != self.data[b] {
                break;
            }
            extra += 1;
        }
        extra
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
