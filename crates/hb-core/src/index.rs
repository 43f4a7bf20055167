//! Containment index over framed fingerprints.
//!
//! # Layout
//!
//! ```text
//! [0u64][fp 0][0u64][fp 1][0u64] ... [fp n-1][0u64]
//! ```
//!
//! Words are little-endian. Every fingerprint sits between two zero
//! words, so a framed query `[0][fp][0]` can only match a whole
//! fingerprint and never the tail of one plus the head of the next.
//! Each distinct fingerprint is written once; repeats add nothing to a
//! membership query and would make suffix sorting quadratic.
//!
//! Queries are answered with a suffix array over the byte buffer: the
//! suffixes are sorted once at build time and a lookup is two binary
//! searches for the range of suffixes that start with the pattern.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::HashWidth;
use crate::error::Error;
use crate::hash::Fingerprint;

/// Size of the zero frame written around each fingerprint.
pub const FRAME_SIZE: usize = 8;

/// Immutable byte buffer with a sorted suffix array.
pub struct ContainmentIndex {
    data: Vec<u8>,
    suffixes: Vec<u32>,
    width: HashWidth,
}

impl ContainmentIndex {
    /// Build an index over an arbitrary byte buffer.
    pub fn new(data: Vec<u8>, width: HashWidth) -> Result<Self, Error> {
        let len = u32::try_from(data.len()).map_err(|_| Error::IndexTooLarge(data.len()))?;

        let mut suffixes: Vec<u32> = (0..len).collect();
        suffixes.sort_unstable_by(|&a, &b| data[a as usize..].cmp(&data[b as usize..]));

        Ok(Self {
            data,
            suffixes,
            width,
        })
    }

    /// Build an index over framed fingerprints, in order of first
    /// appearance. Eliminated (all-zero) fingerprints and repeats are
    /// skipped.
    pub fn from_fingerprints<I>(fingerprints: I, width: HashWidth) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Fingerprint>,
    {
        let mut data = vec![0u8; FRAME_SIZE];
        let mut seen = HashSet::new();
        for fp in fingerprints {
            if fp.is_zero() || !seen.insert(fp) {
                continue;
            }
            fp.write_le(width, &mut data);
            data.extend_from_slice(&[0u8; FRAME_SIZE]);
        }
        Self::new(data, width)
    }

    /// Encode `fp` the way it is framed inside the index.
    pub fn framed(fp: &Fingerprint, width: HashWidth) -> Vec<u8> {
        let mut buf = Vec::with_capacity(width.words() * 8 + 2 * FRAME_SIZE);
        buf.extend_from_slice(&[0u8; FRAME_SIZE]);
        fp.write_le(width, &mut buf);
        buf.extend_from_slice(&[0u8; FRAME_SIZE]);
        buf
    }

    /// Byte offsets where `pattern` occurs, ascending, at most `limit` of them.
    /// An empty pattern matches nothing.
    pub fn lookup(&self, pattern: &[u8], limit: Option<usize>) -> Vec<usize> {
        let matches = self.matching(pattern);
        let take = limit.unwrap_or(matches.len()).min(matches.len());
        let mut offsets: Vec<usize> = matches[..take].iter().map(|&i| i as usize).collect();
        offsets.sort_unstable();
        offsets
    }

    /// Check if `pattern` occurs anywhere in the buffer.
    pub fn contains(&self, pattern: &[u8]) -> bool {
        !self.matching(pattern).is_empty()
    }

    /// Check if `fp` is one of the indexed fingerprints.
    pub fn contains_fingerprint(&self, fp: &Fingerprint) -> bool {
        self.contains(&Self::framed(fp, self.width))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no fingerprint is indexed (only the leading frame).
    pub fn is_empty(&self) -> bool {
        self.data.len() <= FRAME_SIZE
    }

    /// Slice of the suffix array whose suffixes start with `pattern`.
    fn matching(&self, pattern: &[u8]) -> &[u32] {
        if pattern.is_empty() {
            return &[];
        }
        let lo = self
            .suffixes
            .partition_point(|&i| self.compare_prefix(i, pattern) == Ordering::Less);
        let hi = lo
            + self.suffixes[lo..]
                .partition_point(|&i| self.compare_prefix(i, pattern) == Ordering::Equal);
        &self.suffixes[lo..hi]
    }

    /// Compare the suffix at `start`, truncated to the pattern length.
    #[inline]
    fn compare_prefix(&self, start: u32, pattern: &[u8]) -> Ordering {
        let start = start as usize;
        let end = (start + pattern.len()).min(self.data.len());
        self.data[start..end].cmp(pattern)
    }
}
