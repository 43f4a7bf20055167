//! Domain fingerprints for hosts-bl
//!
//! Uses xxHash64 over up to four encodings of the domain to build a
//! fingerprint of 64, 128, 192 or 256 bits:
//!
//! | word | encoding          | width  |
//! |------|-------------------|--------|
//! | 0    | forward           | >= 64  |
//! | 1    | reverse           | >= 128 |
//! | 2    | forward + reverse | >= 192 |
//! | 3    | reverse + forward | 256    |
//!
//! # Sentinel Handling
//!
//! An all-zero fingerprint marks an eliminated record. Real hashes are NOT
//! nudged away from zero: a domain whose words all hash to zero is treated
//! as eliminated. At 64 bits the odds are 2^-64 per domain.

use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::config::HashWidth;

/// Maximum number of words in a fingerprint (256 bits).
pub const MAX_WORDS: usize = 4;

/// Default seed used when the caller does not randomize one.
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Multi-word content hash of a domain.
///
/// Words beyond the configured width are always zero, so comparisons
/// between fingerprints of the same width only look at the live words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fingerprint(pub [u64; MAX_WORDS]);

impl Fingerprint {
    /// The eliminated sentinel.
    pub const ZERO: Self = Self([0; MAX_WORDS]);

    /// Check if this fingerprint is the eliminated sentinel.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Append the live words little-endian to `buf`.
    pub fn write_le(&self, width: HashWidth, buf: &mut Vec<u8>) {
        for word in &self.0[..width.words()] {
            buf.extend_from_slice(&word.to_le_bytes());
        }
    }
}

/// Computes fingerprints with a fixed width and seed.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    width: HashWidth,
    seed: u64,
}

impl Fingerprinter {
    pub fn new(width: HashWidth, seed: u64) -> Self {
        Self { width, seed }
    }

    pub fn width(&self) -> HashWidth {
        self.width
    }

    /// Fingerprint a domain string.
    pub fn fingerprint(&self, domain: &str) -> Fingerprint {
        let words = self.width.words();
        let forward = domain.as_bytes();
        let mut out = [0u64; MAX_WORDS];

        out[0] = self.hash(&[forward]);
        if words > 1 {
            let reversed: String = domain.chars().rev().collect();
            let reverse = reversed.as_bytes();
            out[1] = self.hash(&[reverse]);
            if words > 2 {
                out[2] = self.hash(&[forward, reverse]);
            }
            if words > 3 {
                out[3] = self.hash(&[reverse, forward]);
            }
        }

        Fingerprint(out)
    }

    /// xxHash64 over the concatenation of `parts`.
    #[inline]
    fn hash(&self, parts: &[&[u8]]) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        for part in parts {
            hasher.write(part);
        }
        hasher.finish()
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(HashWidth::default(), DEFAULT_SEED)
    }
}
