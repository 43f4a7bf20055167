//! Duplicate and subdomain elimination.
//!
//! Both reducers work on [`Records`]: one fingerprint per domain entry,
//! kept in position order. Eliminating a record overwrites its
//! fingerprint with [`Fingerprint::ZERO`]; nothing ever restores it.

use log::debug;

use crate::config::HashWidth;
use crate::hash::{Fingerprint, Fingerprinter};
use crate::index::ContainmentIndex;

/// Fingerprint of one domain entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub position: usize,
    pub fingerprint: Fingerprint,
}

impl Record {
    #[inline]
    pub fn is_eliminated(&self) -> bool {
        self.fingerprint.is_zero()
    }
}

/// Records of every domain entry, ordered by position.
#[derive(Debug, Clone)]
pub struct Records {
    records: Vec<Record>,
    width: HashWidth,
}

impl Records {
    pub fn new(width: HashWidth) -> Self {
        Self {
            records: Vec::new(),
            width,
        }
    }

    /// Append a record. Positions must be pushed in increasing order.
    pub fn push(&mut self, position: usize, fingerprint: Fingerprint) {
        debug_assert!(self.records.last().map_or(true, |r| r.position < position));
        self.records.push(Record {
            position,
            fingerprint,
        });
    }

    pub fn width(&self) -> HashWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.find(position).map(|i| &self.records[i])
    }

    /// True if a record exists at `position` and has been eliminated.
    pub fn is_eliminated(&self, position: usize) -> bool {
        self.get(position).is_some_and(Record::is_eliminated)
    }

    /// Eliminate the record at `position`. Returns false if there is no
    /// record there or it was already eliminated.
    pub fn eliminate(&mut self, position: usize) -> bool {
        match self.find(position) {
            Some(i) if !self.records[i].is_eliminated() => {
                self.records[i].fingerprint = Fingerprint::ZERO;
                true
            }
            _ => false,
        }
    }

    /// Number of records not yet eliminated.
    pub fn survivors(&self) -> usize {
        self.records.iter().filter(|r| !r.is_eliminated()).count()
    }

    /// Build the containment index over the surviving fingerprints.
    pub fn build_index(&self) -> Result<ContainmentIndex, crate::Error> {
        ContainmentIndex::from_fingerprints(self.records.iter().map(|r| r.fingerprint), self.width)
    }

    fn find(&self, position: usize) -> Option<usize> {
        self.records
            .binary_search_by_key(&position, |r| r.position)
            .ok()
    }
}

// =============================================================================
// Duplicate Eliminator
// =============================================================================

/// Eliminate every record whose fingerprint equals an earlier survivor's.
///
/// A stable sort by fingerprint makes equal fingerprints adjacent while
/// keeping them in position order, so the first occurrence survives.
/// Returns the number of records eliminated.
pub fn dedupe(records: &mut Records) -> usize {
    let mut sorted = std::mem::take(&mut records.records);
    sorted.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));

    let mut removed = 0usize;
    let mut last: Option<Fingerprint> = None;
    for record in sorted.iter_mut() {
        if record.is_eliminated() {
            continue;
        }
        if last == Some(record.fingerprint) {
            record.fingerprint = Fingerprint::ZERO;
            removed += 1;
        } else {
            last = Some(record.fingerprint);
        }
    }

    sorted.sort_unstable_by_key(|r| r.position);
    records.records = sorted;

    debug!("dedupe: {} duplicate(s) of {} record(s)", removed, records.len());
    removed
}

// =============================================================================
// Subsumption Reducer
// =============================================================================

/// Proper parent domains of `domain` with at least two labels, nearest first.
///
/// `a.b.example.com` yields `b.example.com`, then `example.com`.
pub fn ancestors(domain: &str) -> impl Iterator<Item = &str> {
    domain
        .match_indices('.')
        .map(move |(i, _)| &domain[i + 1..])
        .take_while(|parent| parent.contains('.'))
}

/// Finds blocked ancestors through the containment index.
pub struct Subsumer<'a> {
    index: &'a ContainmentIndex,
    fingerprinter: Fingerprinter,
}

impl<'a> Subsumer<'a> {
    pub fn new(index: &'a ContainmentIndex, fingerprinter: Fingerprinter) -> Self {
        Self {
            index,
            fingerprinter,
        }
    }

    /// Nearest ancestor of `domain` present in the index.
    pub fn blocking_ancestor<'d>(&self, domain: &'d str) -> Option<&'d str> {
        ancestors(domain).find(|parent| {
            let fp = self.fingerprinter.fingerprint(parent);
            self.index.contains_fingerprint(&fp)
        })
    }

    /// Eliminate the record at `position` if one of its ancestors is
    /// indexed. Records that are already eliminated are skipped without
    /// hashing anything.
    pub fn reduce(&self, records: &mut Records, position: usize, domain: &str) -> bool {
        match records.get(position) {
            Some(record) if !record.is_eliminated() => {}
            _ => return false,
        }
        match self.blocking_ancestor(domain) {
            Some(_) => records.eliminate(position),
            None => false,
        }
    }
}
