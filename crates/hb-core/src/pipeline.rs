//! Three-pass conversion driver.
//!
//! 1. Fingerprint every domain entry into [`Records`] (when deduping or
//!    when the format is reducible), then drop duplicates in memory.
//! 2. For reducible formats, rescan and drop entries whose ancestor
//!    domain survived pass 1.
//! 3. Rescan and write every surviving entry, compressing runs for
//!    compressible formats.

use std::io::Write;

use log::{debug, info};

use crate::compress::{Group, RunCompressor};
use crate::config::Config;
use crate::error::Error;
use crate::format::Emitter;
use crate::hash::Fingerprinter;
use crate::normalize::{EntryCounter, EntryKind, Normalizer};
use crate::reduce::{dedupe, Records, Subsumer};
use crate::source::Source;

/// Counters for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Entries seen in the final pass (domains plus kept comments).
    pub entries: usize,
    /// Domain entries written.
    pub domains: usize,
    /// Comment entries written.
    pub comments: usize,
    pub duplicates: usize,
    pub subsumed: usize,
    pub lines_written: usize,
}

/// Convert `source` into `config.format`, writing to `out`.
///
/// The configuration is validated before the source is read.
pub fn convert<W: Write>(source: &mut Source, config: &Config, out: &mut W) -> Result<Summary, Error> {
    config.validate()?;

    let spec = config.format.spec();
    let fingerprinter = Fingerprinter::new(config.hash_width, config.hash_seed);
    let normalizer = Normalizer::new(&config.from_blackhole, config.keep_comments);
    let mut summary = Summary::default();

    let mut records = if config.dedupe || spec.is_reducible() {
        Some(build_records(source, normalizer, fingerprinter)?)
    } else {
        None
    };

    if let Some(records) = records.as_mut() {
        if config.dedupe {
            summary.duplicates = dedupe(records);
        }
        debug!("pass 1: {} surviving record(s)", records.survivors());
        if spec.is_reducible() {
            summary.subsumed = subsume(source, normalizer, fingerprinter, records)?;
        }
    }

    write_output(source, config, normalizer, records.as_ref(), out, &mut summary)?;
    out.flush()?;

    info!(
        "{}: {} entries, {} duplicate(s), {} subsumed, {} line(s) written",
        config.format,
        summary.entries,
        summary.duplicates,
        summary.subsumed,
        summary.lines_written
    );
    Ok(summary)
}

/// Pass 1: one record per domain entry.
fn build_records(
    source: &mut Source,
    normalizer: Normalizer<'_>,
    fingerprinter: Fingerprinter,
) -> Result<Records, Error> {
    let mut records = Records::new(fingerprinter.width());
    let mut counter = EntryCounter::new(normalizer);

    for line in source.scan()? {
        let line = line?;
        for entry in counter.feed(&line) {
            if entry.kind == EntryKind::Domain {
                records.push(entry.position, fingerprinter.fingerprint(entry.text));
            }
        }
    }

    debug!(
        "pass 1: {} record(s) from {} entries, {}-bit fingerprints",
        records.len(),
        counter.count(),
        fingerprinter.width().bits()
    );
    Ok(records)
}

/// Pass 2: eliminate entries whose ancestor survives.
fn subsume(
    source: &mut Source,
    normalizer: Normalizer<'_>,
    fingerprinter: Fingerprinter,
    records: &mut Records,
) -> Result<usize, Error> {
    let index = records.build_index()?;
    if index.is_empty() {
        debug!("pass 2: nothing indexed, skipping");
        return Ok(0);
    }
    debug!("pass 2: containment index of {} bytes", index.len());

    let subsumer = Subsumer::new(&index, fingerprinter);
    let mut counter = EntryCounter::new(normalizer);
    let mut removed = 0usize;

    for line in source.scan()? {
        let line = line?;
        for entry in counter.feed(&line) {
            if entry.kind == EntryKind::Domain && subsumer.reduce(records, entry.position, entry.text) {
                removed += 1;
            }
        }
    }

    debug!("pass 2: {} subsumed", removed);
    Ok(removed)
}

/// Pass 3: emit survivors in input order.
fn write_output<W: Write>(
    source: &mut Source,
    config: &Config,
    normalizer: Normalizer<'_>,
    records: Option<&Records>,
    out: &mut W,
    summary: &mut Summary,
) -> Result<(), Error> {
    let spec = config.format.spec();
    let emitter = Emitter::new(config);
    let group_size = if spec.is_compressible() { config.group_size } else { 1 };
    let mut compressor = RunCompressor::new(group_size);
    let mut counter = EntryCounter::new(normalizer);
    let mut groups: Vec<Group> = Vec::new();

    for line in source.scan()? {
        let line = line?;
        for entry in counter.feed(&line) {
            match entry.kind {
                EntryKind::Domain => {
                    if records.is_some_and(|r| r.is_eliminated(entry.position)) {
                        continue;
                    }
                    summary.domains += 1;
                }
                EntryKind::Comment => summary.comments += 1,
            }
            compressor.push(entry.kind, entry.text, &mut groups);
        }
        for group in groups.drain(..) {
            summary.lines_written += emitter.write_group(out, &group)?;
        }
    }

    compressor.finish(&mut groups);
    for group in groups.drain(..) {
        summary.lines_written += emitter.write_group(out, &group)?;
    }

    summary.entries = counter.count();
    Ok(())
}
