//! Run compression: several consecutive domains on one output line.
//!
//! The compressor is either empty or accumulating a run of one entry
//! kind. A run is flushed when the kind changes, when it reaches the
//! group size, or at end of input. Domains are space-joined; comment runs
//! hold a single line each.

use crate::normalize::EntryKind;

/// One output unit handed to the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: EntryKind,
    /// Space-joined domains, or the comment line.
    pub text: String,
    pub count: usize,
}

impl Group {
    fn single(kind: EntryKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            count: 1,
        }
    }
}

/// Batches consecutive entries of the same kind.
#[derive(Debug)]
pub struct RunCompressor {
    group_size: usize,
    pending: Option<Group>,
}

impl RunCompressor {
    pub fn new(group_size: u8) -> Self {
        Self {
            group_size: usize::from(group_size.max(1)),
            pending: None,
        }
    }

    /// Feed one surviving entry; completed groups are pushed to `out`.
    pub fn push(&mut self, kind: EntryKind, text: &str, out: &mut Vec<Group>) {
        if self.group_size == 1 {
            out.push(Group::single(kind, text));
            return;
        }

        let extends = matches!(
            &self.pending,
            Some(run) if run.kind == kind && kind == EntryKind::Domain
        );
        match self.pending.as_mut() {
            Some(run) if extends => {
                run.text.push(' ');
                run.text.push_str(text);
                run.count += 1;
            }
            _ => {
                out.extend(self.pending.take());
                self.pending = Some(Group::single(kind, text));
            }
        }

        if let Some(run) = &self.pending {
            if run.count >= self.capacity(run.kind) {
                out.extend(self.pending.take());
            }
        }
    }

    /// Flush any pending run.
    pub fn finish(&mut self, out: &mut Vec<Group>) {
        out.extend(self.pending.take());
    }

    fn capacity(&self, kind: EntryKind) -> usize {
        match kind {
            EntryKind::Domain => self.group_size,
            EntryKind::Comment => 1,
        }
    }
}
