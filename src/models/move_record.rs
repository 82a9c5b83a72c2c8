use crate::models::error::SError;
use camino::Utf8PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePair {
    pub original: Utf8PathBuf,
    pub relocated: Utf8PathBuf,
}

/// Pairs produced by one relocation pass, in the order they were moved.
/// Consumed once by the matching restore pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveRecord {
    pairs: Vec<MovePair>,
}

impl MoveRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, original: Utf8PathBuf, relocated: Utf8PathBuf) {
        self.pairs.push(MovePair {
            original,
            relocated,
        });
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[MovePair] {
        &self.pairs
    }

    /// Last moved, first out.
    pub fn into_restore_order(self) -> impl Iterator<Item = MovePair> {
        self.pairs.into_iter().rev()
    }
}

/// A folder that could not be moved, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveFailure {
    pub path: Utf8PathBuf,
    pub error: SError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelocationReport {
    pub record: MoveRecord,
    pub failures: Vec<MoveFailure>,
}

/// An aborted relocation pass. `record` holds whatever was moved before the
/// abort and must be restored by the caller.
#[derive(Debug)]
pub struct RelocationFailure {
    pub record: MoveRecord,
    pub error: SError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoreReport {
    pub restored: Vec<Utf8PathBuf>,
    pub skipped: Vec<Utf8PathBuf>,
    pub failures: Vec<MoveFailure>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}
