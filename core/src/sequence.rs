//! Sequential unlock bookkeeping for ordered course lists.
//!
//! Every ordered list is identified by a track key. The ledger only stores the
//! completed indices; the next unlocked index is always derived by scanning for
//! the first incomplete entry so the gate lives in exactly one place.

use std::collections::BTreeSet;

/// Reasons the ledger refuses to record a course completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceRejection {
    /// The index was already recorded for the track.
    AlreadyComplete,
    /// Earlier entries are still incomplete.
    Locked {
        /// Index that must be completed next.
        next: usize,
    },
    /// The index lies past the end of the ordered list.
    OutOfRange {
        /// Number of entries in the list.
        len: usize,
    },
}

/// Result of a successful completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceAdvance {
    /// Index that was recorded.
    pub index: usize,
    /// Whether the track became fully complete with this record.
    pub finished: bool,
}

/// Completed entries of any number of ordered tracks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseLedger<K> {
    completed: BTreeSet<(K, usize)>,
}

impl<K> Default for CourseLedger<K> {
    fn default() -> Self {
        Self {
            completed: BTreeSet::new(),
        }
    }
}

impl<K> CourseLedger<K>
where
    K: Ord + Clone,
{
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the entry at `index` of `track` was completed.
    #[must_use]
    pub fn is_complete(&self, track: &K, index: usize) -> bool {
        self.completed.contains(&(track.clone(), index))
    }

    /// Index of the first incomplete entry, or `len` when the list is done.
    #[must_use]
    pub fn next_unlocked(&self, track: &K, len: usize) -> usize {
        (0..len)
            .find(|index| !self.is_complete(track, *index))
            .unwrap_or(len)
    }

    /// Number of completed entries within the first `len` indices.
    #[must_use]
    pub fn completed_count(&self, track: &K, len: usize) -> usize {
        (0..len)
            .filter(|index| self.is_complete(track, *index))
            .count()
    }

    /// Whether every entry of a `len`-long list is complete. Empty lists are
    /// trivially complete.
    #[must_use]
    pub fn is_track_complete(&self, track: &K, len: usize) -> bool {
        self.next_unlocked(track, len) == len
    }

    /// Records completion of `index`, enforcing the strict sequential gate.
    pub fn record(
        &mut self,
        track: &K,
        index: usize,
        len: usize,
    ) -> Result<SequenceAdvance, SequenceRejection> {
        if index >= len {
            return Err(SequenceRejection::OutOfRange { len });
        }
        if self.is_complete(track, index) {
            return Err(SequenceRejection::AlreadyComplete);
        }
        let next = self.next_unlocked(track, len);
        if index != next {
            return Err(SequenceRejection::Locked { next });
        }

        let _ = self.completed.insert((track.clone(), index));
        Ok(SequenceAdvance {
            index,
            finished: self.is_track_complete(track, len),
        })
    }

    /// Number of completed entries across every track.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Reports whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Forgets every recorded completion.
    pub fn clear(&mut self) {
        self.completed.clear();
    }
}
