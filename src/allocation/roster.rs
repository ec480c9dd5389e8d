use super::club::Club;
use super::submission::{PupilId, Submission};
use crate::config::AllocationRules;
use std::collections::BTreeMap;

/// Key for one seat roster: term ordinal plus club identity.
pub type SeatKey = (u32, Club);

/// Per (term, club) roster enforcing the configured seat limits.
///
/// Entries come into existence lazily at first demand and are never
/// removed within a run. The `BTreeMap` keeps report iteration
/// deterministic.
#[derive(Debug)]
pub struct SeatLedger {
    rules: AllocationRules,
    entries: BTreeMap<SeatKey, Vec<PupilId>>,
}

impl SeatLedger {
    pub fn new(rules: AllocationRules) -> Self {
        Self {
            rules,
            entries: BTreeMap::new(),
        }
    }

    /// Attempts to seat `submission` in `(term_id, club)`.
    ///
    /// A missing entry is created on first demand. An existing entry is
    /// refused once its occupancy reaches the club's limit. The
    /// submission's own acceptance rule must also pass before the seat is
    /// recorded; capacity refusal and rule refusal are both plain `false`.
    pub fn try_add(
        &mut self,
        term_id: u32,
        club: &Club,
        submission: &mut Submission,
        term_idx: usize,
    ) -> bool {
        let key = (term_id, club.clone());
        if let Some(roster) = self.entries.get(&key) {
            let limit = self.rules.limit_for(&club.name);
            if roster.len() >= limit {
                tracing::debug!(term_id, club = %club, limit, "club full");
                return false;
            }
        }
        if !submission.allocate(term_idx, club, &self.rules) {
            return false;
        }
        self.entries.entry(key).or_default().push(submission.id());
        true
    }

    pub fn roster(&self, term_id: u32, club: &Club) -> Option<&[PupilId]> {
        self.entries
            .get(&(term_id, club.clone()))
            .map(Vec::as_slice)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SeatKey, &[PupilId])> {
        self.entries
            .iter()
            .map(|(key, roster)| (key, roster.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
