use super::club::{Club, ClubDay};
use crate::config::AllocationRules;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// One scheduling period within a submission.
///
/// `requests` holds the pupil's stated choices in priority order;
/// `accepted` fills in acceptance order as the engine places clubs.
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub id: u32,
    pub requests: Vec<Club>,
    pub accepted: Vec<Club>,
}

impl Term {
    /// Builds a term from parsed requests, dropping duplicate clubs while
    /// preserving the stated order.
    pub fn new(id: u32, requests: Vec<Club>) -> Self {
        let mut deduped: Vec<Club> = Vec::with_capacity(requests.len());
        for club in requests {
            if !deduped.contains(&club) {
                deduped.push(club);
            }
        }
        Self {
            id,
            requests: deduped,
            accepted: Vec::new(),
        }
    }

    pub fn day_taken(&self, day: ClubDay) -> bool {
        self.accepted.iter().any(|club| club.day == day)
    }

    /// Human-readable allocation summary, e.g. `Hockey (Monday) and French (Tuesday)`.
    pub fn allocated_summary(&self) -> String {
        self.accepted
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

/// Lightweight handle for a pupil, stored in ledger rosters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PupilId {
    pub name: String,
    pub group: String,
}

impl fmt::Display for PupilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", title_case(&self.name), self.group)
    }
}

/// One pupil's full response: when it arrived, who it is for, and the
/// ranked requests per term.
///
/// Identity is `(name, group)`; `name` is stored lowercased so matching is
/// case-insensitive, with `display_name` title-casing it back for output.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub submitted: NaiveDateTime,
    pub name: String,
    pub group: String,
    pub year: u8,
    pub terms: Vec<Term>,
}

impl Submission {
    pub fn id(&self) -> PupilId {
        PupilId {
            name: self.name.clone(),
            group: self.group.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    /// Acceptance rule: appends `club` to the term's accepted list and
    /// returns true iff the repeat rule and the day rule both hold.
    ///
    /// Repeat rule: a club in the repeat-exclusion set must not already be
    /// held (by name) in any term. Day rule: no club already accepted in
    /// this term may share the candidate's day. No mutation on refusal.
    pub fn allocate(&mut self, term_idx: usize, club: &Club, rules: &AllocationRules) -> bool {
        let repeat_ok = !rules.repeat_excluded(&club.name)
            || !self
                .terms
                .iter()
                .any(|term| term.accepted.iter().any(|held| held.name == club.name));
        let day_free = !self.terms[term_idx].day_taken(club.day);
        tracing::debug!(
            pupil = %self.name,
            term = self.terms[term_idx].id,
            club = %club,
            repeat_ok,
            day_free,
            "checking acceptance"
        );
        if repeat_ok && day_free {
            self.terms[term_idx].accepted.push(club.clone());
            return true;
        }
        false
    }
}

impl PartialEq for Submission {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.group == other.group
    }
}

impl Eq for Submission {}

/// Python-style title casing: uppercase the first letter of every
/// alphabetic run, lowercase the rest, so `mary-jane o'neil` becomes
/// `Mary-Jane O'Neil`.
pub(crate) fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut start_of_word = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if start_of_word {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(ch);
            start_of_word = true;
        }
    }
    out
}
