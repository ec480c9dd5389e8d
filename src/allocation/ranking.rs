use super::submission::Submission;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Pupils whose submissions are re-timestamped to `now` before ranking.
///
/// Matching is case-insensitive on the pupil name. Rewriting the timestamp
/// pushes the submission behind every real one in its year group, which is
/// how a pupil is re-queued without touching anyone else's order.
#[derive(Debug, Clone, Default)]
pub struct PriorityOverrides {
    names: BTreeSet<String>,
}

impl PriorityOverrides {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn apply(&self, submissions: &mut [Submission], now: NaiveDateTime) {
        if self.names.is_empty() {
            return;
        }
        for submission in submissions {
            if self.contains(&submission.name) {
                tracing::info!(pupil = %submission.name, "rewriting submission time to now");
                submission.submitted = now;
            }
        }
    }
}

/// Total priority order: oldest year groups first, earlier submissions
/// first within a year. Full ties fall back to `(name, group)` so runs
/// over identical input always produce the same order.
pub fn rank(submissions: &mut [Submission]) {
    submissions.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| a.submitted.cmp(&b.submitted))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.group.cmp(&b.group))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::submission::Term;
    use chrono::{Duration, NaiveDate};

    fn submission(name: &str, group: &str, year: u8, minute: u32) -> Submission {
        Submission {
            submitted: NaiveDate::from_ymd_opt(2025, 9, 1)
                .expect("valid date")
                .and_hms_opt(9, minute, 0)
                .expect("valid time"),
            name: name.to_string(),
            group: group.to_string(),
            year,
            terms: vec![Term::new(1, Vec::new())],
        }
    }

    #[test]
    fn ranks_older_years_first_then_earlier_submissions() {
        let mut submissions = vec![
            submission("young early", "P4A", 4, 0),
            submission("old late", "P7A", 7, 30),
            submission("old early", "P7B", 7, 5),
        ];
        rank(&mut submissions);
        let order: Vec<&str> = submissions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, ["old early", "old late", "young early"]);
    }

    #[test]
    fn override_sends_earliest_submitter_behind_competitor() {
        let mut submissions = vec![
            submission("first in", "P6A", 6, 0),
            submission("second in", "P6B", 6, 10),
        ];
        let overrides = PriorityOverrides::new(["First In"]);
        let now = submissions[1].submitted + Duration::days(30);
        overrides.apply(&mut submissions, now);
        rank(&mut submissions);
        assert_eq!(submissions[0].name, "second in");
        assert_eq!(submissions[1].submitted, now);
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let overrides = PriorityOverrides::new(["  Ada Lovelace  ", ""]);
        assert_eq!(overrides.len(), 1);
        assert!(overrides.contains("ada lovelace"));
        assert!(overrides.contains("ADA LOVELACE"));
        assert!(!overrides.contains("alan turing"));
    }

    #[test]
    fn full_ties_break_on_name_for_determinism() {
        let mut submissions = vec![
            submission("zed", "P5A", 5, 0),
            submission("amy", "P5B", 5, 0),
        ];
        rank(&mut submissions);
        assert_eq!(submissions[0].name, "amy");
    }
}
