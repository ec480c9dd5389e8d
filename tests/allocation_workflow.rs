use chrono::{NaiveDate, NaiveDateTime};
use clubroster::allocation::{
    rank, AllocationEngine, AllocationOutcome, PriorityOverrides, SeatLedger, Submission,
};
use clubroster::config::AllocationRules;
use clubroster::intake;
use std::io::Cursor;

const HEADER: &str = "Timestamp,Full Name,Class,First Choice,Second Choice,Third Choice,First Choice,Second Choice,Third Choice\n";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 1)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

fn run_allocation(csv: &str, rules: AllocationRules) -> AllocationOutcome {
    let mut submissions =
        intake::read_submissions(Cursor::new(csv), &rules).expect("input parses");
    rank(&mut submissions);
    AllocationEngine::new(rules).run(submissions)
}

fn find<'a>(submissions: &'a [Submission], name: &str) -> &'a Submission {
    submissions
        .iter()
        .find(|submission| submission.name == name)
        .expect("pupil present in outcome")
}

/// Sweeps every invariant the allocator promises: day-unique terms,
/// repeat-exclusion across terms, capacity bounds, unique roster
/// membership, and ledger/submission consistency in both directions.
fn assert_invariants(outcome: &AllocationOutcome, rules: &AllocationRules) {
    for submission in &outcome.submissions {
        let mut held_excluded: Vec<&str> = Vec::new();
        for term in &submission.terms {
            let days: std::collections::BTreeSet<_> =
                term.accepted.iter().map(|club| club.day).collect();
            assert_eq!(
                days.len(),
                term.accepted.len(),
                "two accepted clubs share a day for {}",
                submission.name
            );
            for club in &term.accepted {
                if rules.repeat_excluded(&club.name) {
                    assert!(
                        !held_excluded.contains(&club.name.as_str()),
                        "{} repeats excluded club {}",
                        submission.name,
                        club.name
                    );
                    held_excluded.push(&club.name);
                }
                let roster = outcome
                    .ledger
                    .roster(term.id, club)
                    .expect("accepted club has a ledger entry");
                assert!(
                    roster.contains(&submission.id()),
                    "{} accepted {} but is missing from its roster",
                    submission.name,
                    club
                );
                assert!(
                    term.requests.contains(club)
                        || (term.id == 2 && rules.spans_both_terms(&club.name)),
                    "{} holds {} without requesting it",
                    submission.name,
                    club
                );
            }
        }
    }
    for ((term_id, club), roster) in outcome.ledger.entries() {
        assert!(
            roster.len() <= rules.limit_for(&club.name),
            "roster for {club} exceeds its limit"
        );
        let unique: std::collections::BTreeSet<_> = roster.iter().collect();
        assert_eq!(unique.len(), roster.len(), "duplicate occupant in {club}");
        for pupil in roster {
            let submission = find(&outcome.submissions, &pupil.name);
            let term = submission
                .terms
                .iter()
                .find(|term| term.id == *term_id)
                .expect("roster points at an existing term");
            assert!(
                term.accepted.contains(club),
                "{} is on the {} roster without holding the club",
                pupil.name,
                club
            );
        }
    }
}

#[test]
fn full_run_upholds_all_invariants() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:00:00 AM CET,Ada Lovelace,P7A,Hockey (Monday) - Teacher C,French (Tuesday) - Teacher G,Spanish (Friday) - Teacher F,Art and Craft (Monday) - Teacher H,ICT Club (Tuesday) - Teacher I,iMovie Club (Friday) - Teacher L\n\
2025/09/01 09:01:00 AM CET,Alan Turing,P6B,Hockey (Monday) - Teacher C,Netball (Tuesday) - Teacher B,Art and Craft (Friday) - Teacher J,Football (Monday) - Teacher A,French (Tuesday) - Teacher G,Spanish (Friday) - Teacher F\n\
2025/09/01 09:02:00 AM CET,Grace Hopper,P5A,Fitness Club (Monday) - Teacher E,ICT Club (Tuesday) - Teacher I,Art and Craft (Friday) - Teacher M,Hockey (Monday) - Teacher C,Needlecraft (Monday) - Teacher K,iMovie Club (Friday) - Teacher L\n\
2025/09/01 09:03:00 AM CET,Joan Clarke,P4B,Netball (Tuesday) - Teacher B,Football (Monday) - Teacher A,Spanish (Friday) - Teacher F,Fitness Club (Monday) - Teacher E,Scripture Union (Tuesday) - Teacher N,Art and Craft (Friday) - Teacher J\n"
    );
    let rules = AllocationRules::default();
    let outcome = run_allocation(&csv, rules.clone());
    assert_eq!(outcome.submissions.len(), 4);
    assert_invariants(&outcome, &rules);

    // ranking put the oldest year first and the engine never re-sorts
    assert_eq!(outcome.submissions[0].name, "ada lovelace");
    assert_eq!(outcome.submissions[3].name, "joan clarke");
}

#[test]
fn contested_single_seat_goes_to_higher_priority() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:30:00 AM CET,Young Early,P4A,Chess (Monday) - Teacher P,Football (Tuesday) - Teacher A,,,,\n\
2025/09/01 10:00:00 AM CET,Old Late,P7A,Chess (Monday) - Teacher P,Football (Tuesday) - Teacher A,,,,\n"
    );
    let mut rules = AllocationRules::default();
    rules.club_limits.insert("Chess".to_string(), 1);
    let outcome = run_allocation(&csv, rules.clone());
    assert_invariants(&outcome, &rules);

    // the older year wins the only seat despite submitting later
    let winner = find(&outcome.submissions, "old late");
    let loser = find(&outcome.submissions, "young early");
    assert_eq!(winner.terms[0].accepted[0].name, "Chess");
    assert_eq!(loser.terms[0].accepted[0].name, "Football");
}

#[test]
fn both_term_club_shows_up_in_second_term_unrequested() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:00:00 AM CET,Ada Lovelace,P6A,Netball (Tuesday) - Teacher B,,,Spanish (Friday) - Teacher F,,\n"
    );
    let rules = AllocationRules::default();
    let outcome = run_allocation(&csv, rules.clone());
    assert_invariants(&outcome, &rules);

    let ada = find(&outcome.submissions, "ada lovelace");
    assert!(ada.terms[1]
        .accepted
        .iter()
        .any(|club| club.name == "Netball"));
    assert!(!ada.terms[1]
        .requests
        .iter()
        .any(|club| club.name == "Netball"));
}

#[test]
fn override_pushes_earliest_submitter_behind_same_year_rival() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:00:00 AM CET,First In,P6A,Chess (Monday) - Teacher P,,,,,\n\
2025/09/01 09:30:00 AM CET,Second In,P6B,Chess (Monday) - Teacher P,,,,,\n"
    );
    let mut rules = AllocationRules::default();
    rules.club_limits.insert("Chess".to_string(), 1);

    let mut submissions =
        intake::read_submissions(Cursor::new(csv.as_str()), &rules).expect("input parses");
    let overrides =
        intake::read_priority_list(Cursor::new("First In\n")).expect("priority list reads");
    overrides.apply(&mut submissions, now());
    rank(&mut submissions);
    assert_eq!(submissions[0].name, "second in");

    let outcome = AllocationEngine::new(rules.clone()).run(submissions);
    assert_invariants(&outcome, &rules);
    let rival = find(&outcome.submissions, "second in");
    let demoted = find(&outcome.submissions, "first in");
    assert_eq!(rival.terms[0].accepted[0].name, "Chess");
    assert!(demoted.terms[0].accepted.is_empty());
}

#[test]
fn rerunning_over_allocated_state_changes_nothing() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:00:00 AM CET,Ada Lovelace,P7A,Hockey (Monday) - Teacher C,French (Tuesday) - Teacher G,Spanish (Friday) - Teacher F,Art and Craft (Monday) - Teacher H,ICT Club (Tuesday) - Teacher I,iMovie Club (Friday) - Teacher L\n\
2025/09/01 09:01:00 AM CET,Alan Turing,P6B,Hockey (Monday) - Teacher C,Netball (Tuesday) - Teacher B,Art and Craft (Friday) - Teacher J,Football (Monday) - Teacher A,French (Tuesday) - Teacher G,Spanish (Friday) - Teacher F\n"
    );
    let rules = AllocationRules::default();
    let mut submissions =
        intake::read_submissions(Cursor::new(csv.as_str()), &rules).expect("input parses");
    rank(&mut submissions);

    let engine = AllocationEngine::new(rules.clone());
    let mut ledger = SeatLedger::new(rules.clone());
    engine.run_rounds(&mut submissions, &mut ledger);

    let snapshot: Vec<Vec<String>> = submissions
        .iter()
        .flat_map(|submission| submission.terms.iter())
        .map(|term| term.accepted.iter().map(ToString::to_string).collect())
        .collect();
    let entries_before = ledger.len();

    engine.run_rounds(&mut submissions, &mut ledger);
    let after: Vec<Vec<String>> = submissions
        .iter()
        .flat_map(|submission| submission.terms.iter())
        .map(|term| term.accepted.iter().map(ToString::to_string).collect())
        .collect();
    assert_eq!(snapshot, after);
    assert_eq!(ledger.len(), entries_before);
}

#[test]
fn deterministic_across_runs_on_identical_input() {
    let csv = format!(
        "{HEADER}\
2025/09/01 09:00:00 AM CET,Ada Lovelace,P6A,Hockey (Monday) - Teacher C,French (Tuesday) - Teacher G,,Netball (Tuesday) - Teacher B,,\n\
2025/09/01 09:00:00 AM CET,Alan Turing,P6A,Hockey (Monday) - Teacher C,French (Tuesday) - Teacher G,,Netball (Tuesday) - Teacher B,,\n\
2025/09/01 09:00:00 AM CET,Grace Hopper,P6A,Hockey (Monday) - Teacher C,French (Tuesday) - Teacher G,,Netball (Tuesday) - Teacher B,,\n"
    );
    let rules = AllocationRules::default();
    let first = run_allocation(&csv, rules.clone());
    let second = run_allocation(&csv, rules.clone());

    let order = |outcome: &AllocationOutcome| -> Vec<String> {
        outcome
            .submissions
            .iter()
            .map(|submission| submission.name.clone())
            .collect()
    };
    assert_eq!(order(&first), order(&second));

    let rosters = |outcome: &AllocationOutcome| -> Vec<(u32, String, Vec<String>)> {
        outcome
            .ledger
            .entries()
            .map(|((term_id, club), roster)| {
                (
                    *term_id,
                    club.to_string(),
                    roster.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    };
    assert_eq!(rosters(&first), rosters(&second));
}
