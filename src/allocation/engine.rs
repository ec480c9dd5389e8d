use super::club::Club;
use super::roster::SeatLedger;
use super::submission::Submission;
use crate::config::AllocationRules;

/// Result of one allocation run: submissions carrying their resolved
/// per-term allocations, plus the seat rosters behind them.
#[derive(Debug)]
pub struct AllocationOutcome {
    pub submissions: Vec<Submission>,
    pub ledger: SeatLedger,
}

/// Round-based greedy matcher.
///
/// Runs `max_requests` rounds over a fixed submission order. Each round a
/// submission may win at most one new seat per term, taking the highest
/// remaining preference with room. Nothing is ever undone; preferences
/// still unplaced after the last round stay unplaced.
pub struct AllocationEngine {
    rules: AllocationRules,
}

impl AllocationEngine {
    pub fn new(rules: AllocationRules) -> Self {
        Self { rules }
    }

    /// Allocates against a fresh ledger. `submissions` must already be in
    /// priority order; the engine never re-sorts.
    pub fn run(&self, mut submissions: Vec<Submission>) -> AllocationOutcome {
        let mut ledger = SeatLedger::new(self.rules.clone());
        self.run_rounds(&mut submissions, &mut ledger);
        AllocationOutcome {
            submissions,
            ledger,
        }
    }

    /// One full pass of `max_requests` rounds over existing state. Calling
    /// this again on an already-allocated result places nothing new.
    pub fn run_rounds(&self, submissions: &mut [Submission], ledger: &mut SeatLedger) {
        for round in 1..=self.rules.max_requests {
            tracing::debug!(round, "starting allocation round");
            for submission in submissions.iter_mut() {
                tracing::info!(
                    pupil = %submission.name,
                    group = %submission.group,
                    "allocating submission"
                );
                self.visit(submission, ledger);
            }
        }
    }

    /// Gives `submission` one placement attempt per term: requested clubs
    /// are tried in priority order and the first acceptance ends the term's
    /// turn for this round.
    fn visit(&self, submission: &mut Submission, ledger: &mut SeatLedger) {
        for term_idx in 0..submission.terms.len() {
            let term_id = submission.terms[term_idx].id;
            let requests = submission.terms[term_idx].requests.clone();
            for club in requests {
                if submission.terms[term_idx].accepted.contains(&club) {
                    continue;
                }
                if ledger.try_add(term_id, &club, submission, term_idx) {
                    tracing::info!(
                        pupil = %submission.name,
                        term = term_id,
                        club = %club,
                        "allocated"
                    );
                    if self.rules.spans_both_terms(&club.name) {
                        self.mirror_into_second_term(&club, submission, ledger, term_idx);
                    }
                    break;
                }
            }
        }
    }

    /// A both-term club won in one term is immediately attempted in the
    /// second term, bypassing that term's requested list. The mirror goes
    /// through the ordinary ledger and acceptance checks and is dropped
    /// outright if either refuses: succeed once or never, no retry.
    fn mirror_into_second_term(
        &self,
        club: &Club,
        submission: &mut Submission,
        ledger: &mut SeatLedger,
        placed_idx: usize,
    ) {
        const SECOND_TERM: usize = 1;
        if placed_idx == SECOND_TERM || submission.terms.len() <= SECOND_TERM {
            return;
        }
        let term_id = submission.terms[SECOND_TERM].id;
        if ledger.try_add(term_id, club, submission, SECOND_TERM) {
            tracing::info!(
                pupil = %submission.name,
                term = term_id,
                club = %club,
                "mirrored both-term club"
            );
        }
    }
}
