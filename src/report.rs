//! Writers for the two output files and the roster summary shown after a
//! run.

use crate::allocation::{PupilId, SeatLedger, Submission, Term};
use crate::config::AllocationRules;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV output: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not render summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row per pupil: display name, group, then a readable allocation
/// summary per term.
pub fn write_pupils<W: Write>(writer: W, submissions: &[Submission]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for submission in submissions {
        let mut row = vec![submission.display_name(), submission.group.clone()];
        row.extend(submission.terms.iter().map(Term::allocated_summary));
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// One column per (term, club) roster, pupils listed down the column and
/// shorter columns padded with blanks.
pub fn write_clubs<W: Write>(writer: W, ledger: &SeatLedger) -> Result<(), ReportError> {
    let columns: Vec<(String, &[PupilId])> = ledger
        .entries()
        .map(|((term_id, club), roster)| (format!("{club} [term {term_id}]"), roster))
        .collect();
    if columns.is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns.iter().map(|(header, _)| header.as_str()))?;

    let height = columns
        .iter()
        .map(|(_, roster)| roster.len())
        .max()
        .unwrap_or(0);
    for row_idx in 0..height {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, roster)| {
                roster
                    .get(row_idx)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect();
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Occupancy overview of every roster entry, printable as text or JSON.
#[derive(Debug, Serialize)]
pub struct RosterSummary {
    pub entries: Vec<RosterEntrySummary>,
}

#[derive(Debug, Serialize)]
pub struct RosterEntrySummary {
    pub term: u32,
    pub club: String,
    pub day: String,
    pub seats_taken: usize,
    pub limit: usize,
    pub full: bool,
}

impl RosterSummary {
    pub fn from_ledger(ledger: &SeatLedger, rules: &AllocationRules) -> Self {
        let entries = ledger
            .entries()
            .map(|((term_id, club), roster)| {
                let limit = rules.limit_for(&club.name);
                RosterEntrySummary {
                    term: *term_id,
                    club: club.name.clone(),
                    day: club.day.label().to_string(),
                    seats_taken: roster.len(),
                    limit,
                    full: roster.len() >= limit,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = write!(
                out,
                "term {}: {} ({}) = {}/{}",
                entry.term, entry.club, entry.day, entry.seats_taken, entry.limit
            );
            if entry.full {
                out.push_str(" FULL");
            }
            out.push('\n');
        }
        out
    }
}
