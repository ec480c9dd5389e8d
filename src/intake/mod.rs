//! Readers for the two inputs: the ranked-request CSV export and the
//! optional priority-override name list.

mod parser;

use crate::allocation::{PriorityOverrides, Submission};
use crate::config::AllocationRules;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug)]
pub enum IntakeError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeError::Io(err) => write!(f, "failed to read input: {}", err),
            IntakeError::Csv(err) => write!(f, "invalid CSV data: {}", err),
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntakeError::Io(err) => Some(err),
            IntakeError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads the ranked-request export: one row per response holding the
/// timestamp, pupil name, group label, and per-term blocks of club
/// descriptions.
///
/// The header row is recognized by its `Timestamp` first field. A pupil
/// submitting twice keeps only the later row in file order. Unusable rows
/// are logged and skipped; a header-only file yields an empty collection.
pub fn read_submissions<R: Read>(
    reader: R,
    rules: &AllocationRules,
) -> Result<Vec<Submission>, IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut submissions: Vec<Submission> = Vec::new();
    let mut by_pupil: HashMap<(String, String), usize> = HashMap::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.get(0) == Some("Timestamp") {
            continue;
        }
        let Some(submission) = parser::parse_submission(&record, rules) else {
            continue;
        };
        match by_pupil.entry((submission.name.clone(), submission.group.clone())) {
            Entry::Occupied(slot) => {
                tracing::info!(
                    pupil = %submission.name,
                    group = %submission.group,
                    "replacing earlier duplicate submission"
                );
                submissions[*slot.get()] = submission;
            }
            Entry::Vacant(slot) => {
                slot.insert(submissions.len());
                submissions.push(submission);
            }
        }
    }

    tracing::info!(count = submissions.len(), "parsed submissions");
    Ok(submissions)
}

pub fn read_submissions_from_path<P: AsRef<Path>>(
    path: P,
    rules: &AllocationRules,
) -> Result<Vec<Submission>, IntakeError> {
    let file = std::fs::File::open(path)?;
    read_submissions(file, rules)
}

/// Reads the override list: one pupil name per line, blanks ignored.
pub fn read_priority_list<R: Read>(reader: R) -> Result<PriorityOverrides, IntakeError> {
    let mut names = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    let overrides = PriorityOverrides::new(names);
    tracing::info!(count = overrides.len(), "loaded priority overrides");
    Ok(overrides)
}

pub fn read_priority_list_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<PriorityOverrides, IntakeError> {
    let file = std::fs::File::open(path)?;
    read_priority_list(file)
}
