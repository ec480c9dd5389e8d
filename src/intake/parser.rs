use crate::allocation::{Club, Submission, Term};
use crate::config::AllocationRules;
use chrono::NaiveDateTime;
use csv::StringRecord;

/// Turns one CSV record into a submission, or `None` (with a warning) when
/// the row is unusable. Blank and malformed club cells are dropped; a row
/// only dies on a broken timestamp or group label.
pub(crate) fn parse_submission(record: &StringRecord, rules: &AllocationRules) -> Option<Submission> {
    let submitted_raw = record.get(0).unwrap_or_default();
    let Some(submitted) = parse_timestamp(submitted_raw) else {
        tracing::warn!(timestamp = %submitted_raw, "skipping row with unparseable timestamp");
        return None;
    };

    let name = record.get(1).unwrap_or_default().trim().to_lowercase();
    let group = record.get(2).unwrap_or_default().trim().to_string();
    let Some(year) = year_from_group(&group) else {
        tracing::warn!(pupil = %name, group = %group, "skipping row with unusable group label");
        return None;
    };

    let fields: Vec<&str> = record.iter().skip(3).collect();
    let term_count = fields.len() / rules.max_requests;
    let mut terms = Vec::with_capacity(term_count);
    for term_idx in 0..term_count {
        let slice = &fields[term_idx * rules.max_requests..][..rules.max_requests];
        let requests: Vec<Club> = slice
            .iter()
            .filter(|field| !field.trim().is_empty())
            .filter_map(|field| Club::parse(field))
            .collect();
        terms.push(Term::new(term_idx as u32 + 1, requests));
    }

    Some(Submission {
        submitted,
        name,
        group,
        year,
        terms,
    })
}

/// The form export stamps rows like `2025/09/01 09:30:00 AM CET`; the
/// trailing timezone token carries no information and is dropped before
/// parsing.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let upper = value.trim().to_ascii_uppercase();
    let candidate = match upper.rsplit_once(' ') {
        Some((head, tail)) if tail != "AM" && tail != "PM" => head,
        _ => upper.as_str(),
    };
    NaiveDateTime::parse_from_str(candidate.trim(), "%Y/%m/%d %I:%M:%S %p").ok()
}

/// Year number from a group label such as `P6A`.
fn year_from_group(group: &str) -> Option<u8> {
    group
        .chars()
        .nth(1)?
        .to_digit(10)
        .map(|digit| digit as u8)
}
