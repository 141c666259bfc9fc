use std::borrow::Cow;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::DomainError;
use crate::database::models::{ApprovedEntry, ShiftType};

pub const APPROVED_REPORT_HEADERS: [&str; 3] = ["date", "shift", "approved_people"];

const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovedGroup {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub people: Vec<String>,
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), DomainError> {
    if start > end {
        return Err(DomainError::validation(
            "End date must be on or after start date.",
        ));
    }
    Ok(())
}

/// Groups approved entries in `[start, end]` by date and shift type, sorted
/// by date with day before night. Names keep first-seen order without repeats.
pub fn group_approved(entries: &[ApprovedEntry], start: NaiveDate, end: NaiveDate) -> Vec<ApprovedGroup> {
    let mut groups: Vec<ApprovedGroup> = Vec::new();
    let mut positions: HashMap<(NaiveDate, ShiftType), usize> = HashMap::new();

    for entry in entries
        .iter()
        .filter(|e| e.shift_date >= start && e.shift_date <= end)
    {
        let key = (entry.shift_date, entry.shift_type);
        let index = *positions.entry(key).or_insert_with(|| {
            groups.push(ApprovedGroup {
                date: entry.shift_date,
                shift: entry.shift_type,
                people: Vec::new(),
            });
            groups.len() - 1
        });

        let name = entry
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NAME);
        let people = &mut groups[index].people;
        if !people.iter().any(|p| p == name) {
            people.push(name.to_string());
        }
    }

    groups.sort_by_key(|g| (g.date, g.shift));
    groups
}

/// Quotes a field only when it holds a delimiter, a quote or a newline.
pub fn escape_csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Header row then one line per row, joined with `\n`. No rows gives an empty document.
pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape_csv_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.iter()
                .map(|v| escape_csv_field(v))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

pub fn approved_report_csv(groups: &[ApprovedGroup]) -> String {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| vec![g.date.to_string(), g.shift.to_string(), g.people.join("; ")])
        .collect();
    to_csv(&APPROVED_REPORT_HEADERS, &rows)
}

pub fn approved_report_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("overtime_report_approved_{start}_to_{end}.csv")
}
