use std::sync::LazyLock;

use regex::Regex;

use super::DomainError;
use crate::database::models::{BANDS, TEAMS};

static INITIAL_AND_SURNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])\.?\s+(.+)$").expect("valid regex"));

static DISPLAY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\.\s+[A-Za-z][A-Za-z\s\-']+$").expect("valid regex"));

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `"j   edwards-SMITH"` becomes `"J. Edwards-Smith"`. Input that does not
/// look like an initial plus surname is only whitespace-collapsed.
pub fn normalize_display_name(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");

    let Some(captures) = INITIAL_AND_SURNAME.captures(&collapsed) else {
        return collapsed;
    };
    let initial = captures[1].to_uppercase();
    let surname = captures[2]
        .trim()
        .split(' ')
        .map(|part| part.split('-').map(title_case).collect::<Vec<_>>().join("-"))
        .collect::<Vec<_>>()
        .join(" ");

    format!("{initial}. {surname}")
}

pub fn is_valid_display_name(name: &str) -> bool {
    DISPLAY_NAME.is_match(name)
}

/// Normalises then validates; the error carries the message shown to users.
pub fn checked_display_name(input: &str) -> Result<String, DomainError> {
    let fixed = normalize_display_name(input);
    if is_valid_display_name(&fixed) {
        Ok(fixed)
    } else {
        Err(DomainError::validation(
            "Name must be in the format \"J. Surname\" (example: \"J. Edwards\").",
        ))
    }
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Team and band must be one of the known values, or unset.
pub fn checked_staffing(
    team: Option<&str>,
    band: Option<&str>,
) -> Result<(Option<String>, Option<String>), DomainError> {
    let team = blank_to_none(team);
    let band = blank_to_none(band);

    if let Some(team) = &team {
        if !TEAMS.contains(&team.as_str()) {
            return Err(DomainError::validation(format!("Unknown team: {team}")));
        }
    }
    if let Some(band) = &band {
        if !BANDS.contains(&band.as_str()) {
            return Err(DomainError::validation(format!("Unknown band: {band}")));
        }
    }
    Ok((team, band))
}
