use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::database::models::{ShiftInput, ShiftType};

/// Longest range a single publish may cover.
pub const MAX_PLAN_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub department: String,
    pub day_slots: i32,
    pub night_slots: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

pub fn validate_capacity(spots: i32) -> Result<(), DomainError> {
    if spots < 0 {
        return Err(DomainError::validation("Slots must be 0 or greater."));
    }
    Ok(())
}

/// Two shifts per date: day 06:00-15:00 (16:00 on Sundays) and night
/// 19:00-06:00 finishing the next morning.
pub fn plan_shifts(request: &PlanRequest) -> Result<Vec<ShiftInput>, DomainError> {
    if request.start > request.end {
        return Err(DomainError::validation(
            "End date must be on or after start date.",
        ));
    }
    let days = request.end.signed_duration_since(request.start).num_days() + 1;
    if days > MAX_PLAN_DAYS {
        return Err(DomainError::validation(format!(
            "A plan may cover at most {MAX_PLAN_DAYS} days."
        )));
    }
    validate_capacity(request.day_slots)?;
    validate_capacity(request.night_slots)?;

    let department = request.department.trim();
    if department.is_empty() {
        return Err(DomainError::validation("Department is required."));
    }
    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let mut items = Vec::new();
    for date in request.start.iter_days().take_while(|d| *d <= request.end) {
        let day_end = if date.weekday() == Weekday::Sun { 16 } else { 15 };

        items.push(ShiftInput {
            shift_date: date,
            shift_type: ShiftType::Day,
            start_time: at(6),
            end_time: at(day_end),
            department: department.to_string(),
            spots_available: request.day_slots,
            notes: notes.clone(),
        });
        items.push(ShiftInput {
            shift_date: date,
            shift_type: ShiftType::Night,
            start_time: at(19),
            end_time: at(6),
            department: department.to_string(),
            spots_available: request.night_slots,
            notes: notes.clone(),
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan(start: (i32, u32, u32), end: (i32, u32, u32)) -> PlanRequest {
        PlanRequest {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            department: " Depot ".to_string(),
            day_slots: 4,
            night_slots: 3,
            notes: None,
        }
    }

    #[test]
    fn builds_day_and_night_for_each_date() {
        // 2026-03-07 is a Saturday, 2026-03-08 a Sunday.
        let items = plan_shifts(&plan((2026, 3, 7), (2026, 3, 8))).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].shift_type, ShiftType::Day);
        assert_eq!(items[0].end_time, at(15));
        assert_eq!(items[0].department, "Depot");
        assert_eq!(items[1].shift_type, ShiftType::Night);
        assert_eq!(items[1].start_time, at(19));
        assert_eq!(items[1].end_time, at(6));
        assert_eq!(items[1].spots_available, 3);
        assert_eq!(items[2].end_time, at(16));
    }

    #[test]
    fn plan_spans_year_end() {
        let items = plan_shifts(&plan((2026, 12, 30), (2027, 1, 2))).unwrap();
        assert_eq!(items.len(), 8);
        assert_eq!(items[7].shift_date, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(plan_shifts(&plan((2026, 3, 8), (2026, 3, 7))).is_err());
        assert!(plan_shifts(&plan((2026, 1, 1), (2027, 6, 1))).is_err());

        let mut negative = plan((2026, 3, 7), (2026, 3, 7));
        negative.night_slots = -1;
        assert_eq!(
            plan_shifts(&negative),
            Err(DomainError::validation("Slots must be 0 or greater."))
        );

        let mut blank = plan((2026, 3, 7), (2026, 3, 7));
        blank.department = "  ".to_string();
        assert!(plan_shifts(&blank).is_err());
    }
}
