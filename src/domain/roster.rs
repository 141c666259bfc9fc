//! Team rotation arithmetic.
//!
//! Every team repeats a 28-day pattern anchored at a single global base
//! date. The roster type of any calendar date is found by reducing its
//! distance from the base date modulo the cycle length; dates before the
//! base date must still land in `0..28`.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::DomainError;
use crate::database::models::{RosterDay, RosterType, Shift};

pub const ROSTER_CYCLE_DAYS: i64 = 28;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Position of `date` within the rotation, always in `0..ROSTER_CYCLE_DAYS`.
pub fn day_index(date: NaiveDate, base_date: NaiveDate) -> usize {
    let delta = date.signed_duration_since(base_date).num_days();
    delta.rem_euclid(ROSTER_CYCLE_DAYS) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPattern {
    days: [RosterType; ROSTER_CYCLE_DAYS as usize],
}

impl RosterPattern {
    pub fn all_rest() -> Self {
        Self {
            days: [RosterType::Rest; ROSTER_CYCLE_DAYS as usize],
        }
    }

    /// Indices missing from `days` default to rest; out-of-range ones are dropped.
    pub fn from_days(days: &[RosterDay]) -> Self {
        let mut pattern = Self::all_rest();
        for day in days {
            match usize::try_from(day.day_index) {
                Ok(index) if index < pattern.days.len() => pattern.days[index] = day.roster_type,
                _ => log::warn!(
                    "Ignoring roster entry for {} with day_index {}",
                    day.team,
                    day.day_index
                ),
            }
        }
        pattern
    }

    pub fn type_at(&self, index: usize) -> RosterType {
        self.days
            .get(index % self.days.len())
            .copied()
            .unwrap_or(RosterType::Rest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterCalendar {
    base_date: NaiveDate,
    pattern: RosterPattern,
}

impl RosterCalendar {
    pub fn new(base_date: NaiveDate, pattern: RosterPattern) -> Self {
        Self { base_date, pattern }
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn day_index(&self, date: NaiveDate) -> usize {
        day_index(date, self.base_date)
    }

    pub fn type_on(&self, date: NaiveDate) -> RosterType {
        self.pattern.type_at(self.day_index(date))
    }

    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.type_on(date) == RosterType::Rest
    }
}

/// Default shift visibility: with `rest_only` on and a calendar known for the
/// viewer, keep only shifts that fall on the viewer's rest days.
pub fn visible_shifts(shifts: Vec<Shift>, calendar: Option<&RosterCalendar>, rest_only: bool) -> Vec<Shift> {
    match calendar {
        Some(calendar) if rest_only => shifts
            .into_iter()
            .filter(|shift| calendar.is_rest_day(shift.shift_date))
            .collect(),
        _ => shifts,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterCell {
    pub date: NaiveDate,
    pub day: u32,
    pub roster_type: RosterType,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterMonth {
    pub month: u32,
    pub name: &'static str,
    /// Empty cells before the 1st in a Sunday-first week grid.
    pub leading_blanks: u32,
    pub days: Vec<RosterCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualRoster {
    pub year: i32,
    pub team: String,
    pub months: Vec<RosterMonth>,
}

impl AnnualRoster {
    pub fn build(
        year: i32,
        team: &str,
        calendar: &RosterCalendar,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let mut months = Vec::with_capacity(MONTH_NAMES.len());

        for (month, name) in (1u32..).zip(MONTH_NAMES) {
            let first = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| DomainError::validation(format!("Year {year} is out of range")))?;

            let days = first
                .iter_days()
                .take_while(|date| date.month() == month)
                .map(|date| RosterCell {
                    date,
                    day: date.day(),
                    roster_type: calendar.type_on(date),
                    is_today: date == today,
                })
                .collect();

            months.push(RosterMonth {
                month,
                name,
                leading_blanks: first.weekday().num_days_from_sunday(),
                days,
            });
        }

        Ok(Self {
            year,
            team: team.to_string(),
            months,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ShiftStatus, ShiftType};
    use chrono::{Duration, NaiveTime, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day_index: i16, roster_type: RosterType) -> RosterDay {
        RosterDay {
            team: "Team1".to_string(),
            day_index,
            roster_type,
            start_time: None,
            end_time: None,
        }
    }

    fn shift_on(shift_date: NaiveDate) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            shift_date,
            shift_type: ShiftType::Day,
            start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            department: "Depot".to_string(),
            spots_available: 2,
            shift_status: ShiftStatus::Active,
            notes: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn base_date_is_index_zero() {
        let base = date(2026, 2, 2);
        assert_eq!(day_index(base, base), 0);
        assert_eq!(day_index(date(2026, 3, 1), base), 27);
        assert_eq!(day_index(date(2026, 3, 2), base), 0);
    }

    #[test]
    fn dates_before_base_wrap_to_non_negative_index() {
        let base = date(2026, 2, 2);
        assert_eq!(day_index(date(2026, 2, 1), base), 27);
        assert_eq!(day_index(date(2026, 1, 5), base), 0);
        assert_eq!(day_index(date(2025, 12, 31), base), 23);
    }

    #[test]
    fn index_stays_in_cycle_over_a_wide_range() {
        let base = date(2026, 2, 2);
        let mut current = base - Duration::days(800);
        while current <= base + Duration::days(800) {
            let index = day_index(current, base);
            assert!(index < ROSTER_CYCLE_DAYS as usize, "{current} -> {index}");
            current += Duration::days(1);
        }
    }

    #[test]
    fn pattern_defaults_missing_and_ignores_bad_indices() {
        let pattern = RosterPattern::from_days(&[
            entry(0, RosterType::Day),
            entry(1, RosterType::Night),
            entry(28, RosterType::Day),
            entry(-1, RosterType::Night),
        ]);

        assert_eq!(pattern.type_at(0), RosterType::Day);
        assert_eq!(pattern.type_at(1), RosterType::Night);
        assert_eq!(pattern.type_at(2), RosterType::Rest);
        assert_eq!(pattern.type_at(27), RosterType::Rest);
    }

    #[test]
    fn rest_only_filter_keeps_rest_day_shifts() {
        let base = date(2026, 2, 2);
        let pattern = RosterPattern::from_days(&[
            entry(0, RosterType::Rest),
            entry(1, RosterType::Day),
            entry(2, RosterType::Night),
        ]);
        let calendar = RosterCalendar::new(base, pattern);
        let shifts = vec![
            shift_on(date(2026, 2, 2)),
            shift_on(date(2026, 2, 3)),
            shift_on(date(2026, 2, 4)),
            shift_on(date(2026, 2, 5)),
        ];

        let visible = visible_shifts(shifts.clone(), Some(&calendar), true);
        let dates: Vec<NaiveDate> = visible.iter().map(|s| s.shift_date).collect();
        assert_eq!(dates, vec![date(2026, 2, 2), date(2026, 2, 5)]);

        assert_eq!(visible_shifts(shifts.clone(), Some(&calendar), false).len(), 4);
        assert_eq!(visible_shifts(shifts, None, true).len(), 4);
    }

    #[test]
    fn annual_roster_covers_every_day_of_a_leap_year() {
        let calendar = RosterCalendar::new(date(2026, 2, 2), RosterPattern::all_rest());
        let roster = AnnualRoster::build(2028, "Team2", &calendar, date(2028, 2, 29)).unwrap();

        assert_eq!(roster.months.len(), 12);
        assert_eq!(roster.months[1].days.len(), 29);
        let total: usize = roster.months.iter().map(|m| m.days.len()).sum();
        assert_eq!(total, 366);
        assert!(roster.months[1].days[28].is_today);
        // 1 January 2028 is a Saturday.
        assert_eq!(roster.months[0].leading_blanks, 6);
        assert_eq!(roster.months[0].name, "January");
    }

    #[test]
    fn annual_roster_follows_the_pattern_across_year_boundary() {
        let base = date(2026, 2, 2);
        let calendar = RosterCalendar::new(base, RosterPattern::from_days(&[entry(0, RosterType::Night)]));
        let roster = AnnualRoster::build(2025, "Team1", &calendar, date(2025, 6, 1)).unwrap();

        // 2025-12-08 is 56 days before the base date.
        let cell = &roster.months[11].days[7];
        assert_eq!(cell.date, date(2025, 12, 8));
        assert_eq!(cell.roster_type, RosterType::Night);
    }
}
