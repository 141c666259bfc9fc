use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ShiftType {
        Day => "day",
        Night => "night",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ShiftStatus {
        Active => "active",
        Deleted => "deleted",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: Uuid,
    pub shift_date: NaiveDate,
    pub shift_type: ShiftType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub department: String,
    pub spots_available: i32,
    pub shift_status: ShiftStatus,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Shift {
    pub fn is_active(&self) -> bool {
        self.shift_status == ShiftStatus::Active
    }

    /// Night shifts finish on the following calendar day.
    pub fn ends_next_day(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// A shift as published by the planner; upserted on `(shift_date, shift_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftInput {
    pub shift_date: NaiveDate,
    pub shift_type: ShiftType,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub department: String,
    pub spots_available: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityUpdate {
    pub spots_available: i32,
}
