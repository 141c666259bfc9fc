use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RosterType {
        Day => "day",
        Night => "night",
        Rest => "rest",
    }
}

/// One entry of a team's 28-day pattern (`team_roster_pattern`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RosterDay {
    pub team: String,
    pub day_index: i16,
    pub roster_type: RosterType,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}
