use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-shift tallies over non-archived requests (`ot_shift_counts` view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShiftCounts {
    pub shift_id: Uuid,
    pub requested: i64,
    pub approved: i64,
    pub declined: i64,
    pub cancelled: i64,
}

impl ShiftCounts {
    pub fn empty(shift_id: Uuid) -> Self {
        Self {
            shift_id,
            requested: 0,
            approved: 0,
            declined: 0,
            cancelled: 0,
        }
    }

    /// Approvals beyond capacity are allowed and only flagged.
    pub fn is_over_approved(&self, capacity: i32) -> bool {
        self.approved > i64::from(capacity)
    }
}
