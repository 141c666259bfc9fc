use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: serde_json::Value,
}

#[allow(non_snake_case)]
pub mod EntityType {
    pub const SHIFT: &str = "shift";
    pub const OT_REQUEST: &str = "ot_request";
    pub const PROFILE: &str = "profile";
}

#[allow(non_snake_case)]
pub mod Action {
    pub const SHIFT_PUBLISHED: &str = "shift_published";
    pub const CAPACITY_CHANGED: &str = "capacity_changed";
    pub const SHIFT_DELETED: &str = "shift_deleted";
    pub const OT_REQUESTED: &str = "ot_requested";
    pub const OT_CANCELLED: &str = "ot_cancelled";
    pub const OT_APPROVED: &str = "ot_approved";
    pub const OT_DECLINED: &str = "ot_declined";
    pub const ROLE_CHANGED: &str = "role_changed";
    pub const STAFFING_CHANGED: &str = "staffing_changed";
}
