use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::{OvertimeStore, models::NewAuditEntry};
use crate::services::user_context::UserContext;

/// Append-only audit trail. A failed write is logged and never fails the
/// action being audited.
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn OvertimeStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn OvertimeStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        ctx: &UserContext,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        mut details: Map<String, Value>,
    ) {
        if let Some(correlation_id) = &ctx.correlation_id {
            details.insert(
                "correlation_id".to_string(),
                Value::String(correlation_id.clone()),
            );
        }

        let entry = NewAuditEntry {
            actor_id: Some(ctx.user_id()),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            details: Value::Object(details),
        };

        if let Err(e) = self.store.append_audit(entry).await {
            log::warn!("Failed to write audit entry {} for {}: {}", action, entity_id, e);
        }
    }

    /// Helper function to create details from key-value pairs
    pub fn metadata(pairs: Vec<(&str, Value)>) -> Map<String, Value> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}
