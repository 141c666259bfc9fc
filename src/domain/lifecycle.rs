//! Request lifecycle: `none -> requested -> {approved, declined} -> cancelled`,
//! with `cancelled`/`declined` revivable back to `requested` on the same record.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::DomainError;
use crate::database::models::{Decision, OtRequest, RequestStatus};

/// What a request call does to the ledger row for a (shift, employee) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Create,
    Revive,
    Keep,
}

pub fn on_request(current: Option<RequestStatus>) -> RequestAction {
    match current {
        None => RequestAction::Create,
        Some(RequestStatus::Requested | RequestStatus::Approved) => RequestAction::Keep,
        Some(RequestStatus::Declined | RequestStatus::Cancelled) => RequestAction::Revive,
    }
}

pub fn can_cancel(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Requested | RequestStatus::Approved)
}

pub fn on_cancel(current: RequestStatus, confirmed: bool) -> Result<RequestStatus, DomainError> {
    match current {
        RequestStatus::Requested => Ok(RequestStatus::Cancelled),
        RequestStatus::Approved if confirmed => Ok(RequestStatus::Cancelled),
        RequestStatus::Approved => Err(DomainError::ConfirmationRequired),
        from => Err(DomainError::InvalidTransition {
            action: "cancel",
            from,
        }),
    }
}

/// Capacity is deliberately not consulted here.
pub fn on_decide(current: RequestStatus, decision: Decision) -> Result<RequestStatus, DomainError> {
    match current {
        RequestStatus::Cancelled => Err(DomainError::InvalidTransition {
            action: "decide",
            from: current,
        }),
        _ => Ok(decision.into()),
    }
}

pub fn check_archivable(shift_date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if shift_date < today {
        Ok(())
    } else {
        Err(DomainError::NotYetArchivable)
    }
}

impl OtRequest {
    pub fn requested(shift_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            shift_id,
            user_id,
            status: RequestStatus::Requested,
            requested_at: at,
            decided_at: None,
            decided_by: None,
            archived: false,
            notes: None,
        }
    }

    pub fn revive(&mut self, at: DateTime<Utc>) {
        self.status = RequestStatus::Requested;
        self.requested_at = at;
        self.decided_at = None;
        self.decided_by = None;
        self.archived = false;
    }

    pub fn record_decision(&mut self, decision: Decision, decided_by: Uuid, at: DateTime<Utc>) {
        self.status = decision.into();
        self.decided_at = Some(at);
        self.decided_by = Some(decided_by);
    }
}
