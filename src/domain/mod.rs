//! Pure overtime rules: request lifecycle, slot accounting, roster
//! arithmetic, planning and reporting. Nothing here touches the store.

pub mod counts;
pub mod lifecycle;
pub mod names;
pub mod planner;
pub mod report;
pub mod roster;
pub mod roster_print;

use thiserror::Error;

use crate::database::models::RequestStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Cannot {action} a request that is {from}")]
    InvalidTransition {
        action: &'static str,
        from: RequestStatus,
    },

    #[error("Cancelling an approved request frees its slot for someone else; resend with confirm=true")]
    ConfirmationRequired,

    #[error("Requests can only be hidden after the shift date has passed")]
    NotYetArchivable,

    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
