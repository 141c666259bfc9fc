pub mod audit_logger;
pub mod auth;
pub mod overtime;
pub mod user_context;

pub use audit_logger::AuditLogger;
pub use auth::Claims;
pub use overtime::OvertimeService;
pub use user_context::{UserContext, UserContextService};
