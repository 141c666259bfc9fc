pub mod audit;
pub mod ot_request;
pub mod profile;
pub mod roster;
pub mod shift;

// Re-export all repositories for easy importing
pub use audit::AuditRepository;
pub use ot_request::OtRequestRepository;
pub use profile::ProfileRepository;
pub use roster::RosterRepository;
pub use shift::ShiftRepository;
