pub mod audit;
pub mod counts;
pub mod macros;
pub mod ot_request;
pub mod profile;
pub mod roster;
pub mod shift;

// Re-export all models for easy importing
pub use audit::*;
pub use counts::*;
pub use ot_request::*;
pub use profile::*;
pub use roster::*;
pub use shift::*;
