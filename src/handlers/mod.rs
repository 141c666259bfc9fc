pub mod approvals;
pub mod audit;
pub mod manage;
pub mod planner;
pub mod profile;
pub mod reports;
pub mod requests;
pub mod shared;
pub mod shifts;
