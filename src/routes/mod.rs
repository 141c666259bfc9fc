use actix_web::web;

pub mod admin;
pub mod approvals;
pub mod manage;
pub mod planner;
pub mod profile;
pub mod reports;
pub mod requests;
pub mod shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(shifts::configure)
            .configure(requests::configure)
            .configure(approvals::configure)
            .configure(planner::configure)
            .configure(manage::configure)
            .configure(reports::configure)
            .configure(profile::configure)
            .configure(admin::configure),
    );
}
