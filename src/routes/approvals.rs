use actix_web::web;

use crate::handlers::approvals;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/approvals", web::get().to(approvals::get_approvals));
}
