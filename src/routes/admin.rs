use actix_web::web;

use crate::handlers::{audit, profile};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/audit", web::get().to(audit::get_audit_log))
        .service(
            web::scope("/users")
                .route("", web::get().to(profile::list_users))
                .route("/{id}/role", web::put().to(profile::set_user_role))
                .route("/{id}/staffing", web::put().to(profile::set_user_staffing)),
        );
}
