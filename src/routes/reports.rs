use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/approved", web::get().to(reports::approved_report))
        .route("/roster/annual", web::get().to(reports::annual_roster));
}
