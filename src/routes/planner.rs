use actix_web::web;

use crate::handlers::planner;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/planner")
            .route("/preview", web::post().to(planner::preview))
            .route("/publish", web::post().to(planner::publish)),
    );
}
