use actix_web::web;

use crate::handlers::shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shifts")
            .route("", web::get().to(shifts::get_shifts))
            .route("/{id}/request", web::post().to(shifts::request_shift))
            .route("/{id}/cancel", web::post().to(shifts::cancel_request)),
    );
}
