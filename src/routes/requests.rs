use actix_web::web;

use crate::handlers::{approvals, requests};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/requests")
            .route("/my", web::get().to(requests::my_requests))
            .route("/hide-closed", web::post().to(requests::hide_closed))
            .route("/{id}/archive", web::post().to(requests::archive_request))
            .route("/{id}/decide", web::post().to(approvals::decide_request)),
    );
}
