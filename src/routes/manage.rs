use actix_web::web;

use crate::handlers::manage;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/manage/shifts")
            .route("", web::get().to(manage::list_shifts))
            .route("/{id}/capacity", web::put().to(manage::update_capacity))
            .route("/{id}", web::delete().to(manage::delete_shift)),
    );
}
