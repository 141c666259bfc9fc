use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::CapacityUpdate;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct ManageShiftsQuery {
    #[serde(default)]
    pub show_deleted: bool,
}

pub async fn list_shifts(
    state: web::Data<AppState>,
    query: web::Query<ManageShiftsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let shifts = state
        .service
        .managed_shifts(&ctx, query.show_deleted, Utc::now().date_naive())
        .await?;

    Ok(ApiResponse::ok(shifts))
}

pub async fn update_capacity(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<CapacityUpdate>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let shift = state
        .service
        .update_capacity(&ctx, path.into_inner(), input.spots_available)
        .await?;

    Ok(ApiResponse::ok(shift))
}

pub async fn delete_shift(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let deleted = state
        .service
        .delete_shift(&ctx, path.into_inner(), Utc::now())
        .await?;

    Ok(ApiResponse::ok(deleted))
}
