use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::CancelRequestInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AvailableShiftsQuery {
    #[serde(default = "default_true")]
    pub rest_only: bool,
}

pub async fn get_shifts(
    state: web::Data<AppState>,
    query: web::Query<AvailableShiftsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let shifts = state
        .service
        .available_shifts(&ctx, query.rest_only, Utc::now().date_naive())
        .await?;

    Ok(ApiResponse::ok(shifts))
}

pub async fn request_shift(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let view = state
        .service
        .request_shift(&ctx, path.into_inner(), Utc::now())
        .await?;

    Ok(ApiResponse::ok(view))
}

/// The body is optional; an empty body means `confirm = false`.
pub async fn cancel_request(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: Option<web::Json<CancelRequestInput>>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;
    let confirm = input.map(|i| i.confirm).unwrap_or(false);

    let view = state
        .service
        .cancel_request(&ctx, path.into_inner(), confirm)
        .await?;

    Ok(ApiResponse::ok(view))
}
