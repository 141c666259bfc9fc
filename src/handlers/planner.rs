use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::domain::planner::PlanRequest;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn preview(
    state: web::Data<AppState>,
    input: web::Json<PlanRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let items = state.service.preview_plan(&ctx, &input)?;

    Ok(ApiResponse::ok(items))
}

pub async fn publish(
    state: web::Data<AppState>,
    input: web::Json<PlanRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let shifts = state.service.publish_plan(&ctx, &input).await?;

    Ok(ApiResponse::created(shifts))
}
