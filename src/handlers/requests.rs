use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct MyRequestsQuery {
    #[serde(default)]
    pub approved_only: bool,
}

pub async fn my_requests(
    state: web::Data<AppState>,
    query: web::Query<MyRequestsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let requests = state
        .service
        .my_requests(&ctx, query.approved_only, Utc::now().date_naive())
        .await?;

    Ok(ApiResponse::ok(requests))
}

pub async fn archive_request(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let request = state
        .service
        .archive_request(&ctx, path.into_inner(), Utc::now().date_naive())
        .await?;

    Ok(ApiResponse::ok(request))
}

pub async fn hide_closed(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let archived = state.service.hide_closed(&ctx).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(serde_json::json!({ "archived": archived })),
        "Closed requests hidden",
    )))
}
