use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::DecisionInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn get_approvals(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let board = state
        .service
        .approval_board(&ctx, Utc::now().date_naive())
        .await?;

    Ok(ApiResponse::ok(board))
}

pub async fn decide_request(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<DecisionInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let outcome = state
        .service
        .decide(&ctx, path.into_inner(), input.decision, Utc::now())
        .await?;

    Ok(ApiResponse::ok(outcome))
}
