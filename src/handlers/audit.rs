use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn get_audit_log(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let entries = state.service.audit_log(&ctx).await?;

    Ok(ApiResponse::ok(entries))
}
