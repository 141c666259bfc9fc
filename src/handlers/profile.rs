use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{ProfileUpdate, Role, RoleUpdate, StaffingInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn get_profile(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    Ok(ApiResponse::ok(state.service.profile(&ctx)))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    input: web::Json<ProfileUpdate>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let profile = state.service.update_profile(&ctx, &input).await?;

    Ok(ApiResponse::ok(profile))
}

pub async fn update_own_staffing(
    state: web::Data<AppState>,
    input: web::Json<StaffingInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let staffing = state.service.update_own_staffing(&ctx, &input).await?;

    Ok(ApiResponse::ok(staffing))
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub role: Option<Role>,
}

pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UsersQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let users = state.service.list_users(&ctx, query.role).await?;

    Ok(ApiResponse::ok(users))
}

pub async fn set_user_role(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<RoleUpdate>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let profile = state
        .service
        .set_role(&ctx, path.into_inner(), input.role)
        .await?;

    Ok(ApiResponse::ok(profile))
}

pub async fn set_user_staffing(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<StaffingInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let staffing = state
        .service
        .set_user_staffing(&ctx, path.into_inner(), &input)
        .await?;

    Ok(ApiResponse::ok(staffing))
}
