use actix_web::{
    HttpRequest, HttpResponse,
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::AppState;
use crate::error::AppError;
use crate::services::overtime::Download;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub year: Option<i32>,
}

fn download_response(download: Download, content_type: &str, disposition: DispositionType) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            ContentDisposition {
                disposition,
                parameters: vec![DispositionParam::Filename(download.filename)],
            },
        ))
        .body(download.content)
}

pub async fn approved_report(
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;

    let download = state
        .service
        .approved_report(&ctx, query.start, query.end)
        .await?;

    Ok(download_response(
        download,
        "text/csv; charset=utf-8",
        DispositionType::Attachment,
    ))
}

pub async fn annual_roster(
    state: web::Data<AppState>,
    query: web::Query<RosterQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = state.user_context.extract_context(&req).await?;
    let today = Utc::now().date_naive();

    let download = state
        .service
        .annual_roster(&ctx, query.year.unwrap_or(today.year()), today)
        .await?;

    Ok(download_response(
        download,
        "text/html; charset=utf-8",
        DispositionType::Inline,
    ))
}
