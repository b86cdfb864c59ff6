//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::BiolinkerError;
use crate::services::{Notice, Operation};

use super::error_code::ErrorCode;
use super::types::{ApiResponse, NoticeOnly};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// BiolinkerError → 响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_biolinker(err: &BiolinkerError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 仪表盘操作失败：附带面向用户的 notice，message 即 notice 描述
pub fn notice_error_response(op: Operation, err: &BiolinkerError) -> HttpResponse {
    let notice = Notice::failure(op, err);
    json_response(
        err.http_status(),
        ErrorCode::for_dashboard(err),
        notice.description.clone(),
        Some(NoticeOnly { notice }),
    )
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<BiolinkerError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_biolinker(&e.into()),
    }
}

/// 附件下载响应
pub fn attachment_response(
    content_type: &str,
    filename: &str,
    body: impl actix_web::body::MessageBody + 'static,
) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", content_type))
        .append_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}
