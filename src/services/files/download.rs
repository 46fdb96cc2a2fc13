use actix_web::{HttpRequest, HttpResponse, http::header};
use std::path::Path;
use tracing::error;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{HandlerResult, not_found, storage_failure};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> HandlerResult {
    let storage = service.get_storage(request)?;

    let db_file = storage
        .get_file_by_token(&file_token)
        .await
        .map_err(storage_failure("查询文件失败"))?
        .ok_or_else(|| not_found(ErrorCode::FileNotFound, "文件不存在"))?;

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&db_file.stored_name);
    if !file_path.exists() {
        return Err(not_found(ErrorCode::FileNotFound, "文件不存在"));
    }

    let buf = std::fs::read(&file_path).map_err(|e| {
        error!("{}", LmsError::file_operation(format!("读取文件失败: {e}")));
        HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::InternalServerError, "读取文件失败"))
    })?;

    // 使用上传时的原始文件名
    let file_name = db_file.original_name.replace(['"', '\\'], "_");
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(buf))
}
