use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::context::{HandlerResult, bad_request, require_actor, storage_failure};
use crate::utils::validate_magic_bytes;

fn upload_failed(message: &str, err: impl std::fmt::Display) -> HttpResponse {
    error!("{}", LmsError::file_operation(format!("{message}: {err}")));
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

/// 从文件名中取出小写扩展名（包含点号）
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub async fn handle_upload(
    service: &FileService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> HandlerResult {
    let actor = require_actor(request)?;
    let storage = service.get_storage(request)?;

    let config = &AppConfig::get().upload;
    let upload_dir = &config.dir;

    if !Path::new(upload_dir).exists() {
        fs::create_dir_all(upload_dir).map_err(|e| upload_failed("创建上传目录失败", e))?;
    }

    let mut original_name = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;
    let mut file_type = String::new();
    let mut stored_name = String::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if file_uploaded {
            return Err(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "一次只能上传一个文件",
            ));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = extension_of(&original_name);
        if !config
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
        {
            return Err(bad_request(ErrorCode::FileTypeNotAllowed, "不支持的文件类型"));
        }

        // MIME 类型只做记录，不参与校验
        file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let file_path = Path::new(upload_dir).join(&stored_name);
        let mut f = File::create(&file_path).map_err(|e| upload_failed("文件创建失败", e))?;

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&file_path);
                    return Err(bad_request(ErrorCode::FileUploadFailed, format!("读取上传内容失败: {e}")));
                }
            };

            // 第一个分块校验魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Err(bad_request(ErrorCode::FileTypeNotAllowed, "文件内容与扩展名不匹配"));
                }
            }

            total_size += data.len();
            if total_size > config.max_size {
                let _ = fs::remove_file(&file_path);
                return Err(bad_request(ErrorCode::FileSizeExceeded, "文件大小超出限制"));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                return Err(upload_failed("文件写入失败", e));
            }
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Err(bad_request(ErrorCode::FileNotFound, "请求中没有文件"));
    }

    let download_token = Uuid::new_v4().simple().to_string();
    let file = storage
        .upload_file(
            &download_token,
            &original_name,
            &stored_name,
            file_size,
            &file_type,
            actor.id,
        )
        .await
        .map_err(storage_failure("保存文件记录失败"))?;

    info!("User {} uploaded {} ({} bytes)", actor.id, file.original_name, file.file_size);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        FileUploadResponse {
            download_token: file.download_token,
            file_name: file.original_name,
            size: file.file_size,
            content_type: file.file_type,
            uploaded_at: file.uploaded_at,
        },
        "文件上传成功",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased_with_dot() {
        assert_eq!(extension_of("Report.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
    }
}
