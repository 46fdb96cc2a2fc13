pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::context::respond;

define_service!(FileService);

impl FileService {
    // 上传文件（头像、徽章图标、作业附件）
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        respond(upload::handle_upload(self, request, payload).await)
    }

    // 按下载令牌获取文件
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        respond(download::handle_download(self, request, file_token).await)
    }
}
