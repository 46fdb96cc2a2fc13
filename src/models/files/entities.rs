use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 已上传文件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    /// 下载令牌，同时作为主键
    pub download_token: String,
    pub original_name: String,
    /// 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
