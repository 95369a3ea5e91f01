// API 类型定义模块
// 数据 API 返回的 JSON 结构

use serde::Serialize;

/// Kind of a recognized data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// `done_processed_<CC>_data.csv`
    Csv,
    /// `done_processed_<CC>_data_stats.txt`
    Stats,
}

/// One entry of `GET /api/files`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub country_code: String,
    pub file_name: String,
    pub file_type: FileType,
    pub file_path: String,
    /// Size in KB, one decimal
    pub size: f64,
    /// Data rows; serialized as `null` for stats files and unreadable CSVs
    pub records: Option<u64>,
}

/// Body of `GET /api/file-content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub content: String,
    pub filename: String,
}
