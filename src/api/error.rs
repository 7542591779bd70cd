// ==========================================
// SNAC 数据上传工具 - API 层错误类型
// ==========================================
// 职责: 传输层错误（请求发送、超时、响应读取）
// 说明: 远端返回的业务错误不在此处，由 SnacResponse 表达
// ==========================================

use thiserror::Error;

/// API 传输层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("SNAC API 请求失败: {0}")]
    Transport(String),

    #[error("SNAC API 请求超时: {0}")]
    Timeout(String),

    #[error("SNAC API 客户端初始化失败: {0}")]
    ClientBuild(String),

    #[error("请求序列化失败: {0}")]
    Serialization(String),
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_builder() {
            ApiError::ClientBuild(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
