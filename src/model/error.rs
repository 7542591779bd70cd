// ==========================================
// SNAC 数据上传工具 - Schema 错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// Schema 加载/迁移错误
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("unrecognized SNAC schema type: [{0}]")]
    UnrecognizedSchemaType(String),

    #[error("unrecognized SNAC model field: [{field}] (column {column})")]
    UnrecognizedField { column: String, field: String },

    #[error("schema file read failed: {0}")]
    FileReadError(String),

    #[error("schema JSON invalid: {0}")]
    InvalidJson(String),
}

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::FileReadError(err.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::InvalidJson(err.to_string())
    }
}

/// Result 类型别名
pub type SchemaResult<T> = Result<T, SchemaError>;
