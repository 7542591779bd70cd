// ==========================================
// SNAC 数据上传工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 表格读取 / 写出错误
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("表格文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的表格格式: [{0}]（可用 .csv / .xlsx / .xls）")]
    UnsupportedFormat(String),

    #[error("表格读取失败: {0}")]
    FileReadError(String),

    #[error("结果表写出失败: {0}")]
    FileWriteError(String),

    #[error("Excel 工作簿无法解析: {0}")]
    ExcelParseError(String),

    #[error("CSV 无法解析: {0}")]
    CsvParseError(String),

    #[error("表格缺少表头行: {0}")]
    MissingHeader(String),

    #[error("结果列 [{column}] 有 {actual} 个值，表格有 {expected} 行")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
