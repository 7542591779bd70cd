// ==========================================
// SNAC 数据上传工具 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 范围: 上传结果台账（SQLite）
// ==========================================

use thiserror::Error;

/// 台账访问错误
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("台账数据库打开失败: {0}")]
    DatabaseConnectionError(String),

    #[error("台账连接锁获取失败: {0}")]
    LockError(String),

    #[error("台账事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("台账查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("台账记录格式错误 (列 {column}): {message}")]
    CorruptRow { column: usize, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                RepositoryError::CorruptRow {
                    column,
                    message: source.to_string(),
                }
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_failure_maps_to_corrupt_row() {
        let source = "bad timestamp".parse::<i64>().unwrap_err();
        let err = rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(source),
        );

        match RepositoryError::from(err) {
            RepositoryError::CorruptRow { column, .. } => assert_eq!(column, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
