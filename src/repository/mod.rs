// ==========================================
// SNAC 数据上传工具 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod outcome_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use outcome_repo::{BatchSummary, OutcomeRepository};
