// ==========================================
// SNAC 数据上传工具 - 核心库
// ==========================================
// 系统定位: 表格数据 → SNAC 记录（人物/机构/家族、档案资源、关系）
// 流程: 加载表格 → 按 schema 构建记录 → 预览 / 远端校验 → 上传 → 结果回写
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 字段模型与列映射 schema
pub mod model;

// 配置层 - 环境与运行参数
pub mod config;

// API 层 - SNAC 远端接口
pub mod api;

// 词表 / 存在性查询缓存
pub mod cache;

// 导入层 - CSV / Excel 表格
pub mod importer;

// 记录构建、预览、校验与上传
pub mod exporter;

// 引擎层 - 记录评估与批量编排
pub mod engine;

// 数据仓储层 - 上传结果台账
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{HttpSnacClient, SnacApi, SnacResponse};
pub use cache::{LookupCache, TermSource};
pub use config::{SnacEnvironment, UploaderConfig};
pub use domain::{Constellation, ModelType, Resource, Term, TermType, UploadOutcome};
pub use engine::{BatchReport, CancellationFlag, SchemaEvaluator, UploadOrchestrator};
pub use exporter::{SnacSession, UploadItem, ValidationErrors};
pub use importer::{Table, UniversalFileParser};
pub use model::SnacSchema;
pub use repository::OutcomeRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SNAC 数据上传工具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
