// ==========================================
// SNAC 数据上传工具 - 引擎层
// ==========================================
// 职责: 记录评估（表格 → 条目）与批量校验/上传编排
// 红线: 引擎不拼 SQL，不直接发 HTTP
// ==========================================

pub mod schema_evaluator;
pub mod upload_orchestrator;

pub use schema_evaluator::SchemaEvaluator;
pub use upload_orchestrator::{
    BatchReport, CancellationFlag, ProgressCallback, UploadOrchestrator,
};
