// ==========================================
// SNAC 数据上传工具 - 领域模型层
// ==========================================
// 职责: 定义领域实体、词项、类型
// 红线: 不含远端访问逻辑，不含校验逻辑
// ==========================================

pub mod constellation;
pub mod outcome;
pub mod resource;
pub mod term;
pub mod types;

// 重导出核心类型
pub use constellation::{
    BiogHist, Constellation, ConstellationRelation, Language, NameEntry, Place, ResourceRelation,
    SameAs, SnacDate, Source, TermEntry, PREFERRED_NAME_SCORE, VARIANT_NAME_SCORE,
};
pub use outcome::{OutcomeRecord, UploadOutcome};
pub use resource::Resource;
pub use term::Term;
pub use types::{EntityKind, ModelType, Operation, TermType};
