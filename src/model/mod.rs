// ==========================================
// SNAC 数据上传工具 - 字段模型层
// ==========================================
// 职责: 各 schema 类型的字段声明（静态字段表 + 只读注册表）
// 红线: 构建后只读，可跨并发构建共享
// ==========================================

pub mod constellation_model;
pub mod error;
pub mod field;
pub mod relation_model;
pub mod resource_model;
pub mod schema;
pub mod snac_model;

// 重导出核心类型
pub use constellation_model::{ConstellationField, ConstellationModel};
pub use error::{SchemaError, SchemaResult};
pub use field::{
    FieldOccurrence, FieldRelation, FieldRequirement, FieldSpec, FieldVocabulary, ModelField,
    ModelFieldType,
};
pub use relation_model::{RelationField, RelationModel};
pub use resource_model::{ResourceField, ResourceModel};
pub use schema::{FieldRename, SnacSchema};
pub use snac_model::SnacModel;
