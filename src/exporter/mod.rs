// ==========================================
// SNAC 数据上传工具 - 记录构建层
// ==========================================
// 职责: 记录 → 领域实体（逐字 / 远端校验）、预览、校验与上传
// ==========================================

pub mod constellation_item;
pub mod field_validator;
pub mod preview;
pub mod relation_item;
pub mod resource_item;
pub mod upload_item;
pub mod validation_errors;

pub use constellation_item::ConstellationItem;
pub use field_validator::{FieldValidator, RelatedTerm};
pub use relation_item::RelationItem;
pub use resource_item::ResourceItem;
pub use upload_item::{BuiltItem, IdReference, IdRole, ItemInput, SnacSession, UploadItem};
pub use validation_errors::ValidationErrors;
