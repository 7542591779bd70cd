// ==========================================
// SNAC 数据上传工具 - API 层
// ==========================================
// 职责: SNAC 远端接口（trait + HTTP 实现 + 响应解析）
// ==========================================

pub mod error;
pub mod http_client;
pub mod response;
pub mod snac_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use http_client::HttpSnacClient;
pub use response::{ResultKind, SnacResponse};
pub use snac_api::{commands, SnacApi};
