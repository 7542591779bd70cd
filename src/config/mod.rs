// ==========================================
// SNAC 数据上传工具 - 配置层
// ==========================================
// 职责: SNAC 环境与运行选项
// 存储: JSON 配置文件 + 环境变量覆盖（只读）
// ==========================================

pub mod environment;
pub mod error;
pub mod uploader_config;

// 重导出核心类型
pub use environment::{SnacEnvironment, DEV_ENVIRONMENT_ID, PROD_ENVIRONMENT_ID};
pub use error::{ConfigError, ConfigResult};
pub use uploader_config::UploaderConfig;
