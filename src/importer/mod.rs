// ==========================================
// SNAC 数据上传工具 - 导入层
// ==========================================
// 职责: 读取表格文件，按键列分组为记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod table;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::UniversalFileParser;
pub use table::{Record, Table};
