// ==========================================
// SNAC 数据上传工具 - 上传结果台账仓储
// ==========================================
// 职责: 记录每个批次每条记录的上传/校验结果
// 红线: 仓储不含业务逻辑，只做数据映射
// ==========================================

mod core;
mod queries;


pub use core::{BatchSummary, OutcomeRepository};
