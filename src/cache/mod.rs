// ==========================================
// SNAC 数据上传工具 - 缓存层
// ==========================================

pub mod lookup_cache;

pub use lookup_cache::{LookupCache, TermSource};
