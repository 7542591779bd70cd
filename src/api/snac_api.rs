// ==========================================
// SNAC 数据上传工具 - SNAC API Trait
// ==========================================
// 职责: 核心流程依赖的远端接口（不含传输细节）
// 请求体: 单个 JSON 对象，command 字段选择行为
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::types::{EntityKind, TermType};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

// ==========================================
// 命令名
// ==========================================
pub mod commands {
    pub const VOCABULARY: &str = "vocabulary";
    pub const ELASTIC: &str = "elastic";
    pub const READ_RESOURCE: &str = "read_resource";
    pub const EDIT: &str = "edit";
    pub const INSERT_AND_PUBLISH_CONSTELLATION: &str = "insert_and_publish_constellation";
    pub const INSERT_RESOURCE: &str = "insert_resource";
    pub const UPDATE_RESOURCE: &str = "update_resource";
}

// ==========================================
// SnacApi Trait
// ==========================================
// 用途: 词表查询、存在性校验、变更提交
// 实现者: HttpSnacClient（测试中为 mock）
#[async_trait]
pub trait SnacApi: Send + Sync {
    /// 词表查询
    ///
    /// # 返回
    /// - Ok(String): 原始响应文本
    /// - Err: 传输失败
    async fn lookup_vocabulary(&self, term_type: TermType, query: &str) -> ApiResult<String>;

    /// 远端实体存在性查询
    async fn check_existence(&self, kind: EntityKind, id: i64) -> ApiResult<String>;

    /// 提交命令（payload 为附加字段，command/apikey 由实现补充）
    async fn submit(&self, command: &str, payload: Value) -> ApiResult<String>;
}

// ==========================================
// 请求体构造
// ==========================================

/// 词表查询请求
pub fn vocabulary_request(term_type: TermType, query: &str) -> Value {
    json!({
        "command": commands::VOCABULARY,
        "query_string": query,
        "type": term_type.as_str(),
    })
}

/// 存在性查询请求
pub fn existence_request(kind: EntityKind, id: i64) -> Value {
    match kind {
        EntityKind::Constellation => json!({
            "command": commands::ELASTIC,
            "query": { "ids": { "values": [id] } },
            "size": 0,
        }),
        EntityKind::Resource => json!({
            "command": commands::READ_RESOURCE,
            "resourceid": id,
        }),
    }
}

/// 提交请求: payload 字段 + command + apikey
pub fn submit_request(command: &str, payload: Value, api_key: &str) -> Value {
    let mut body = match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };

    body.insert("command".to_string(), Value::String(command.to_string()));
    body.insert("apikey".to_string(), Value::String(api_key.to_string()));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_request() {
        let req = vocabulary_request(TermType::DocumentType, "ArchivalResource");
        assert_eq!(req["command"], "vocabulary");
        assert_eq!(req["query_string"], "ArchivalResource");
        assert_eq!(req["type"], "document_type");
    }

    #[test]
    fn test_existence_requests() {
        let req = existence_request(EntityKind::Constellation, 4);
        assert_eq!(req["command"], "elastic");
        assert_eq!(req["query"]["ids"]["values"][0], 4);
        assert_eq!(req["size"], 0);

        let req = existence_request(EntityKind::Resource, 9);
        assert_eq!(req["command"], "read_resource");
        assert_eq!(req["resourceid"], 9);
    }

    #[test]
    fn test_submit_request_adds_command_and_key() {
        let req = submit_request("edit", json!({"constellationid": 12}), "k");
        assert_eq!(req["command"], "edit");
        assert_eq!(req["apikey"], "k");
        assert_eq!(req["constellationid"], 12);
    }
}
