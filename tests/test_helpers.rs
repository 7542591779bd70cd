// ==========================================
// 测试辅助函数
// ==========================================
// 职责: mock SNAC 接口、表格/会话构造、临时文件
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use snac_uploader::api::{commands, ApiError, ApiResult, SnacApi};
use snac_uploader::config::SnacEnvironment;
use snac_uploader::domain::{EntityKind, ModelType, TermType};
use snac_uploader::exporter::{ItemInput, SnacSession};
use snac_uploader::importer::{Record, Table};
use snac_uploader::model::SnacSchema;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

// ==========================================
// MockSnacApi - 计数的 SNAC 接口替身
// ==========================================
// 词表: 除 unknown_terms 外，任何查询都原样返回一个词项
// 存在性: 除 missing_* 外均存在
// 提交: 记录 (command, payload)，按命令返回成功响应
#[derive(Default)]
pub struct MockSnacApi {
    pub vocabulary_calls: AtomicUsize,
    pub existence_calls: AtomicUsize,
    unknown_terms: HashSet<String>,
    missing_constellations: HashSet<i64>,
    missing_resources: HashSet<i64>,
    failing_checkouts: HashSet<i64>,
    offline: bool,
    submissions: Mutex<Vec<(String, Value)>>,
}

impl MockSnacApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_term(mut self, term: &str) -> Self {
        self.unknown_terms.insert(term.to_lowercase());
        self
    }

    pub fn with_missing_constellation(mut self, id: i64) -> Self {
        self.missing_constellations.insert(id);
        self
    }

    pub fn with_missing_resource(mut self, id: i64) -> Self {
        self.missing_resources.insert(id);
        self
    }

    pub fn with_failing_checkout(mut self, id: i64) -> Self {
        self.failing_checkouts.insert(id);
        self
    }

    /// 所有请求均返回传输错误
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn vocabulary_call_count(&self) -> usize {
        self.vocabulary_calls.load(Ordering::SeqCst)
    }

    pub fn existence_call_count(&self) -> usize {
        self.existence_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<(String, Value)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submitted_commands(&self) -> Vec<String> {
        self.submissions().into_iter().map(|(c, _)| c).collect()
    }
}

#[async_trait]
impl SnacApi for MockSnacApi {
    async fn lookup_vocabulary(&self, term_type: TermType, query: &str) -> ApiResult<String> {
        self.vocabulary_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        if self.unknown_terms.contains(&query.to_lowercase()) {
            return Ok(json!({ "results": [] }).to_string());
        }

        Ok(json!({
            "results": [{
                "id": 100,
                "term": query,
                "type": term_type.as_str(),
                "description": "",
            }]
        })
        .to_string())
    }

    async fn check_existence(&self, kind: EntityKind, id: i64) -> ApiResult<String> {
        self.existence_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        let body = match kind {
            EntityKind::Constellation => {
                let total = if self.missing_constellations.contains(&id) { 0 } else { 1 };
                json!({ "results": { "hits": { "total": { "value": total } } } })
            }
            EntityKind::Resource => {
                if self.missing_resources.contains(&id) {
                    json!({ "result": "success" })
                } else {
                    json!({ "result": "success", "resource": { "id": id, "version": 1 } })
                }
            }
        };
        Ok(body.to_string())
    }

    async fn submit(&self, command: &str, payload: Value) -> ApiResult<String> {
        self.submissions
            .lock()
            .unwrap()
            .push((command.to_string(), payload.clone()));
        if self.offline {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        let body = match command {
            commands::EDIT => {
                let id = payload["constellationid"].as_i64().unwrap_or_default();
                if self.failing_checkouts.contains(&id) {
                    json!({ "error": { "type": "Checkout Error", "message": "constellation is locked" } })
                } else {
                    json!({
                        "result": "success",
                        "constellation": { "id": id, "version": 7, "ark": "http://n2t.net/ark:/99166/test" }
                    })
                }
            }
            commands::INSERT_AND_PUBLISH_CONSTELLATION => {
                let id = payload["constellation"]["id"].as_i64().unwrap_or(9001);
                json!({
                    "result": "success",
                    "constellation": { "id": id, "version": 8, "ark": "http://n2t.net/ark:/99166/test" }
                })
            }
            commands::INSERT_RESOURCE => {
                json!({ "result": "success", "resource": { "id": 5001, "version": 1 } })
            }
            commands::UPDATE_RESOURCE => {
                let id = payload["resource"]["id"].as_i64().unwrap_or_default();
                json!({ "result": "success", "resource": { "id": id, "version": 2 } })
            }
            _ => json!({ "error": { "type": "Unknown Command", "message": command } }),
        };
        Ok(body.to_string())
    }
}

// ==========================================
// 表格 / 会话构造
// ==========================================

pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        t.push_row(row.iter());
    }
    t
}

pub fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(column, field)| (column.to_string(), field.to_string()))
        .collect()
}

pub fn session(
    model_type: ModelType,
    pairs: &[(&str, &str)],
    api: Arc<MockSnacApi>,
) -> Arc<SnacSession> {
    let schema = SnacSchema::new(model_type, mappings(pairs));
    Arc::new(SnacSession::new(SnacEnvironment::development(), api, schema))
}

/// 整张表作为一条记录
pub fn whole_table_input(session: Arc<SnacSession>, table: Table) -> ItemInput {
    let record = Record {
        from_row: 0,
        to_row: table.row_count(),
    };
    ItemInput {
        session,
        table: Arc::new(table),
        record,
    }
}

// ==========================================
// 临时文件
// ==========================================

pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
