// ==========================================
// SNAC 数据上传工具 - 上传结果
// ==========================================
// 职责: 单条记录上传/校验后的结果（对应输出表的结果列）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单条记录的上传结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub row_index: usize,   // 记录首行（0 起）
    pub result: String,     // success / error / exception / unknown（或远端原始 result）
    pub message: String,    // 可读信息
    pub entity_id: Option<i64>,
    pub uri: String,        // 实体链接
    pub api_response: String,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.contains("success")
    }

    /// ID 列文本（无 ID 时为空）
    pub fn id_string(&self) -> String {
        self.entity_id.map(|id| id.to_string()).unwrap_or_default()
    }

    /// API Response 列文本（合成响应与消息相同，置空）
    pub fn api_response_column(&self) -> String {
        if self.api_response == self.message {
            String::new()
        } else {
            self.api_response.clone()
        }
    }
}

/// 台账中的上传结果记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub batch_id: String,
    pub environment: String,
    pub recorded_at: NaiveDateTime,
    pub outcome: UploadOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_outcome(result: &str, message: &str, api_response: &str) -> UploadOutcome {
        UploadOutcome {
            row_index: 0,
            result: result.to_string(),
            message: message.to_string(),
            entity_id: None,
            uri: String::new(),
            api_response: api_response.to_string(),
        }
    }

    #[test]
    fn test_success_detection() {
        assert!(make_outcome("success-notice", "", "").is_success());
        assert!(!make_outcome("error", "", "").is_success());
    }

    #[test]
    fn test_synthesized_api_response_is_blanked() {
        let o = make_outcome("error", "1. bad", "1. bad");
        assert_eq!(o.api_response_column(), "");

        let o = make_outcome("success", "ok", "{\"result\":\"success\"}");
        assert_eq!(o.api_response_column(), "{\"result\":\"success\"}");
    }
}
