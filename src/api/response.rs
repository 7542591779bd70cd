// ==========================================
// SNAC 数据上传工具 - API 响应解析
// ==========================================
// 职责: 将远端原始响应规范化为 result / message / id / uri
// 红线: 解析不抛错，任何异常形态都落到 exception / unknown
// ==========================================

use crate::api::error::ApiResult;
use crate::config::SnacEnvironment;
use crate::domain::outcome::UploadOutcome;
use serde_json::Value;

pub const RESULT_SUCCESS: &str = "success";
pub const RESULT_ERROR: &str = "error";
pub const RESULT_EXCEPTION: &str = "exception";
pub const RESULT_UNKNOWN: &str = "unknown";

/// 结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
    Exception,
    Unknown,
}

// ==========================================
// SnacResponse
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SnacResponse {
    pub result: String,
    pub message: String,
    pub id: i64,
    pub version: i64,
    pub ark: String,
    pub uri: String,
    /// 原始响应文本（合成响应时与 message 相同）
    pub api_response: String,
    /// 解析后的 JSON（仅在可解析时存在）
    payload: Option<Value>,
}

impl SnacResponse {
    /// 解析远端原始响应
    ///
    /// # 参数
    /// - raw: 响应文本
    /// - env: 当前环境（用于拼接实体链接）
    pub fn parse(raw: &str, env: &SnacEnvironment) -> Self {
        let mut response = Self::empty(raw);

        if raw == RESULT_SUCCESS {
            response.result = RESULT_SUCCESS.to_string();
            return response;
        }

        let json: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => {
                response.result = RESULT_EXCEPTION.to_string();
                response.message = raw.to_string();
                return response;
            }
        };

        let (result, message) = Self::classify(&json);
        response.result = result;
        response.message = message;

        if let Some(resource) = json.get("resource").filter(|v| v.is_object()) {
            response.id = int_field(resource, "id");
            response.version = int_field(resource, "version");
            if response.id > 0 {
                response.uri = env.url_for_resource(response.id);
            }
        } else if let Some(con) = json.get("constellation").filter(|v| v.is_object()) {
            response.id = int_field(con, "id");
            response.version = int_field(con, "version");
            response.ark = con
                .get("ark")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            if env.is_prod() && !response.ark.is_empty() {
                response.uri = response.ark.clone();
            } else if response.id > 0 {
                response.uri = env.url_for_constellation(response.id);
            }
        }

        response.payload = Some(json);
        response
    }

    /// 传输结果转换为响应（传输失败 → exception）
    pub fn from_transport(result: ApiResult<String>, env: &SnacEnvironment) -> Self {
        match result {
            Ok(raw) => Self::parse(&raw, env),
            Err(e) => {
                let message = e.to_string();
                let mut response = Self::empty(&message);
                response.result = RESULT_EXCEPTION.to_string();
                response.message = message;
                response
            }
        }
    }

    /// 合成的成功响应（本地校验通过时使用）
    pub fn success() -> Self {
        let mut response = Self::empty(RESULT_SUCCESS);
        response.result = RESULT_SUCCESS.to_string();
        response
    }

    /// 合成的失败响应（本地校验未通过时使用）
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut response = Self::empty(&message);
        response.result = RESULT_ERROR.to_string();
        response.message = message;
        response
    }

    fn empty(raw: &str) -> Self {
        Self {
            result: String::new(),
            message: String::new(),
            id: 0,
            version: 0,
            ark: String::new(),
            uri: String::new(),
            api_response: raw.to_string(),
            payload: None,
        }
    }

    fn classify(json: &Value) -> (String, String) {
        if let Some(result) = json.get("result").and_then(Value::as_str) {
            let message = match json.get("message") {
                Some(Value::Object(m)) => m
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            };
            return (result.to_string(), message);
        }

        if let Some(error) = json.get("error").filter(|v| v.is_object()) {
            let err_type = error.get("type").and_then(Value::as_str).unwrap_or_default();
            let err_msg = error.get("message").and_then(Value::as_str).unwrap_or_default();
            let message = if err_type.is_empty() {
                err_msg.to_string()
            } else {
                format!("{} - {}", err_type, err_msg)
            };
            return (RESULT_ERROR.to_string(), message);
        }

        let has_results = json
            .get("results")
            .map(|r| r.is_object() || r.is_array())
            .unwrap_or(false);
        let has_related = json
            .get("related_constellations")
            .map(Value::is_array)
            .unwrap_or(false);

        if has_results || has_related {
            return (RESULT_SUCCESS.to_string(), String::new());
        }

        (RESULT_UNKNOWN.to_string(), "Unable to determine result".to_string())
    }

    pub fn kind(&self) -> ResultKind {
        let lower = self.result.to_lowercase();
        if lower.contains(RESULT_SUCCESS) {
            ResultKind::Success
        } else if lower == RESULT_ERROR {
            ResultKind::Error
        } else if lower == RESULT_EXCEPTION {
            ResultKind::Exception
        } else {
            ResultKind::Unknown
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind() == ResultKind::Success
    }

    /// 响应中的 constellation 对象
    pub fn constellation(&self) -> Option<&Value> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("constellation"))
            .filter(|v| v.is_object())
    }

    /// 响应中的 resource 对象
    pub fn resource(&self) -> Option<&Value> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("resource"))
            .filter(|v| v.is_object())
    }

    /// 解析后的 JSON
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn id_string(&self) -> String {
        if self.id > 0 {
            self.id.to_string()
        } else {
            String::new()
        }
    }

    /// 转换为输出结果
    pub fn to_outcome(&self, row_index: usize) -> UploadOutcome {
        UploadOutcome {
            row_index,
            result: self.result.clone(),
            message: self.message.clone(),
            entity_id: (self.id > 0).then_some(self.id),
            uri: self.uri.clone(),
            api_response: self.api_response.clone(),
        }
    }
}

fn int_field(obj: &Value, key: &str) -> i64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
