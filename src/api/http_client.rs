// ==========================================
// SNAC 数据上传工具 - HTTP 客户端
// ==========================================
// 职责: SnacApi 的 reqwest 实现（POST JSON 到环境 API 地址）
// 说明: 非 2xx 响应体照常返回，由 SnacResponse 判定结果
// ==========================================

use crate::api::error::ApiResult;
use crate::api::snac_api::{existence_request, submit_request, vocabulary_request, SnacApi};
use crate::config::SnacEnvironment;
use crate::domain::types::{EntityKind, TermType};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct HttpSnacClient {
    client: reqwest::Client,
    environment: SnacEnvironment,
}

impl HttpSnacClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - environment: 目标环境（API 地址与 Key）
    /// - timeout: 请求超时，None 表示不限
    pub fn new(environment: SnacEnvironment, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            environment,
        })
    }

    pub fn environment(&self) -> &SnacEnvironment {
        &self.environment
    }

    async fn post(&self, body: &Value) -> ApiResult<String> {
        let response = self
            .client
            .post(&self.environment.api_url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "SNAC API 返回非成功状态码");
        }
        debug!(status = %status, bytes = text.len(), "SNAC API 响应");

        Ok(text)
    }
}

#[async_trait]
impl SnacApi for HttpSnacClient {
    #[instrument(skip(self))]
    async fn lookup_vocabulary(&self, term_type: TermType, query: &str) -> ApiResult<String> {
        self.post(&vocabulary_request(term_type, query)).await
    }

    #[instrument(skip(self))]
    async fn check_existence(&self, kind: EntityKind, id: i64) -> ApiResult<String> {
        self.post(&existence_request(kind, id)).await
    }

    #[instrument(skip(self, payload))]
    async fn submit(&self, command: &str, payload: Value) -> ApiResult<String> {
        let body = submit_request(command, payload, &self.environment.api_key);
        self.post(&body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_environment() {
        let client =
            HttpSnacClient::new(SnacEnvironment::development(), Some(Duration::from_secs(5)))
                .unwrap();
        assert_eq!(client.environment().id, "dev");
    }
}
