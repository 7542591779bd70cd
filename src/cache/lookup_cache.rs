// ==========================================
// SNAC 数据上传工具 - 查询缓存
// ==========================================
// 职责: 词表解析与远端实体存在性的会话级缓存
// 红线: 只缓存确定答案；锁不跨 await 持有；同一 key 只写一次
// ==========================================

use crate::api::response::SnacResponse;
use crate::api::SnacApi;
use crate::config::SnacEnvironment;
use crate::domain::term::Term;
use crate::domain::types::{EntityKind, TermType};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// ==========================================
// LookupCache
// ==========================================
pub struct LookupCache {
    api: Arc<dyn SnacApi>,
    environment: SnacEnvironment,
    terms: Mutex<HashMap<(TermType, String), Term>>,
    existence: Mutex<HashMap<(EntityKind, i64), bool>>,
}

/// 词项来源（逐字 / 远端校验）
#[derive(Clone, Copy)]
pub enum TermSource<'a> {
    Verbatim,
    Remote(&'a LookupCache),
}

impl<'a> TermSource<'a> {
    pub fn is_remote(&self) -> bool {
        matches!(self, TermSource::Remote(_))
    }

    /// 解析词项
    ///
    /// # 返回
    /// - 逐字模式: 占位词项（term = key，不访问远端）
    /// - 远端模式: 远端匹配到的词项，未匹配为 None
    pub async fn resolve_term(&self, term_type: TermType, key: &str) -> Option<Term> {
        if key.is_empty() {
            return None;
        }

        match self {
            TermSource::Verbatim => Some(Term::dummy(term_type, key)),
            TermSource::Remote(cache) => cache.resolve_term(term_type, key).await,
        }
    }
}

/// 锁中毒时继续使用内部数据（缓存内容只增不改）
fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LookupCache {
    pub fn new(api: Arc<dyn SnacApi>, environment: SnacEnvironment) -> Self {
        Self {
            api,
            environment,
            terms: Mutex::new(HashMap::new()),
            existence: Mutex::new(HashMap::new()),
        }
    }

    /// 逐字模式
    pub fn disable_remote(&self) -> TermSource<'_> {
        TermSource::Verbatim
    }

    /// 远端校验模式
    pub fn enable_remote(&self) -> TermSource<'_> {
        TermSource::Remote(self)
    }

    // ==========================================
    // 词表解析
    // ==========================================

    /// 远端解析词项（带缓存）
    ///
    /// # 参数
    /// - term_type: 词表类型
    /// - key: 原始值
    ///
    /// # 返回
    /// - Some(Term): 匹配成功（同时以 term 与 description 为 key 缓存）
    /// - None: 空值、未匹配或响应异常（不缓存）
    pub async fn resolve_term(&self, term_type: TermType, key: &str) -> Option<Term> {
        if key.is_empty() {
            return None;
        }

        let cache_key = (term_type, key.to_lowercase());
        if let Some(term) = guard(&self.terms).get(&cache_key) {
            return Some(term.clone());
        }

        let raw = match self.api.lookup_vocabulary(term_type, key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(term_type = term_type.as_str(), key, error = %e, "词表查询失败");
                return None;
            }
        };

        let response = SnacResponse::parse(&raw, &self.environment);
        if !response.is_success() {
            warn!(
                term_type = term_type.as_str(),
                key,
                result = %response.result,
                "词表查询未成功"
            );
            return None;
        }

        let term = match response.payload().and_then(|p| Self::match_term(p, key)) {
            Some(term) => term,
            None => {
                debug!(term_type = term_type.as_str(), key, "词表中无匹配项");
                return None;
            }
        };

        let mut terms = guard(&self.terms);
        terms
            .entry((term_type, term.term.to_lowercase()))
            .or_insert_with(|| term.clone());
        if !term.description.is_empty() {
            terms
                .entry((term_type, term.description.to_lowercase()))
                .or_insert_with(|| term.clone());
        }

        // 已有的确定答案优先
        let cached = terms.get(&cache_key).cloned();
        Some(cached.unwrap_or(term))
    }

    /// 在 results 数组中查找与 key 相同（不区分大小写）的第一个词项
    fn match_term(payload: &Value, key: &str) -> Option<Term> {
        let results = payload.get("results")?.as_array()?;

        for entry in results {
            let obj = match entry.as_object() {
                Some(obj) => obj,
                None => {
                    warn!(entry = %entry, "词表结果不是对象，跳过");
                    continue;
                }
            };

            let term = obj.get("term").and_then(Value::as_str);
            let term_type = obj.get("type").and_then(Value::as_str);
            let (term, term_type) = match (term, term_type) {
                (Some(t), Some(tt)) => (t, tt),
                _ => {
                    warn!(entry = %entry, "词表结果缺少 term/type，跳过");
                    continue;
                }
            };

            if term.to_lowercase() != key.to_lowercase() {
                continue;
            }

            let mut resolved = Term {
                id: None,
                term_type: term_type.to_string(),
                term: term.to_string(),
                description: obj
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            };
            resolved.id = match obj.get("id") {
                Some(Value::Number(n)) => n.as_i64(),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            };

            return Some(resolved);
        }

        None
    }

    // ==========================================
    // 存在性校验
    // ==========================================

    /// 远端实体是否存在（带缓存）
    ///
    /// 不确定的答案按 false 处理且不缓存
    pub async fn entity_exists(&self, kind: EntityKind, id: i64) -> bool {
        if let Some(exists) = guard(&self.existence).get(&(kind, id)) {
            return *exists;
        }

        let raw = match self.api.check_existence(kind, id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(?kind, id, error = %e, "存在性查询失败，按不存在处理");
                return false;
            }
        };

        let response = SnacResponse::parse(&raw, &self.environment);
        let answer = if response.is_success() {
            match kind {
                EntityKind::Constellation => response
                    .payload()
                    .and_then(|p| p.pointer("/results/hits/total/value"))
                    .and_then(Value::as_i64)
                    .map(|total| total == 1),
                EntityKind::Resource => Some(response.resource().is_some() && response.id == id),
            }
        } else {
            None
        };

        match answer {
            Some(exists) => {
                let mut existence = guard(&self.existence);
                let cached = *existence.entry((kind, id)).or_insert(exists);
                debug!(?kind, id, exists = cached, "存在性已缓存");
                cached
            }
            None => {
                warn!(?kind, id, result = %response.result, "存在性无法确定，按不存在处理");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingApi {
        calls: AtomicUsize,
        vocabulary: String,
        existence: String,
    }

    impl CountingApi {
        fn new(vocabulary: &str, existence: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                vocabulary: vocabulary.to_string(),
                existence: existence.to_string(),
            }
        }
    }

    #[async_trait]
    impl SnacApi for CountingApi {
        async fn lookup_vocabulary(&self, _: TermType, _: &str) -> ApiResult<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(ApiError::Transport("second call".to_string()));
            }
            Ok(self.vocabulary.clone())
        }

        async fn check_existence(&self, _: EntityKind, _: i64) -> ApiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.existence.clone())
        }

        async fn submit(&self, _: &str, _: Value) -> ApiResult<String> {
            Err(ApiError::Transport("unused".to_string()))
        }
    }

    fn cache_with(api: Arc<CountingApi>) -> LookupCache {
        LookupCache::new(api, SnacEnvironment::development())
    }

    #[tokio::test]
    async fn test_verbatim_never_calls_remote() {
        let api = Arc::new(CountingApi::new("{}", "{}"));
        let cache = cache_with(api.clone());

        let term = cache
            .disable_remote()
            .resolve_term(TermType::Subject, "Quakers")
            .await
            .unwrap();
        assert_eq!(term.term, "Quakers");
        assert_eq!(term.description, "");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_term_is_cached_with_description_alias() {
        let api = Arc::new(CountingApi::new(
            r#"{"results":[{"id":1,"type":"language_code","term":"eng","description":"English"}]}"#,
            "{}",
        ));
        let cache = cache_with(api.clone());

        let first = cache.resolve_term(TermType::LanguageCode, "ENG").await.unwrap();
        let second = cache.resolve_term(TermType::LanguageCode, "eng").await.unwrap();
        let by_description = cache
            .resolve_term(TermType::LanguageCode, "english")
            .await
            .unwrap();

        assert_eq!(first.term, "eng");
        assert_eq!(first.id, Some(1));
        assert_eq!(first, second);
        assert_eq!(by_description.description, "English");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unmatched_term_is_not_cached() {
        let api = Arc::new(CountingApi::new(
            r#"{"results":["junk",{"term":"Birth"},{"type":"date_type","term":"Death"}]}"#,
            "{}",
        ));
        let cache = cache_with(api.clone());

        assert!(cache.resolve_term(TermType::DateType, "Birth").await.is_none());
        // 第二次仍会访问远端（mock 第二次返回错误）
        assert!(cache.resolve_term(TermType::DateType, "Birth").await.is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_constellation_existence_cached() {
        let api = Arc::new(CountingApi::new(
            "{}",
            r#"{"results":{"hits":{"total":{"value":1}}}}"#,
        ));
        let cache = cache_with(api.clone());

        assert!(cache.entity_exists(EntityKind::Constellation, 4).await);
        assert!(cache.entity_exists(EntityKind::Constellation, 4).await);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resource_existence_negative_is_definitive() {
        let api = Arc::new(CountingApi::new("{}", r#"{"result":"success"}"#));
        let cache = cache_with(api.clone());

        assert!(!cache.entity_exists(EntityKind::Resource, 9).await);
        assert!(!cache.entity_exists(EntityKind::Resource, 9).await);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ambiguous_existence_not_cached() {
        let api = Arc::new(CountingApi::new("{}", "not json"));
        let cache = cache_with(api.clone());

        assert!(!cache.entity_exists(EntityKind::Constellation, 4).await);
        assert!(!cache.entity_exists(EntityKind::Constellation, 4).await);
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }
}
