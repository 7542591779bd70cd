// ==========================================
// SNAC 数据上传工具 - 上传条目抽象
// ==========================================
// 职责: 会话上下文、单条记录构建结果、UploadItem trait
// 说明: 每条记录先逐字构建（预览），校验/上传时再远端校验构建
// ==========================================

use crate::api::{SnacApi, SnacResponse};
use crate::cache::LookupCache;
use crate::config::SnacEnvironment;
use crate::domain::types::EntityKind;
use crate::exporter::validation_errors::ValidationErrors;
use crate::importer::Table;
use crate::model::{ConstellationModel, RelationModel, ResourceModel, SnacSchema};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// SnacSession - 单次评估会话
// ==========================================
// 持有环境、远端接口、查询缓存、字段模型与列映射
pub struct SnacSession {
    pub environment: SnacEnvironment,
    pub api: Arc<dyn SnacApi>,
    pub cache: Arc<LookupCache>,
    pub schema: SnacSchema,
    pub constellation_model: Arc<ConstellationModel>,
    pub resource_model: Arc<ResourceModel>,
    pub relation_model: Arc<RelationModel>,
}

impl SnacSession {
    /// 创建会话（新建查询缓存）
    pub fn new(environment: SnacEnvironment, api: Arc<dyn SnacApi>, schema: SnacSchema) -> Self {
        let cache = Arc::new(LookupCache::new(api.clone(), environment.clone()));
        Self {
            environment,
            api,
            cache,
            schema,
            constellation_model: Arc::new(ConstellationModel::new()),
            resource_model: Arc::new(ResourceModel::new()),
            relation_model: Arc::new(RelationModel::new()),
        }
    }

    pub fn column_mappings(&self) -> &BTreeMap<String, String> {
        &self.schema.column_mappings
    }
}

// ==========================================
// 待校验的远端 ID
// ==========================================

/// ID 在记录中的角色（决定实体类型与错误文案）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdRole {
    Cpf,
    Resource,
    RelatedCpf,
    RelatedResource,
    HoldingRepository,
}

impl IdRole {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            IdRole::Cpf | IdRole::RelatedCpf | IdRole::HoldingRepository => {
                EntityKind::Constellation
            }
            IdRole::Resource | IdRole::RelatedResource => EntityKind::Resource,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IdRole::Cpf => "CPF",
            IdRole::Resource => "Resource",
            IdRole::RelatedCpf => "Related CPF",
            IdRole::RelatedResource => "Related Resource",
            IdRole::HoldingRepository => "Holding Repository",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdReference {
    pub role: IdRole,
    pub id: i64,
}

// ==========================================
// BuiltItem - 单次构建结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltItem<E> {
    pub entity: E,
    pub errors: ValidationErrors,
    pub related_ids: Vec<IdReference>,
}

impl<E: Serialize> BuiltItem<E> {
    pub fn new(entity: E) -> Self {
        Self {
            entity,
            errors: ValidationErrors::new(),
            related_ids: Vec::new(),
        }
    }

    /// 记录待校验的 ID（去重）
    pub fn queue_id(&mut self, role: IdRole, id: i64) {
        let reference = IdReference { role, id };
        if !self.related_ids.contains(&reference) {
            self.related_ids.push(reference);
        }
    }

    pub fn entity_json(&self) -> Value {
        serde_json::to_value(&self.entity).unwrap_or(Value::Null)
    }

    /// 可上传的 JSON（存在错误时为 None）
    pub fn upload_json(&self) -> Option<Value> {
        if self.errors.has_errors() {
            return None;
        }
        serde_json::to_value(&self.entity).ok()
    }

    /// 逐一校验远端 ID 是否存在，不存在时追加错误
    pub async fn verify_related_ids(&mut self, cache: &LookupCache) {
        if self.related_ids.is_empty() {
            return;
        }

        info!(count = self.related_ids.len(), "校验关联 ID 是否存在");

        for reference in self.related_ids.clone() {
            let exists = cache
                .entity_exists(reference.role.entity_kind(), reference.id)
                .await;
            if !exists {
                warn!(role = reference.role.label(), id = reference.id, "远端 ID 不存在");
                self.errors.add_missing_id(reference.role.label(), reference.id);
            }
        }
    }

    /// 校验结论: 有错误时为合成失败响应，否则为合成成功响应
    pub fn validation_response(&self) -> SnacResponse {
        if self.errors.has_errors() {
            let message = self.errors.accumulated();
            warn!(errors = self.errors.len(), "记录校验未通过");
            SnacResponse::failure(message)
        } else {
            SnacResponse::success()
        }
    }
}

// ==========================================
// UploadItem Trait
// ==========================================
// 实现者: ConstellationItem / ResourceItem / RelationItem
#[async_trait]
pub trait UploadItem: Send + Sync {
    /// 预览 HTML（逐字构建结果）
    fn preview_text(&self) -> String;

    /// 记录首行下标
    fn row_index(&self) -> usize;

    /// 实体 JSON（逐字构建结果）
    fn to_json(&self) -> Value;

    /// 逐字构建中的错误（仅供预览参考）
    fn preview_errors(&self) -> &ValidationErrors;

    /// 远端校验构建 + 关联 ID 校验
    async fn perform_validation(&self) -> SnacResponse;

    /// 校验通过后提交到远端
    async fn perform_upload(&self) -> SnacResponse;
}

/// 会话内共享的输入（表格 + 记录区间）
#[derive(Clone)]
pub struct ItemInput {
    pub session: Arc<SnacSession>,
    pub table: Arc<Table>,
    pub record: crate::importer::Record,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Resource;

    #[test]
    fn test_id_roles() {
        assert_eq!(IdRole::HoldingRepository.entity_kind(), EntityKind::Constellation);
        assert_eq!(IdRole::RelatedResource.entity_kind(), EntityKind::Resource);
        assert_eq!(IdRole::RelatedCpf.label(), "Related CPF");
    }

    #[test]
    fn test_upload_json_withheld_on_errors() {
        let mut built = BuiltItem::new(Resource::for_insert());
        built.queue_id(IdRole::HoldingRepository, 4);
        built.queue_id(IdRole::HoldingRepository, 4);
        assert_eq!(built.related_ids.len(), 1);
        assert!(built.upload_json().is_some());
        assert!(built.validation_response().is_success());

        built.errors.add_missing_id("Holding Repository", 4);
        assert!(built.upload_json().is_none());

        let response = built.validation_response();
        assert_eq!(response.result, "error");
        assert_eq!(response.message, "1. Holding Repository ID 4 not found in SNAC");
    }
}
