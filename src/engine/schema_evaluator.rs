// ==========================================
// SNAC 数据上传工具 - Schema 评估
// ==========================================
// 职责: 按 schema 类型将表格记录构建为 UploadItem 列表
// 说明: 构建为逐字构建，不访问远端
// ==========================================

use crate::domain::ModelType;
use crate::exporter::{ConstellationItem, ItemInput, RelationItem, ResourceItem, SnacSession, UploadItem};
use crate::importer::Table;
use crate::model::SchemaResult;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct SchemaEvaluator {
    session: Arc<SnacSession>,
}

impl SchemaEvaluator {
    pub fn new(session: Arc<SnacSession>) -> Self {
        Self { session }
    }

    /// 构建记录条目
    ///
    /// # 参数
    /// - table: 输入表格
    /// - max: 最多构建的记录数（None 表示全部）
    ///
    /// # 返回
    /// 每条记录一个条目，按记录顺序
    pub async fn evaluate_records(
        &self,
        table: Arc<Table>,
        max: Option<usize>,
    ) -> SchemaResult<Vec<Box<dyn UploadItem>>> {
        let model_type = self.session.schema.model_type()?;
        let records = table.records();
        let limit = max.unwrap_or(records.len()).min(records.len());

        info!(
            model_type = %model_type,
            records = records.len(),
            limit,
            "开始评估记录"
        );

        let mut items: Vec<Box<dyn UploadItem>> = Vec::with_capacity(limit);

        for record in records.into_iter().take(limit) {
            let input = ItemInput {
                session: self.session.clone(),
                table: table.clone(),
                record,
            };

            let item: Box<dyn UploadItem> = match model_type {
                ModelType::Constellation => Box::new(ConstellationItem::new(input).await),
                ModelType::Resource => Box::new(ResourceItem::new(input).await),
                ModelType::Relation => Box::new(RelationItem::new(input).await),
            };
            items.push(item);
        }

        Ok(items)
    }

    /// 导出全部记录的 JSON
    ///
    /// # 返回
    /// `{"constellations": [...]}` 或 `{"resources": [...]}`
    pub async fn export_json(&self, table: Arc<Table>) -> SchemaResult<Value> {
        let model_type = self.session.schema.model_type()?;
        let items = self.evaluate_records(table, None).await?;
        let entities: Vec<Value> = items.iter().map(|item| item.to_json()).collect();

        let key = match model_type {
            ModelType::Resource => "resources",
            ModelType::Constellation | ModelType::Relation => "constellations",
        };

        Ok(json!({ key: entities }))
    }
}
